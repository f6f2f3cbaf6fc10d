//! Word Rewriting Engine
//!
//! Reduces a lifecycle word to canonical form under the 0-Hecke relations:
//!
//! | Rule | Relation                | Rewrite                              |
//! |------|-------------------------|--------------------------------------|
//! | R1   | `s·s = s`               | `a a -> a`                           |
//! | R2   | far generators commute  | `a b -> b a` when `|a-b| >= 2, a > b` |
//! | R3   | braid                   | `a b a -> b a b` when `|a-b| = 1, a > b` |
//!
//! ## Strategy
//!
//! Rules are tried in priority order (R1, then R2, then R3), each at its
//! leftmost applicable position. Exactly one rewrite is applied per pass and
//! the scan restarts from R1. Reduction ends when a full pass finds nothing.
//!
//! ## Termination
//!
//! R1 shortens the word. R2 and R3 keep the length and produce a word that is
//! lexicographically smaller (the first changed position gets a smaller
//! generator). `(length, lexicographic order)` is well-founded over a finite
//! alphabet, so every reduction terminates.

use std::collections::BTreeSet;
use std::fmt;
use serde::{Serialize, Deserialize};

use super::word::{Generator, LifecycleWord};

// =============================================================================
// RULES
// =============================================================================

/// Rewrite rule identifier.
///
/// Ordering follows rule priority.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum RuleId {
    /// Idempotent collapse.
    R1 = 1,
    /// Far commutation.
    R2 = 2,
    /// Braid relation.
    R3 = 3,
}

impl RuleId {
    /// All rules in priority order.
    pub const ALL: [RuleId; 3] = [RuleId::R1, RuleId::R2, RuleId::R3];

    /// Short identifier used on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::R1 => "R1",
            Self::R2 => "R2",
            Self::R3 => "R3",
        }
    }

    /// Human-readable rule name.
    pub fn description(self) -> &'static str {
        match self {
            Self::R1 => "Idempotent collapse",
            Self::R2 => "Far commutation",
            Self::R3 => "Braid relation",
        }
    }

    /// Stable byte tag for hashing.
    #[inline]
    pub fn tag(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// TRACE
// =============================================================================

/// One applied rewrite.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteStep {
    /// Rule that fired.
    pub rule: RuleId,
    /// Leftmost index of the rewritten window.
    pub position: usize,
    /// Word after this step.
    pub result: LifecycleWord,
}

impl RewriteStep {
    /// Human-readable description of the rule.
    pub fn description(&self) -> &'static str {
        self.rule.description()
    }
}

/// Ordered list of applied rewrites.
pub type ReductionTrace = Vec<RewriteStep>;

/// Outcome of reducing one word.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReductionResult {
    /// Canonical form.
    pub canonical: LifecycleWord,
    /// Applied rewrites in order.
    pub trace: ReductionTrace,
    /// Distinct rules that fired.
    pub fired: BTreeSet<RuleId>,
}

impl ReductionResult {
    /// Number of rewrites applied.
    #[inline]
    pub fn step_count(&self) -> usize {
        self.trace.len()
    }

    /// True when no rule fired (input was already canonical).
    #[inline]
    pub fn is_clean(&self) -> bool {
        self.fired.is_empty()
    }
}

// =============================================================================
// REDUCTION
// =============================================================================

/// Reduce a word to canonical form.
///
/// Deterministic and total: the same word always yields the same canonical
/// form, trace and fired-rule set.
pub fn reduce(word: &LifecycleWord) -> ReductionResult {
    let mut current: Vec<Generator> = word.as_slice().to_vec();
    let mut trace = Vec::new();
    let mut fired = BTreeSet::new();

    while let Some((rule, position)) = next_rewrite(&current) {
        apply_rewrite(&mut current, rule, position);
        fired.insert(rule);
        trace.push(RewriteStep {
            rule,
            position,
            result: LifecycleWord::from_reduced(current.clone()),
        });
    }

    ReductionResult {
        canonical: LifecycleWord::from_reduced(current),
        trace,
        fired,
    }
}

/// The rewrite the priority strategy applies next, if any.
pub fn next_rewrite(word: &[Generator]) -> Option<(RuleId, usize)> {
    RuleId::ALL
        .iter()
        .find_map(|&rule| (0..word.len()).find(|&i| matches_at(word, rule, i)).map(|i| (rule, i)))
}

/// Every `(rule, position)` where a rule applies, in priority then position order.
pub fn applicable_rewrites(word: &[Generator]) -> Vec<(RuleId, usize)> {
    RuleId::ALL
        .iter()
        .flat_map(|&rule| {
            (0..word.len())
                .filter(move |&i| matches_at(word, rule, i))
                .map(move |i| (rule, i))
        })
        .collect()
}

/// Whether `rule` applies with its window starting at `i`.
#[inline]
fn matches_at(word: &[Generator], rule: RuleId, i: usize) -> bool {
    match rule {
        RuleId::R1 => i + 1 < word.len() && word[i] == word[i + 1],
        RuleId::R2 => {
            i + 1 < word.len()
                && word[i] > word[i + 1]
                && word[i] - word[i + 1] >= 2
        }
        RuleId::R3 => {
            i + 2 < word.len()
                && word[i] == word[i + 2]
                && word[i] > word[i + 1]
                && word[i] - word[i + 1] == 1
        }
    }
}

/// Apply a rewrite in place. Caller guarantees the rule matches at `i`.
pub(crate) fn apply_rewrite(word: &mut Vec<Generator>, rule: RuleId, i: usize) {
    debug_assert!(matches_at(word, rule, i));
    match rule {
        RuleId::R1 => {
            word.remove(i + 1);
        }
        RuleId::R2 => word.swap(i, i + 1),
        RuleId::R3 => {
            let (a, b) = (word[i], word[i + 1]);
            word[i] = b;
            word[i + 1] = a;
            word[i + 2] = b;
        }
    }
}
