//! Confluence Analysis
//!
//! The rewrite engine applies rules under a fixed priority strategy. This
//! module explores *every* rule order instead, to find words whose normal
//! form depends on which rewrite is applied first.
//!
//! The rule set is not confluent in general: `3,2,3,1` can braid to `2,3,2,1`
//! or commute to `3,2,1,3`, and both are irreducible. The engine's canonical
//! form is the normal form chosen by the priority strategy, which is still a
//! deterministic function of the input. Catalog loading uses
//! [`confluent_within`] to flag signature words whose fingerprint would be
//! order-dependent.

use std::collections::BTreeSet;

use super::rewrite::{applicable_rewrites, apply_rewrite};
use super::word::{Generator, LifecycleWord};

/// A word with more than one reachable normal form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Divergence {
    /// The word that diverges.
    pub word: LifecycleWord,
    /// All irreducible words reachable from it (sorted).
    pub normal_forms: Vec<LifecycleWord>,
}

/// Result of an exhaustive confluence check.
#[derive(Clone, Debug, Default)]
pub struct ConfluenceReport {
    /// Maximum word length enumerated.
    pub max_len: usize,
    /// Largest generator enumerated.
    pub max_generator: Generator,
    /// Number of words checked (including the empty word).
    pub words_checked: u64,
    /// Every divergent word found, in enumeration order.
    pub divergences: Vec<Divergence>,
}

impl ConfluenceReport {
    /// True when every checked word has a unique normal form.
    pub fn is_confluent(&self) -> bool {
        self.divergences.is_empty()
    }
}

/// Calls `f` on every word of length `0..=max_len` over `1..=max_generator`.
///
/// Words are visited depth-first: each prefix before its extensions.
pub fn for_each_word(max_len: usize, max_generator: Generator, mut f: impl FnMut(&[Generator])) {
    fn visit(
        buf: &mut Vec<Generator>,
        max_len: usize,
        max_generator: Generator,
        f: &mut dyn FnMut(&[Generator]),
    ) {
        f(buf.as_slice());
        if buf.len() == max_len {
            return;
        }
        for g in 1..=max_generator {
            buf.push(g);
            visit(buf, max_len, max_generator, f);
            buf.pop();
        }
    }

    let mut buf = Vec::with_capacity(max_len);
    visit(&mut buf, max_len, max_generator, &mut f);
}

/// Explored-state budget used when checking catalog words at load.
pub const DEFAULT_STATE_BUDGET: usize = 20_000;

/// Every irreducible word reachable from `word` under any rule order.
///
/// Unbounded: the number of reachable words grows exponentially with length.
pub fn normal_forms(word: &[Generator]) -> BTreeSet<Vec<Generator>> {
    let mut forms = BTreeSet::new();
    explore(word, usize::MAX, |form| {
        forms.insert(form);
        true
    });
    forms
}

/// Depth-first walk over every word reachable from `word`, calling
/// `on_form` for each irreducible one. Stops early when `on_form` returns
/// `false`. Returns `false` if more than `max_states` words were visited.
fn explore(
    word: &[Generator],
    max_states: usize,
    mut on_form: impl FnMut(Vec<Generator>) -> bool,
) -> bool {
    let mut seen: BTreeSet<Vec<Generator>> = BTreeSet::new();
    let mut pending = vec![word.to_vec()];

    while let Some(current) = pending.pop() {
        if seen.contains(&current) {
            continue;
        }
        if seen.len() >= max_states {
            return false;
        }
        seen.insert(current.clone());

        let rewrites = applicable_rewrites(&current);
        if rewrites.is_empty() {
            if !on_form(current) {
                return true;
            }
            continue;
        }

        for (rule, position) in rewrites {
            let mut next = current.clone();
            apply_rewrite(&mut next, rule, position);
            if !seen.contains(&next) {
                pending.push(next);
            }
        }
    }

    true
}

/// Whether `word` reaches exactly one normal form.
pub fn is_confluent_at(word: &[Generator]) -> bool {
    normal_forms(word).len() == 1
}

/// Bounded [`is_confluent_at`].
///
/// Returns `Some(false)` as soon as a second normal form is found, and
/// `None` when the budget runs out before the question is settled.
pub fn confluent_within(word: &[Generator], max_states: usize) -> Option<bool> {
    let mut first: Option<Vec<Generator>> = None;
    let mut diverged = false;

    let finished = explore(word, max_states, |form| {
        if let Some(existing) = &first {
            diverged = *existing != form;
            return !diverged;
        }
        first = Some(form);
        true
    });

    if diverged {
        Some(false)
    } else if finished {
        Some(true)
    } else {
        None
    }
}

/// Exhaustively check every word up to the given bounds.
///
/// Cost grows as `max_generator^max_len`; intended for offline analysis and
/// tests with small bounds.
pub fn check_confluence(max_len: usize, max_generator: Generator) -> ConfluenceReport {
    let mut report = ConfluenceReport {
        max_len,
        max_generator,
        ..Default::default()
    };

    for_each_word(max_len, max_generator, |word| {
        report.words_checked += 1;
        let forms = normal_forms(word);
        if forms.len() > 1 {
            report.divergences.push(Divergence {
                word: LifecycleWord::from_reduced(word.to_vec()),
                normal_forms: forms.into_iter().map(LifecycleWord::from_reduced).collect(),
            });
        }
    });

    report
}
