//! Signature Definitions
//!
//! A signature pairs a compliance finding with the lifecycle word that
//! exhibits it. Definitions are plain serde data so a catalog can be written
//! in code or loaded from JSON at startup.

use std::collections::BTreeSet;
use std::fmt;
use serde::{Serialize, Deserialize};

use crate::core::rewrite::RuleId;
use crate::core::word::LifecycleWord;

/// Finding severity. `High < Critical`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    /// Control failure with bounded exposure.
    High,
    /// Control failure with direct loss of funds.
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::High => f.write_str("HIGH"),
            Self::Critical => f.write_str("CRITICAL"),
        }
    }
}

/// A validated anomaly signature.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    /// Short code, e.g. `DUP-INIT`.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Severity.
    pub severity: Severity,
    /// Lifecycle word exhibiting the anomaly.
    pub generator_word: LifecycleWord,
    /// Regulatory citation.
    pub regulation: String,
    /// Risk narrative.
    pub risk: String,
    /// Control identifier.
    pub control: String,
    /// Reportable control deficiency.
    pub material_weakness: bool,
}

/// Reduction of a signature's generator word, computed once at load.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fingerprint {
    /// Canonical form of the generator word.
    pub canonical: LifecycleWord,
    /// Rules fired while reducing it.
    pub fired: BTreeSet<RuleId>,
}

// =============================================================================
// DEFINITIONS (serde input)
// =============================================================================

/// One signature as written by a catalog author.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureDefinition {
    /// Match priority; lower values are checked first. Unique per class.
    pub priority: u16,
    /// Short code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Severity.
    pub severity: Severity,
    /// Raw generator word; validated at load.
    pub word: Vec<i64>,
    /// Regulatory citation.
    pub regulation: String,
    /// Risk narrative.
    pub risk: String,
    /// Control identifier.
    pub control: String,
    /// Reportable control deficiency.
    #[serde(default)]
    pub material_weakness: bool,
}

/// Registry for one transaction class.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClassDefinition {
    /// Expected lifecycle: strictly ascending, no repeats.
    pub baseline: Vec<i64>,
    /// Signatures in any order; priority decides match order.
    pub signatures: Vec<SignatureDefinition>,
}

/// Complete catalog definition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CatalogDefinition {
    /// Payment registry.
    pub payment: ClassDefinition,
    /// Invoice registry.
    pub invoice: ClassDefinition,
}
