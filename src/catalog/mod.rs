//! Signature Catalog
//!
//! Immutable registries of anomaly signatures, one per transaction class.
//!
//! ## Lifecycle
//!
//! ```text
//! CatalogDefinition ──validate──▶ SignatureCatalog ──Arc──▶ VerificationEngine
//!  (code or JSON)     (once)       (read-only)
//! ```
//!
//! ## Priority
//!
//! Every signature carries an explicit numeric priority, unique within its
//! class. Entries are matched in ascending priority and the first match wins,
//! so the lowest-priority-number entry also serves as the fail-closed
//! fallback. Reordering findings means editing priorities, never vector order.

pub mod signature;
pub mod builtin;

use std::collections::BTreeSet;
use std::path::Path;
use serde::{Serialize, Deserialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::core::confluence::{confluent_within, DEFAULT_STATE_BUDGET};
use crate::core::rewrite::{reduce, ReductionResult, RuleId};
use crate::core::word::{LifecycleWord, WordError, WordLimits};
use crate::transaction::TransactionClass;

pub use signature::{
    CatalogDefinition, ClassDefinition, Fingerprint, Severity, Signature, SignatureDefinition,
};

/// Why a signature was selected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchBasis {
    /// Canonical form equals the signature's canonical form.
    CanonicalForm,
    /// At least one fired rule is shared with the signature.
    RuleOverlap,
    /// Nothing matched; highest-priority entry reported (fail closed).
    Fallback,
}

/// Catalog load errors. All are fatal at startup.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A signature's generator word is invalid.
    #[error("{class} signature {code}: invalid word: {source}")]
    InvalidSignatureWord {
        /// Registry.
        class: TransactionClass,
        /// Signature code.
        code: String,
        /// Validation failure.
        #[source]
        source: WordError,
    },

    /// The baseline word is invalid.
    #[error("{class} baseline: invalid word: {source}")]
    InvalidBaseline {
        /// Registry.
        class: TransactionClass,
        /// Validation failure.
        #[source]
        source: WordError,
    },

    /// The baseline is not strictly ascending.
    #[error("{class} baseline {baseline} is not strictly ascending")]
    BaselineNotAscending {
        /// Registry.
        class: TransactionClass,
        /// Rendered baseline.
        baseline: String,
    },

    /// A registry has no signatures; the fallback needs one.
    #[error("{class} registry has no signatures")]
    EmptyRegistry {
        /// Registry.
        class: TransactionClass,
    },

    /// Two signatures share a code.
    #[error("{class} registry: duplicate code {code}")]
    DuplicateCode {
        /// Registry.
        class: TransactionClass,
        /// Repeated code.
        code: String,
    },

    /// Two signatures share a priority.
    #[error("{class} registry: priority {priority} used by both {first} and {second}")]
    DuplicatePriority {
        /// Registry.
        class: TransactionClass,
        /// Repeated priority.
        priority: u16,
        /// First code using it.
        first: String,
        /// Second code using it.
        second: String,
    },

    /// Catalog file could not be read.
    #[error("failed to read catalog {path}: {source}")]
    Io {
        /// File path.
        path: String,
        /// I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// Catalog JSON is malformed.
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

// =============================================================================
// CLASS CATALOG
// =============================================================================

/// A validated signature with its precomputed fingerprint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    /// Match priority (lower first).
    pub priority: u16,
    /// Finding metadata.
    pub signature: Signature,
    /// Reduction of the generator word.
    pub fingerprint: Fingerprint,
}

impl CatalogEntry {
    /// Test a reduction against this entry.
    pub fn matches(&self, reduction: &ReductionResult) -> Option<MatchBasis> {
        if self.fingerprint.canonical == reduction.canonical {
            Some(MatchBasis::CanonicalForm)
        } else if !self.fingerprint.fired.is_disjoint(&reduction.fired) {
            Some(MatchBasis::RuleOverlap)
        } else {
            None
        }
    }
}

/// Registry for one transaction class.
#[derive(Clone, Debug, Serialize)]
pub struct ClassCatalog {
    class: TransactionClass,
    baseline: LifecycleWord,
    baseline_canonical: LifecycleWord,
    entries: Vec<CatalogEntry>,
}

impl ClassCatalog {
    /// Validate a class definition and precompute fingerprints.
    pub fn build(
        class: TransactionClass,
        definition: &ClassDefinition,
        limits: &WordLimits,
    ) -> Result<Self, CatalogError> {
        let baseline = LifecycleWord::parse(&definition.baseline, limits)
            .map_err(|source| CatalogError::InvalidBaseline { class, source })?;
        if !baseline.is_strictly_ascending() {
            return Err(CatalogError::BaselineNotAscending {
                class,
                baseline: baseline.to_string(),
            });
        }
        let baseline_canonical = reduce(&baseline).canonical;

        if definition.signatures.is_empty() {
            return Err(CatalogError::EmptyRegistry { class });
        }

        let mut entries: Vec<CatalogEntry> = Vec::with_capacity(definition.signatures.len());
        for def in &definition.signatures {
            if entries.iter().any(|e| e.signature.code == def.code) {
                return Err(CatalogError::DuplicateCode {
                    class,
                    code: def.code.clone(),
                });
            }
            if let Some(other) = entries.iter().find(|e| e.priority == def.priority) {
                return Err(CatalogError::DuplicatePriority {
                    class,
                    priority: def.priority,
                    first: other.signature.code.clone(),
                    second: def.code.clone(),
                });
            }

            let generator_word = LifecycleWord::parse(&def.word, limits).map_err(|source| {
                CatalogError::InvalidSignatureWord {
                    class,
                    code: def.code.clone(),
                    source,
                }
            })?;

            match confluent_within(generator_word.as_slice(), DEFAULT_STATE_BUDGET) {
                Some(true) => {}
                Some(false) => warn!(
                    "{} signature {} word {} has rule-order-dependent normal forms",
                    class, def.code, generator_word
                ),
                None => warn!(
                    "{} signature {} word {}: order-dependence check gave up after {} states",
                    class, def.code, generator_word, DEFAULT_STATE_BUDGET
                ),
            }

            let reduction = reduce(&generator_word);
            entries.push(CatalogEntry {
                priority: def.priority,
                signature: Signature {
                    code: def.code.clone(),
                    name: def.name.clone(),
                    severity: def.severity,
                    generator_word,
                    regulation: def.regulation.clone(),
                    risk: def.risk.clone(),
                    control: def.control.clone(),
                    material_weakness: def.material_weakness,
                },
                fingerprint: Fingerprint {
                    canonical: reduction.canonical,
                    fired: reduction.fired,
                },
            });
        }

        entries.sort_by_key(|e| e.priority);

        let catalog = Self {
            class,
            baseline,
            baseline_canonical,
            entries,
        };

        for code in catalog.shadowed_codes() {
            warn!("{} signature {} is shadowed by an earlier entry with the same fingerprint", class, code);
        }

        Ok(catalog)
    }

    /// Registry class.
    pub fn class(&self) -> TransactionClass {
        self.class
    }

    /// Expected lifecycle word.
    pub fn baseline(&self) -> &LifecycleWord {
        &self.baseline
    }

    /// Canonical form of the baseline.
    pub fn baseline_canonical(&self) -> &LifecycleWord {
        &self.baseline_canonical
    }

    /// Entries in match order.
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Highest-priority entry; the fail-closed classification.
    pub fn fallback(&self) -> &CatalogEntry {
        // Non-empty by construction
        &self.entries[0]
    }

    /// Look up an entry by code.
    pub fn get(&self, code: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.signature.code == code)
    }

    /// Whether a reduction is the class's normal lifecycle.
    pub fn is_normal(&self, reduction: &ReductionResult) -> bool {
        reduction.fired.is_empty() && reduction.canonical == self.baseline_canonical
    }

    /// First entry (in priority order) matching the reduction.
    pub fn find_match(&self, reduction: &ReductionResult) -> Option<(&CatalogEntry, MatchBasis)> {
        self.entries
            .iter()
            .find_map(|entry| entry.matches(reduction).map(|basis| (entry, basis)))
    }

    /// Entries that can never be selected because an earlier entry has an
    /// identical fingerprint.
    pub fn shadowed_codes(&self) -> Vec<&str> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(i, entry)| {
                self.entries[..*i]
                    .iter()
                    .any(|earlier| earlier.fingerprint == entry.fingerprint)
            })
            .map(|(_, entry)| entry.signature.code.as_str())
            .collect()
    }

    /// Union of rules fired by any signature word.
    pub fn covered_rules(&self) -> BTreeSet<RuleId> {
        self.entries
            .iter()
            .flat_map(|e| e.fingerprint.fired.iter().copied())
            .collect()
    }
}

// =============================================================================
// SIGNATURE CATALOG
// =============================================================================

/// Both class registries. Built once, shared read-only.
#[derive(Clone, Debug, Serialize)]
pub struct SignatureCatalog {
    payment: ClassCatalog,
    invoice: ClassCatalog,
}

impl SignatureCatalog {
    /// Validate a full catalog definition.
    pub fn from_definition(
        definition: &CatalogDefinition,
        limits: &WordLimits,
    ) -> Result<Self, CatalogError> {
        let payment = ClassCatalog::build(TransactionClass::Payment, &definition.payment, limits)?;
        let invoice = ClassCatalog::build(TransactionClass::Invoice, &definition.invoice, limits)?;

        info!(
            "Signature catalog loaded: {} payment, {} invoice signatures",
            payment.entries.len(),
            invoice.entries.len()
        );

        Ok(Self { payment, invoice })
    }

    /// The built-in registries.
    pub fn builtin(limits: &WordLimits) -> Result<Self, CatalogError> {
        Self::from_definition(&builtin::builtin_definition(), limits)
    }

    /// Parse and validate a JSON catalog definition.
    pub fn from_json(json: &str, limits: &WordLimits) -> Result<Self, CatalogError> {
        let definition: CatalogDefinition = serde_json::from_str(json)?;
        Self::from_definition(&definition, limits)
    }

    /// Read, parse and validate a JSON catalog file.
    pub fn load(path: &Path, limits: &WordLimits) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json, limits)
    }

    /// Registry for a class.
    pub fn for_class(&self, class: TransactionClass) -> &ClassCatalog {
        match class {
            TransactionClass::Payment => &self.payment,
            TransactionClass::Invoice => &self.invoice,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builtin() -> SignatureCatalog {
        SignatureCatalog::builtin(&WordLimits::default()).unwrap()
    }

    fn word(g: &[u8]) -> LifecycleWord {
        LifecycleWord::new(g.to_vec()).unwrap()
    }

    fn codes(catalog: &ClassCatalog) -> Vec<&str> {
        catalog.entries().iter().map(|e| e.signature.code.as_str()).collect()
    }

    #[test]
    fn test_builtin_registries() {
        let catalog = builtin();

        let payment = catalog.for_class(TransactionClass::Payment);
        assert_eq!(
            codes(payment),
            vec!["DUP-INIT", "DUP-SETTLE", "AUTH-BYPASS", "EXEC-NO-AUTH",
                 "EARLY-SETTLE", "SPLIT", "REPLAY", "BEC"]
        );
        assert_eq!(payment.baseline().as_slice(), &[1, 2, 3, 4, 5]);
        assert_eq!(payment.baseline_canonical(), payment.baseline());
        assert_eq!(payment.fallback().signature.code, "DUP-INIT");

        let invoice = catalog.for_class(TransactionClass::Invoice);
        assert_eq!(
            codes(invoice),
            vec!["DUP-PAY", "NO-PO", "PAY-NO-GR", "PAY-NO-MATCH", "INV-SPLIT"]
        );
        assert_eq!(invoice.baseline().as_slice(), &[1, 2, 3, 4, 5, 6]);
        assert!(invoice.get("PAY-NO-MATCH").unwrap().signature.material_weakness);
    }

    #[test]
    fn test_builtin_fingerprints() {
        let catalog = builtin();
        let payment = catalog.for_class(TransactionClass::Payment);

        let auth = payment.get("AUTH-BYPASS").unwrap();
        assert_eq!(auth.fingerprint.canonical.as_slice(), &[1, 2, 3, 2, 4, 5]);
        assert_eq!(auth.fingerprint.fired, [RuleId::R3].into_iter().collect::<BTreeSet<_>>());

        let exec = payment.get("EXEC-NO-AUTH").unwrap();
        assert_eq!(exec.fingerprint.canonical.as_slice(), &[1, 2, 4, 3, 5]);
        assert_eq!(exec.fingerprint.fired, [RuleId::R2].into_iter().collect::<BTreeSet<_>>());

        let replay = payment.get("REPLAY").unwrap();
        assert_eq!(replay.fingerprint.canonical.as_slice(), &[1, 2, 3, 4, 5]);

        let invoice = catalog.for_class(TransactionClass::Invoice);
        let no_gr = invoice.get("PAY-NO-GR").unwrap();
        assert_eq!(no_gr.fingerprint.canonical.as_slice(), &[1, 2, 3, 4, 6, 5]);
    }

    #[test]
    fn test_builtin_words_are_order_independent() {
        let catalog = builtin();
        for class in TransactionClass::ALL {
            for entry in catalog.for_class(class).entries() {
                let word = entry.signature.generator_word.as_slice();
                assert_eq!(confluent_within(word, DEFAULT_STATE_BUDGET), Some(true), "{}", entry.signature.code);
            }
        }
    }

    #[test]
    fn test_shadowed_codes() {
        let catalog = builtin();
        // DUP-SETTLE, SPLIT and REPLAY all reduce to 1-2-3-4-5 via R1, like DUP-INIT
        assert_eq!(
            catalog.for_class(TransactionClass::Payment).shadowed_codes(),
            vec!["DUP-SETTLE", "SPLIT", "REPLAY"]
        );
        assert_eq!(
            catalog.for_class(TransactionClass::Invoice).shadowed_codes(),
            vec!["PAY-NO-MATCH", "INV-SPLIT"]
        );
    }

    #[test]
    fn test_covered_rules() {
        let catalog = builtin();
        assert_eq!(
            catalog.for_class(TransactionClass::Payment).covered_rules(),
            RuleId::ALL.into_iter().collect::<BTreeSet<_>>()
        );
        // No invoice signature exercises the braid relation
        assert_eq!(
            catalog.for_class(TransactionClass::Invoice).covered_rules(),
            [RuleId::R1, RuleId::R2].into_iter().collect::<BTreeSet<_>>()
        );
    }

    #[test]
    fn test_find_match_priority() {
        let catalog = builtin();
        let payment = catalog.for_class(TransactionClass::Payment);

        // SPLIT has the same word as DUP-INIT; the lower priority number wins
        let reduction = reduce(&word(&[1, 1, 2, 3, 4, 5]));
        let (entry, basis) = payment.find_match(&reduction).unwrap();
        assert_eq!(entry.signature.code, "DUP-INIT");
        assert_eq!(basis, MatchBasis::CanonicalForm);

        let reduction = reduce(&word(&[1, 2, 5, 3, 4]));
        let (entry, basis) = payment.find_match(&reduction).unwrap();
        assert_eq!(entry.signature.code, "EXEC-NO-AUTH");
        assert_eq!(basis, MatchBasis::RuleOverlap);
    }

    #[test]
    fn test_priority_not_vector_order() {
        let mut definition = builtin::payment_definition();
        // Move SPLIT ahead of DUP-INIT by priority only
        definition.signatures[5].priority = 5;
        let payment =
            ClassCatalog::build(TransactionClass::Payment, &definition, &WordLimits::default()).unwrap();

        assert_eq!(payment.fallback().signature.code, "SPLIT");
        let reduction = reduce(&word(&[1, 1, 2, 3, 4, 5]));
        assert_eq!(payment.find_match(&reduction).unwrap().0.signature.code, "SPLIT");
    }

    #[test]
    fn test_long_signature_word_loads_within_budget() {
        let mut definition = builtin::payment_definition();
        definition.signatures[0].word = vec![7, 5, 3, 1, 7, 5, 3, 1, 7, 5, 3, 1, 6, 4, 2];
        let limits = WordLimits { max_len: 16, max_generator: 7 };

        let payment = ClassCatalog::build(TransactionClass::Payment, &definition, &limits).unwrap();
        assert_eq!(payment.fallback().signature.generator_word.len(), 15);
    }

    #[test]
    fn test_is_normal() {
        let catalog = builtin();
        let payment = catalog.for_class(TransactionClass::Payment);

        assert!(payment.is_normal(&reduce(&word(&[1, 2, 3, 4, 5]))));
        assert!(!payment.is_normal(&reduce(&word(&[1, 1, 2, 3, 4, 5]))));
        // Irreducible but not the baseline
        assert!(!payment.is_normal(&reduce(&word(&[1, 2, 3]))));
    }

    #[test]
    fn test_invalid_signature_word() {
        let mut definition = builtin::builtin_definition();
        definition.invoice.signatures[1].word = vec![1, 4, 0, 3];

        let err = SignatureCatalog::from_definition(&definition, &WordLimits::default()).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::InvalidSignatureWord { class: TransactionClass::Invoice, ref code, source: WordError::NonPositive { position: 2, .. } }
                if code == "NO-PO"
        ));
    }

    #[test]
    fn test_signature_word_outside_limits() {
        // REPLAY has 7 generators
        let limits = WordLimits { max_len: 6, max_generator: 7 };
        let err = SignatureCatalog::builtin(&limits).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidSignatureWord { ref code, .. } if code == "REPLAY"));
    }

    #[test]
    fn test_baseline_must_ascend() {
        let mut definition = builtin::payment_definition();
        definition.baseline = vec![1, 2, 2, 3];
        let err = ClassCatalog::build(TransactionClass::Payment, &definition, &WordLimits::default())
            .unwrap_err();
        assert!(matches!(err, CatalogError::BaselineNotAscending { .. }));

        definition.baseline = vec![1, 9];
        let err = ClassCatalog::build(TransactionClass::Payment, &definition, &WordLimits::default())
            .unwrap_err();
        assert!(matches!(err, CatalogError::InvalidBaseline { .. }));
    }

    #[test]
    fn test_empty_registry_rejected() {
        let mut definition = builtin::invoice_definition();
        definition.signatures.clear();
        let err = ClassCatalog::build(TransactionClass::Invoice, &definition, &WordLimits::default())
            .unwrap_err();
        assert!(matches!(err, CatalogError::EmptyRegistry { class: TransactionClass::Invoice }));
    }

    #[test]
    fn test_duplicates_rejected() {
        let mut definition = builtin::invoice_definition();
        definition.signatures[2].priority = 10;
        let err = ClassCatalog::build(TransactionClass::Invoice, &definition, &WordLimits::default())
            .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicatePriority { priority: 10, .. }));

        let mut definition = builtin::invoice_definition();
        definition.signatures[3].code = "NO-PO".to_string();
        let err = ClassCatalog::build(TransactionClass::Invoice, &definition, &WordLimits::default())
            .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateCode { ref code, .. } if code == "NO-PO"));
    }

    #[test]
    fn test_json_roundtrip_definition() {
        let json = serde_json::to_string(&builtin::builtin_definition()).unwrap();
        assert!(json.contains("\"materialWeakness\":true"));
        assert!(json.contains("\"CRITICAL\""));

        let catalog = SignatureCatalog::from_json(&json, &WordLimits::default()).unwrap();
        assert_eq!(catalog.for_class(TransactionClass::Payment).entries().len(), 8);
    }

    #[test]
    fn test_json_material_weakness_defaults_false() {
        let json = r#"{
            "payment": { "baseline": [1, 2, 3], "signatures": [
                { "priority": 1, "code": "X", "name": "X", "severity": "HIGH", "word": [1, 1, 2, 3],
                  "regulation": "r", "risk": "k", "control": "c" }
            ]},
            "invoice": { "baseline": [1, 2], "signatures": [
                { "priority": 1, "code": "Y", "name": "Y", "severity": "CRITICAL", "word": [2, 2],
                  "regulation": "r", "risk": "k", "control": "c" }
            ]}
        }"#;
        let catalog = SignatureCatalog::from_json(json, &WordLimits::default()).unwrap();
        assert!(!catalog.for_class(TransactionClass::Payment).fallback().signature.material_weakness);
    }

    #[test]
    fn test_malformed_json() {
        let err = SignatureCatalog::from_json("{", &WordLimits::default()).unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = SignatureCatalog::load(Path::new("/nonexistent/catalog.json"), &WordLimits::default())
            .unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }

    #[test]
    fn test_severity_order() {
        assert!(Severity::High < Severity::Critical);
        assert_eq!(Severity::Critical.to_string(), "CRITICAL");
    }
}
