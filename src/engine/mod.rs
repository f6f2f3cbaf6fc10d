//! Verification Engine
//!
//! Decides APPROVED or BLOCKED for one transaction and attaches the evidence.
//!
//! ## Decision
//!
//! ```text
//!                reduce(word)
//!                     │
//!        fired = ∅ and canonical = baseline ?
//!            │ yes                 │ no
//!        APPROVED          first entry matching
//!                          (canonical form, then rule overlap)
//!                                  │ none
//!                          first entry (fail closed)
//!                                  │
//!                               BLOCKED
//! ```
//!
//! The engine never approves a word that is not the class's normal lifecycle.
//! It holds no mutable state, so one instance may be shared across threads.

pub mod verdict;

use std::sync::Arc;
use std::time::Instant;
use chrono::{DateTime, Utc};
use tracing::{debug, instrument, warn};

use crate::catalog::{CatalogEntry, ClassCatalog, MatchBasis, SignatureCatalog};
use crate::core::rewrite::{reduce, ReductionResult};
use crate::core::word::WordLimits;
use crate::error::GateError;
use crate::proof::ProofRecorder;
use crate::transaction::Transaction;

pub use verdict::{Finding, Verdict, VerificationResult};

/// Classify a reduction against a class registry.
///
/// Returns `None` for the normal lifecycle, otherwise the selected entry and
/// how it was selected.
pub fn classify<'a>(
    registry: &'a ClassCatalog,
    reduction: &ReductionResult,
) -> Option<(&'a CatalogEntry, MatchBasis)> {
    if registry.is_normal(reduction) {
        return None;
    }

    Some(
        registry
            .find_match(reduction)
            .unwrap_or_else(|| (registry.fallback(), MatchBasis::Fallback)),
    )
}

/// Stateless verifier over a shared, read-only catalog.
#[derive(Clone, Debug)]
pub struct VerificationEngine {
    catalog: Arc<SignatureCatalog>,
    limits: WordLimits,
    recorder: ProofRecorder,
}

impl VerificationEngine {
    /// Create an engine.
    pub fn new(catalog: Arc<SignatureCatalog>, limits: WordLimits) -> Self {
        Self {
            catalog,
            limits,
            recorder: ProofRecorder::new(),
        }
    }

    /// Catalog in use.
    pub fn catalog(&self) -> &SignatureCatalog {
        &self.catalog
    }

    /// Input limits in use.
    pub fn limits(&self) -> &WordLimits {
        &self.limits
    }

    /// Verify a transaction, stamping the proof with the current time.
    pub fn verify(&self, tx: &Transaction) -> Result<VerificationResult, GateError> {
        self.verify_at(tx, Utc::now())
    }

    /// Verify a transaction with an explicit issuance time.
    #[instrument(level = "debug", skip(self, tx, issued_at), fields(tx_id = %tx.id, class = %tx.class))]
    pub fn verify_at(
        &self,
        tx: &Transaction,
        issued_at: DateTime<Utc>,
    ) -> Result<VerificationResult, GateError> {
        let started = Instant::now();

        self.limits.check(&tx.lifecycle_word)?;

        let registry = self.catalog.for_class(tx.class);
        let reduction = reduce(&tx.lifecycle_word);

        let (verdict, finding, match_basis) = match classify(registry, &reduction) {
            None => (Verdict::Approved, None, None),
            Some((entry, basis)) => {
                if basis == MatchBasis::Fallback {
                    warn!(
                        "No signature matched {} (canonical {}); reporting {} fail-closed",
                        tx.lifecycle_word, reduction.canonical, entry.signature.code
                    );
                }
                (
                    Verdict::Blocked,
                    Some(Finding::from(&entry.signature)),
                    Some(basis),
                )
            }
        };

        let proof = self
            .recorder
            .attest_reduction(&tx.id, &tx.lifecycle_word, &reduction, issued_at);

        let latency = started.elapsed();

        debug!(
            "{} → {} in {} steps, fired {:?}: {}",
            tx.lifecycle_word,
            reduction.canonical,
            reduction.step_count(),
            reduction.fired,
            verdict
        );

        Ok(VerificationResult {
            transaction_id: tx.id.clone(),
            verdict,
            finding,
            match_basis,
            trace: reduction.trace,
            proof,
            latency,
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================
