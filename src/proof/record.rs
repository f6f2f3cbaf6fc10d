//! Proof Records
//!
//! A proof record binds a verification decision to the exact input and
//! computation that produced it.
//!
//! ## Digest
//!
//! ```text
//! SHA-256( "HECKE_GATE_PROOF_V1"
//!        || len(tx_id)   || tx_id
//!        || len(input)   || input generators
//!        || len(canon)   || canonical generators
//!        || len(rules)   || rule tags (ascending) )
//! ```
//!
//! The issuance timestamp is stored beside the digest and is never hashed:
//! re-verifying identical content always reproduces the identical digest.

use std::collections::BTreeSet;
use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::core::hash::{ContentHash, ContentHasher};
use crate::core::rewrite::{reduce, ReductionResult, RuleId};
use crate::core::word::{LifecycleWord, WordError, WordLimits};

/// Attestation of one verification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofRecord {
    /// Transaction the record belongs to.
    pub transaction_id: String,
    /// Word as submitted.
    pub input_word: LifecycleWord,
    /// Canonical form.
    pub canonical_word: LifecycleWord,
    /// Number of rewrites applied.
    pub step_count: u32,
    /// Rules fired.
    pub fired_rules: BTreeSet<RuleId>,
    /// Content digest (hex on the wire).
    #[serde(with = "hex_digest")]
    pub content_hash: ContentHash,
    /// When the record was issued. Not part of the digest.
    pub issued_at: DateTime<Utc>,
}

/// Audit replay failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProofError {
    /// Recorded digest does not match the record's content.
    #[error("digest mismatch: recorded {recorded}, computed {computed}")]
    DigestMismatch {
        /// Hex digest stored in the record.
        recorded: String,
        /// Hex digest recomputed from content.
        computed: String,
    },

    /// Recorded input no longer passes validation.
    #[error("recorded input is invalid: {0}")]
    InvalidInput(#[from] WordError),

    /// Replayed canonical form differs.
    #[error("canonical mismatch: recorded {recorded}, replayed {replayed}")]
    CanonicalMismatch {
        /// Recorded canonical word.
        recorded: String,
        /// Replayed canonical word.
        replayed: String,
    },

    /// Replayed step count differs.
    #[error("step count mismatch: recorded {recorded}, replayed {replayed}")]
    StepCountMismatch {
        /// Recorded count.
        recorded: u32,
        /// Replayed count.
        replayed: u32,
    },

    /// Replayed fired-rule set differs.
    #[error("fired rules mismatch")]
    FiredRulesMismatch,
}

/// Compute the content digest for a verification.
pub fn compute_content_hash(
    transaction_id: &str,
    input_word: &LifecycleWord,
    canonical_word: &LifecycleWord,
    fired_rules: &BTreeSet<RuleId>,
) -> ContentHash {
    let mut hasher = ContentHasher::for_proof_record();
    hasher.update_str(transaction_id);
    hasher.update_word(input_word);
    hasher.update_word(canonical_word);
    hasher.update_rules(fired_rules);
    hasher.finalize()
}

impl ProofRecord {
    /// Lowercase hex digest.
    pub fn hash_hex(&self) -> String {
        hex::encode(self.content_hash)
    }

    /// Recompute the digest from the record's own fields and compare.
    pub fn verify_digest(&self) -> Result<(), ProofError> {
        let computed = compute_content_hash(
            &self.transaction_id,
            &self.input_word,
            &self.canonical_word,
            &self.fired_rules,
        );

        if computed != self.content_hash {
            return Err(ProofError::DigestMismatch {
                recorded: self.hash_hex(),
                computed: hex::encode(computed),
            });
        }

        Ok(())
    }

    /// Re-run the reduction on the recorded input and check every field.
    pub fn replay(&self, limits: &WordLimits) -> Result<(), ProofError> {
        limits.check(&self.input_word)?;

        let replayed = reduce(&self.input_word);

        if replayed.canonical != self.canonical_word {
            return Err(ProofError::CanonicalMismatch {
                recorded: self.canonical_word.to_string(),
                replayed: replayed.canonical.to_string(),
            });
        }

        let replayed_steps = replayed.step_count() as u32;
        if replayed_steps != self.step_count {
            return Err(ProofError::StepCountMismatch {
                recorded: self.step_count,
                replayed: replayed_steps,
            });
        }

        if replayed.fired != self.fired_rules {
            return Err(ProofError::FiredRulesMismatch);
        }

        self.verify_digest()
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    /// Serialize to binary for archiving.
    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    /// Deserialize from binary.
    pub fn from_bytes(data: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(data)
    }
}

/// Issues proof records.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProofRecorder;

impl ProofRecorder {
    /// Create a recorder.
    pub const fn new() -> Self {
        Self
    }

    /// Attest one verification.
    pub fn attest(
        &self,
        transaction_id: &str,
        input_word: &LifecycleWord,
        canonical_word: &LifecycleWord,
        step_count: u32,
        fired_rules: &BTreeSet<RuleId>,
        issued_at: DateTime<Utc>,
    ) -> ProofRecord {
        let content_hash =
            compute_content_hash(transaction_id, input_word, canonical_word, fired_rules);

        ProofRecord {
            transaction_id: transaction_id.to_string(),
            input_word: input_word.clone(),
            canonical_word: canonical_word.clone(),
            step_count,
            fired_rules: fired_rules.clone(),
            content_hash,
            issued_at,
        }
    }

    /// Attest a finished reduction of `input_word`.
    pub fn attest_reduction(
        &self,
        transaction_id: &str,
        input_word: &LifecycleWord,
        reduction: &ReductionResult,
        issued_at: DateTime<Utc>,
    ) -> ProofRecord {
        self.attest(
            transaction_id,
            input_word,
            &reduction.canonical,
            reduction.step_count() as u32,
            &reduction.fired,
            issued_at,
        )
    }
}

/// Serde adapter: digest as a hex string.
mod hex_digest {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    use crate::core::hash::{parse_hex_hash, ContentHash};

    pub fn serialize<S: Serializer>(hash: &ContentHash, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(hash))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ContentHash, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse_hex_hash(&s).ok_or_else(|| D::Error::custom("expected 64 hex characters"))
    }
}
