//! Protocol Messages
//!
//! JSON shapes exchanged with callers: the verification request, its
//! response, the error body and the webhook alert payloads. Field names are
//! camelCase on the wire. Transport is left to the embedding service.

use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};
use uuid::Uuid;

use crate::catalog::Severity;
use crate::core::rewrite::RuleId;
use crate::core::word::{LifecycleWord, WordLimits};
use crate::engine::{Finding, Verdict, VerificationResult};
use crate::error::GateError;
use crate::transaction::{Transaction, TransactionClass};

// =============================================================================
// REQUEST
// =============================================================================

/// Verification request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    /// Caller-assigned transaction identifier.
    pub id: String,
    /// `payment` or `invoice`. Kept as text so unknown classes surface as a
    /// typed error rather than a parse failure.
    #[serde(rename = "type")]
    pub class: String,
    /// Amount in major currency units.
    pub amount: f64,
    /// ISO 4217 currency code.
    pub currency: String,
    /// Creditor or vendor name.
    pub counterparty: String,
    /// Observed generators, unvalidated. Any JSON number is accepted here so
    /// that fractions and huge values are reported as invalid words.
    pub lifecycle_word: Vec<serde_json::Number>,
}

impl VerifyRequest {
    /// Validate into a transaction.
    pub fn to_transaction(&self, limits: &WordLimits) -> Result<Transaction, GateError> {
        let lifecycle_word = LifecycleWord::parse_numbers(&self.lifecycle_word, limits)?;
        let class: TransactionClass = self.class.parse()?;

        Ok(Transaction::new(
            self.id.clone(),
            class,
            self.amount,
            self.currency.clone(),
            self.counterparty.clone(),
            lifecycle_word,
        ))
    }
}

// =============================================================================
// RESPONSE
// =============================================================================

/// Verification response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    /// Transaction identifier.
    pub tx_id: String,
    /// Decision.
    pub verdict: Verdict,
    /// Finding; `null` when approved.
    pub finding: Option<Finding>,
    /// Proof summary.
    pub proof: ProofPayload,
    /// Engine latency.
    pub latency_micros: u64,
    /// Proof issuance time.
    pub issued_at: DateTime<Utc>,
}

/// Proof summary as reported to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofPayload {
    /// Input word, dash-joined.
    pub input: String,
    /// Canonical word, dash-joined.
    pub canonical: String,
    /// Rewrites applied.
    pub steps: u32,
    /// Rules fired, ascending.
    pub violated: Vec<RuleId>,
    /// Lowercase hex digest.
    pub hash: String,
}

impl From<&VerificationResult> for VerifyResponse {
    fn from(result: &VerificationResult) -> Self {
        let proof = &result.proof;
        Self {
            tx_id: result.transaction_id.clone(),
            verdict: result.verdict,
            finding: result.finding.clone(),
            proof: ProofPayload {
                input: proof.input_word.to_string(),
                canonical: proof.canonical_word.to_string(),
                steps: proof.step_count,
                violated: proof.fired_rules.iter().copied().collect(),
                hash: proof.hash_hex(),
            },
            latency_micros: result.latency_micros(),
            issued_at: proof.issued_at,
        }
    }
}

// =============================================================================
// ALERTS
// =============================================================================

/// Webhook event kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertKind {
    /// Any blocked transaction.
    #[serde(rename = "tx.blocked")]
    Blocked,
    /// Blocked with a reportable control deficiency.
    #[serde(rename = "tx.material_weakness")]
    MaterialWeakness,
}

/// Finding summary carried by an alert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertFinding {
    /// Signature code.
    pub code: String,
    /// Severity.
    pub severity: Severity,
}

/// Proof summary carried by an alert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertProof {
    /// Lowercase hex digest.
    pub hash: String,
    /// Rules fired.
    pub violated: Vec<RuleId>,
}

/// Webhook payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertEvent {
    /// Delivery identifier for deduplication by receivers.
    pub id: Uuid,
    /// Event kind.
    pub event: AlertKind,
    /// Transaction identifier.
    pub tx_id: String,
    /// Finding summary.
    pub finding: AlertFinding,
    /// Proof summary.
    pub proof: AlertProof,
    /// Transaction amount.
    pub amount: f64,
}

impl AlertEvent {
    /// Alerts raised by a verification. Empty for approved results.
    pub fn for_result(result: &VerificationResult, amount: f64) -> Vec<AlertEvent> {
        let Some(finding) = &result.finding else {
            return Vec::new();
        };

        let make = |event: AlertKind| AlertEvent {
            id: Uuid::new_v4(),
            event,
            tx_id: result.transaction_id.clone(),
            finding: AlertFinding {
                code: finding.code.clone(),
                severity: finding.severity,
            },
            proof: AlertProof {
                hash: result.proof.hash_hex(),
                violated: result.proof.fired_rules.iter().copied().collect(),
            },
            amount,
        };

        let mut alerts = vec![make(AlertKind::Blocked)];
        if finding.material_weakness {
            alerts.push(make(AlertKind::MaterialWeakness));
        }
        alerts
    }
}

// =============================================================================
// ERRORS
// =============================================================================

/// Error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code.
    pub code: ErrorCode,
    /// Human-readable message.
    pub message: String,
}

/// Error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Lifecycle word failed validation.
    InvalidWord,
    /// Unknown transaction class.
    UnknownTransactionClass,
    /// Request body is not a valid request.
    InvalidRequest,
    /// Gate is misconfigured.
    InternalError,
}

impl From<&GateError> for ErrorResponse {
    fn from(err: &GateError) -> Self {
        let code = match err {
            GateError::InvalidWord(_) => ErrorCode::InvalidWord,
            GateError::UnknownTransactionClass(_) => ErrorCode::UnknownTransactionClass,
            GateError::CatalogMisconfiguration(_) => ErrorCode::InternalError,
        };
        Self {
            code,
            message: err.to_string(),
        }
    }
}

// =============================================================================
// SERIALIZATION HELPERS
// =============================================================================

impl VerifyRequest {
    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

impl VerifyResponse {
    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

impl AlertEvent {
    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl ErrorResponse {
    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

// =============================================================================
// TESTS
// =============================================================================
