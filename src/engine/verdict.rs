//! Verification Outcomes

use std::fmt;
use std::time::Duration;
use serde::{Serialize, Deserialize};

use crate::catalog::{MatchBasis, Severity, Signature};
use crate::core::rewrite::ReductionTrace;
use crate::proof::ProofRecord;

/// Gate decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    /// Lifecycle is the class's normal lifecycle.
    Approved,
    /// Lifecycle deviates; a finding is attached.
    Blocked,
}

impl Verdict {
    /// Wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Approved => "APPROVED",
            Self::Blocked => "BLOCKED",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Signature fields reported with a blocked verdict. Also the wire shape.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    /// Signature code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Severity.
    pub severity: Severity,
    /// Regulatory citation.
    pub regulation: String,
    /// Risk narrative.
    pub risk: String,
    /// Control identifier.
    pub control: String,
    /// Reportable control deficiency.
    pub material_weakness: bool,
}

impl From<&Signature> for Finding {
    fn from(signature: &Signature) -> Self {
        Self {
            code: signature.code.clone(),
            name: signature.name.clone(),
            severity: signature.severity,
            regulation: signature.regulation.clone(),
            risk: signature.risk.clone(),
            control: signature.control.clone(),
            material_weakness: signature.material_weakness,
        }
    }
}

/// Full outcome of one verification.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VerificationResult {
    /// Transaction identifier.
    pub transaction_id: String,
    /// Decision.
    pub verdict: Verdict,
    /// Present iff blocked.
    pub finding: Option<Finding>,
    /// How the finding was selected. Present iff blocked.
    pub match_basis: Option<MatchBasis>,
    /// Every rewrite applied, in order.
    pub trace: ReductionTrace,
    /// Attestation.
    pub proof: ProofRecord,
    /// Wall time spent in the engine.
    pub latency: Duration,
}

impl VerificationResult {
    /// Whether the transaction was blocked.
    pub fn is_blocked(&self) -> bool {
        self.verdict == Verdict::Blocked
    }

    /// Finding code, if any.
    pub fn finding_code(&self) -> Option<&str> {
        self.finding.as_ref().map(|f| f.code.as_str())
    }

    /// Latency in whole microseconds.
    pub fn latency_micros(&self) -> u64 {
        self.latency.as_micros().min(u64::MAX as u128) as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::word::LifecycleWord;

    #[test]
    fn test_verdict_wire_names() {
        assert_eq!(serde_json::to_string(&Verdict::Approved).unwrap(), "\"APPROVED\"");
        assert_eq!(serde_json::to_string(&Verdict::Blocked).unwrap(), "\"BLOCKED\"");
        assert_eq!(Verdict::Blocked.to_string(), "BLOCKED");
    }

    #[test]
    fn test_finding_projection() {
        let signature = Signature {
            code: "PAY-NO-MATCH".to_string(),
            name: "Pay Before 3-Way Match".to_string(),
            severity: Severity::Critical,
            generator_word: LifecycleWord::new(vec![1, 2, 3, 6, 4, 5]).unwrap(),
            regulation: "SOX 404".to_string(),
            risk: "Pay before reconciliation".to_string(),
            control: "ITGC-INV-05".to_string(),
            material_weakness: true,
        };

        let finding = Finding::from(&signature);
        assert_eq!(finding.code, "PAY-NO-MATCH");
        assert_eq!(finding.severity, Severity::Critical);
        assert_eq!(finding.control, "ITGC-INV-05");
        assert!(finding.material_weakness);

        let json = serde_json::to_string(&finding).unwrap();
        assert!(json.contains("\"materialWeakness\":true"));
        assert!(json.contains("\"severity\":\"CRITICAL\""));
    }
}
