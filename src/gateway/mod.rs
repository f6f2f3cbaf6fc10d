//! Request Gateway
//!
//! Turns caller JSON into verifications and verifications into caller JSON:
//! - `protocol`: request, response, error and alert shapes
//! - `handle`: validate, verify, build response and alerts

pub mod protocol;

use tracing::{info, warn};

use crate::engine::VerificationEngine;
use crate::error::GateError;

pub use protocol::{
    AlertEvent, AlertKind, ErrorCode, ErrorResponse, ProofPayload, VerifyRequest, VerifyResponse,
};

/// Response plus the webhook payloads it raised.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayOutcome {
    /// Caller response.
    pub response: VerifyResponse,
    /// Alerts to deliver; empty when approved.
    pub alerts: Vec<AlertEvent>,
}

/// Validate and verify one request.
pub fn handle(engine: &VerificationEngine, request: &VerifyRequest) -> Result<GatewayOutcome, GateError> {
    let tx = request.to_transaction(engine.limits())?;
    let result = engine.verify(&tx)?;

    let alerts = AlertEvent::for_result(&result, tx.amount);
    for alert in &alerts {
        info!("Alert {:?} for {}: {}", alert.event, alert.tx_id, alert.finding.code);
    }

    Ok(GatewayOutcome {
        response: VerifyResponse::from(&result),
        alerts,
    })
}

/// Handle a raw JSON body, answering with either a response or an error body.
pub fn handle_json(engine: &VerificationEngine, body: &str) -> Result<String, serde_json::Error> {
    let request = match VerifyRequest::from_json(body) {
        Ok(request) => request,
        Err(e) => {
            warn!("Rejected malformed request: {}", e);
            return ErrorResponse {
                code: ErrorCode::InvalidRequest,
                message: e.to_string(),
            }
            .to_json();
        }
    };

    match handle(engine, &request) {
        Ok(outcome) => outcome.response.to_json(),
        Err(e) => {
            warn!("Rejected request {}: {}", request.id, e);
            ErrorResponse::from(&e).to_json()
        }
    }
}
