//! Proof Records
//!
//! Tamper-evident attestation of each verification:
//! - SHA-256 content digest over transaction id, input, canonical form and
//!   fired rules
//! - Issuance time kept outside the digest
//! - Audit replay by re-running the reduction

pub mod record;

// Re-export key types
pub use record::{compute_content_hash, ProofError, ProofRecord, ProofRecorder};
