//! # Hecke Payment Gate
//!
//! Lifecycle-word verification for payments and invoices.
//!
//! Each transaction's observed processing steps form a word over generators
//! `1..=7`. The word is rewritten to a canonical form with the 0-Hecke monoid
//! relations; the rules that fire, and the canonical form reached, identify
//! which control the lifecycle violated.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     HECKE PAYMENT GATE                       │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/            - Deterministic primitives                 │
//! │  ├── word.rs      - Validated lifecycle words                │
//! │  ├── rewrite.rs   - R1/R2/R3 reduction with trace            │
//! │  ├── confluence.rs- Exhaustive normal-form analysis          │
//! │  └── hash.rs      - Content hashing for proofs               │
//! │                                                              │
//! │  catalog/         - Signature registries (read-only)         │
//! │  engine/          - APPROVED / BLOCKED decision              │
//! │  proof/           - Proof records and audit replay           │
//! │  gateway/         - Request, response and alert payloads     │
//! │                                                              │
//! │  transaction.rs   - Caller input                             │
//! │  config.rs        - Environment settings                     │
//! │  error.rs         - Boundary error taxonomy                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism Guarantee
//!
//! Reduction, classification and proof digests are pure functions of the
//! transaction content:
//! - Fixed rule priority (R1, then R2, then R3; leftmost position first)
//! - No HashMap in any output path (BTreeSet for rule sets)
//! - Timestamps are recorded beside the digest, never hashed
//!
//! Verifying the same transaction twice yields the same verdict, finding and
//! digest.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod catalog;
pub mod engine;
pub mod proof;
pub mod gateway;
pub mod transaction;
pub mod config;
pub mod error;

// Re-export commonly used types
pub use crate::core::word::{Generator, LifecycleWord, WordError, WordLimits};
pub use crate::core::rewrite::{reduce, ReductionResult, RewriteStep, RuleId};
pub use catalog::{MatchBasis, Severity, SignatureCatalog};
pub use engine::{Finding, Verdict, VerificationEngine, VerificationResult};
pub use proof::{ProofError, ProofRecord, ProofRecorder};
pub use transaction::{Transaction, TransactionClass};
pub use config::GateConfig;
pub use error::GateError;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
