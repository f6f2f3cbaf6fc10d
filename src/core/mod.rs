//! Core deterministic primitives.
//!
//! Everything in this module is a pure function of its input: no clocks, no
//! I/O, no shared state. The verification engine and proof recorder are
//! built on top of it.

pub mod word;
pub mod rewrite;
pub mod confluence;
pub mod hash;

// Re-export core types
pub use word::{Generator, LifecycleWord, WordError, WordLimits};
pub use rewrite::{reduce, ReductionResult, ReductionTrace, RewriteStep, RuleId};
pub use confluence::{
    check_confluence, confluent_within, is_confluent_at, normal_forms, ConfluenceReport,
};
pub use hash::{ContentHash, ContentHasher};
