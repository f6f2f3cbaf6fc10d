//! Boundary Error Taxonomy
//!
//! Errors a caller can see. Anything not listed here (including "no signature
//! matched") is resolved inside the engine without failing.

use thiserror::Error;

use crate::catalog::CatalogError;
use crate::core::word::WordError;

/// Errors reported synchronously by the gate.
#[derive(Debug, Error)]
pub enum GateError {
    /// Lifecycle word rejected before reduction.
    #[error("invalid lifecycle word: {0}")]
    InvalidWord(#[from] WordError),

    /// Transaction class is not a catalog key.
    #[error("unknown transaction class: {0:?}")]
    UnknownTransactionClass(String),

    /// Catalog failed validation at load.
    #[error("catalog misconfiguration: {0}")]
    CatalogMisconfiguration(#[from] CatalogError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = GateError::from(WordError::TooLong { len: 12, max: 10 });
        assert_eq!(err.to_string(), "invalid lifecycle word: word has 12 generators, limit is 10");

        let err = GateError::UnknownTransactionClass("refund".to_string());
        assert_eq!(err.to_string(), "unknown transaction class: \"refund\"");
    }
}
