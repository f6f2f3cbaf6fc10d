//! Transaction Input
//!
//! The caller-supplied description of one payment or invoice.

use std::fmt;
use std::str::FromStr;
use serde::{Serialize, Deserialize};

use crate::core::word::LifecycleWord;
use crate::error::GateError;

/// Transaction class; selects the signature registry and baseline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionClass {
    /// Payment order (initiation through settlement).
    Payment,
    /// Supplier invoice (receipt through payment).
    Invoice,
}

impl TransactionClass {
    /// All classes.
    pub const ALL: [TransactionClass; 2] = [TransactionClass::Payment, TransactionClass::Invoice];

    /// Wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Payment => "payment",
            Self::Invoice => "invoice",
        }
    }
}

impl fmt::Display for TransactionClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionClass {
    type Err = GateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "payment" => Ok(Self::Payment),
            "invoice" => Ok(Self::Invoice),
            other => Err(GateError::UnknownTransactionClass(other.to_string())),
        }
    }
}

/// A transaction submitted for verification. Read-only once built.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Caller-assigned identifier.
    pub id: String,
    /// Payment or invoice.
    pub class: TransactionClass,
    /// Amount in major currency units. Informational only.
    pub amount: f64,
    /// ISO 4217 currency code.
    pub currency: String,
    /// Creditor or vendor name.
    pub counterparty: String,
    /// Observed processing steps.
    pub lifecycle_word: LifecycleWord,
}

impl Transaction {
    /// Create a transaction.
    pub fn new(
        id: impl Into<String>,
        class: TransactionClass,
        amount: f64,
        currency: impl Into<String>,
        counterparty: impl Into<String>,
        lifecycle_word: LifecycleWord,
    ) -> Self {
        Self {
            id: id.into(),
            class,
            amount,
            currency: currency.into(),
            counterparty: counterparty.into(),
            lifecycle_word,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_parsing() {
        assert_eq!("payment".parse::<TransactionClass>().unwrap(), TransactionClass::Payment);
        assert_eq!("invoice".parse::<TransactionClass>().unwrap(), TransactionClass::Invoice);

        let err = "refund".parse::<TransactionClass>().unwrap_err();
        assert!(matches!(err, GateError::UnknownTransactionClass(ref c) if c == "refund"));

        // Case-sensitive, like the wire format
        assert!("Payment".parse::<TransactionClass>().is_err());
    }

    #[test]
    fn test_class_serde() {
        assert_eq!(serde_json::to_string(&TransactionClass::Invoice).unwrap(), "\"invoice\"");
        for class in TransactionClass::ALL {
            assert_eq!(class.as_str().parse::<TransactionClass>().unwrap(), class);
        }
    }
}
