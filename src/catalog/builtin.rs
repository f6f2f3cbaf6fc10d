//! Built-in Signature Registries
//!
//! Payment generators: 1 initiation, 2 authentication (SCA), 3 authorization,
//! 4 execution, 5 settlement.
//!
//! Invoice generators: 1 receipt, 2 purchase order match, 3 goods receipt,
//! 4 three-way match, 5 approval, 6 payment.
//!
//! Priorities are spaced by 10 so new signatures can be slotted in without
//! renumbering. Changing a priority changes which finding wins a tie.

use super::signature::{CatalogDefinition, ClassDefinition, Severity, SignatureDefinition};

#[allow(clippy::too_many_arguments)]
fn sig(
    priority: u16,
    code: &str,
    name: &str,
    severity: Severity,
    word: &[i64],
    regulation: &str,
    risk: &str,
    control: &str,
    material_weakness: bool,
) -> SignatureDefinition {
    SignatureDefinition {
        priority,
        code: code.to_string(),
        name: name.to_string(),
        severity,
        word: word.to_vec(),
        regulation: regulation.to_string(),
        risk: risk.to_string(),
        control: control.to_string(),
        material_weakness,
    }
}

/// Payment registry.
pub fn payment_definition() -> ClassDefinition {
    use Severity::*;

    ClassDefinition {
        baseline: vec![1, 2, 3, 4, 5],
        signatures: vec![
            sig(10, "DUP-INIT", "Duplicate Initiation", High, &[1, 1, 2, 3, 4, 5],
                "PSD3/PSR Art. 49", "Double debit on payer account", "ITGC-PM-01", false),
            sig(20, "DUP-SETTLE", "Duplicate Settlement", Critical, &[1, 2, 3, 4, 5, 5],
                "SFD 98/26/EC, DORA Art. 6", "Funds transferred twice", "ITGC-PM-02", false),
            sig(30, "AUTH-BYPASS", "Authentication Bypass", Critical, &[1, 3, 2, 3, 4, 5],
                "PSD2 SCA Art. 97", "No SCA before execution", "ITGC-PM-03", false),
            sig(40, "EXEC-NO-AUTH", "Exec Without Authorization", Critical, &[1, 4, 2, 3, 5],
                "PSD2 Art. 97(1)", "Funds moved before auth", "ITGC-PM-04", false),
            sig(50, "EARLY-SETTLE", "Premature Settlement", Critical, &[1, 2, 5, 3, 4],
                "SFD 98/26/EC", "Settlement before execution", "ITGC-PM-05", false),
            sig(60, "SPLIT", "Threshold Splitting", High, &[1, 1, 2, 3, 4, 5],
                "PSD2 RTS Art. 16", "SCA threshold circumvention", "ITGC-PM-06", false),
            sig(70, "REPLAY", "Transaction Replay", Critical, &[1, 2, 2, 2, 3, 4, 5],
                "PSD3/PSR Art. 83", "Previously executed TX replayed", "ITGC-PM-07", false),
            sig(80, "BEC", "Beneficiary Swap (BEC)", Critical, &[1, 2, 4, 3, 4, 5],
                "PSD2 Art. 64", "Beneficiary changed post-auth", "ITGC-PM-08", false),
        ],
    }
}

/// Invoice registry.
pub fn invoice_definition() -> ClassDefinition {
    use Severity::*;

    ClassDefinition {
        baseline: vec![1, 2, 3, 4, 5, 6],
        signatures: vec![
            sig(10, "DUP-PAY", "Duplicate Vendor Payment", Critical, &[1, 2, 3, 4, 5, 6, 6],
                "SOX 404", "Vendor paid twice", "ITGC-INV-02", false),
            sig(20, "NO-PO", "Invoice Without PO", Critical, &[1, 4, 2, 3, 5, 6],
                "SOX 404, ISAE 3402", "No PO approval", "ITGC-INV-03", false),
            sig(30, "PAY-NO-GR", "Pay Before Goods Receipt", Critical, &[1, 2, 6, 3, 4, 5],
                "SOX 404", "Payment before goods received", "ITGC-INV-04", false),
            sig(40, "PAY-NO-MATCH", "Pay Before 3-Way Match", Critical, &[1, 2, 3, 6, 4, 5],
                "SOX 404", "Pay before reconciliation", "ITGC-INV-05", true),
            sig(50, "INV-SPLIT", "Invoice Splitting", High, &[1, 1, 2, 3, 4, 5, 6],
                "SOX 404, EU 2014/24", "Threshold circumvention", "ITGC-INV-06", false),
        ],
    }
}

/// Both built-in registries.
pub fn builtin_definition() -> CatalogDefinition {
    CatalogDefinition {
        payment: payment_definition(),
        invoice: invoice_definition(),
    }
}
