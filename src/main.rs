//! Hecke Payment Gate
//!
//! Demo runner: verifies a fixed set of sample transactions, logs verdicts
//! and alert payloads, then re-verifies to confirm the proofs reproduce.

use std::sync::Arc;
use anyhow::{bail, Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use hecke_gate::{
    GateConfig, VerificationEngine, VERSION,
    core::confluence::check_confluence,
    gateway::{self, AlertEvent, VerifyRequest},
};

fn main() -> Result<()> {
    let config = GateConfig::from_env();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Hecke Payment Gate v{}", VERSION);
    info!(
        "Word limits: length <= {}, generators 1..={}",
        config.limits.max_len, config.limits.max_generator
    );

    let catalog = config
        .load_catalog()
        .context("failed to load signature catalog")?;
    let engine = VerificationEngine::new(Arc::new(catalog), config.limits);

    demo_verifications(&engine)?;
    demo_rejections(&engine)?;
    demo_confluence();

    Ok(())
}

fn sample(id: &str, class: &str, amount: f64, counterparty: &str, word: &[i64]) -> VerifyRequest {
    VerifyRequest {
        id: id.to_string(),
        class: class.to_string(),
        amount,
        currency: "EUR".to_string(),
        counterparty: counterparty.to_string(),
        lifecycle_word: word.iter().map(|&g| serde_json::Number::from(g)).collect(),
    }
}

/// Verify one transaction per scenario and check proof reproducibility.
fn demo_verifications(engine: &VerificationEngine) -> Result<()> {
    info!("=== Verifying Sample Transactions ===");

    let samples = [
        sample("TXN-1001", "payment", 12_500.00, "Nordwind AG", &[1, 1, 2, 3, 4, 5]),
        sample("TXN-1002", "payment", 830.40, "Helios Logistics", &[1, 2, 3, 4, 5]),
        sample("TXN-1003", "payment", 47_000.00, "Baltic Freight", &[1, 5, 2, 3, 4]),
        sample("TXN-1004", "payment", 2_150.00, "Orion Services", &[2, 1, 2]),
        sample("INV-2001", "invoice", 9_800.00, "Kestrel Supplies", &[2, 1, 2]),
        sample("INV-2002", "invoice", 15_300.00, "Kestrel Supplies", &[1, 2, 6, 3, 4, 5]),
    ];

    let mut blocked = 0;

    for request in &samples {
        let tx = request
            .to_transaction(engine.limits())
            .with_context(|| format!("sample {} is invalid", request.id))?;
        let result = engine.verify(&tx)?;

        info!(
            "{} [{}] {} → {} ({} steps): {}",
            tx.id,
            tx.class,
            result.proof.input_word,
            result.proof.canonical_word,
            result.proof.step_count,
            result.verdict
        );

        if let Some(finding) = &result.finding {
            blocked += 1;
            info!(
                "  Finding {} {} ({}) via {:?}, control {}",
                finding.severity,
                finding.code,
                finding.name,
                result.match_basis,
                finding.control
            );
        }

        for step in &result.trace {
            info!("  {} at {}: {} → {}", step.rule, step.position, step.description(), step.result);
        }

        for alert in AlertEvent::for_result(&result, tx.amount) {
            info!("  Alert: {}", alert.to_json()?);
        }

        // Same content must yield the same digest
        let again = engine.verify(&tx)?;
        if again.proof.content_hash != result.proof.content_hash {
            bail!("proof digest for {} is not reproducible", tx.id);
        }
        result
            .proof
            .replay(engine.limits())
            .with_context(|| format!("proof replay failed for {}", tx.id))?;

        info!("  Proof {} verified in {} µs", result.proof.hash_hex(), result.latency_micros());
    }

    info!("=== {} of {} transactions blocked ===", blocked, samples.len());
    Ok(())
}

/// Show the error bodies for rejected requests.
fn demo_rejections(engine: &VerificationEngine) -> Result<()> {
    info!("=== Rejected Requests ===");

    let bodies = [
        sample("TXN-9001", "refund", 10.0, "Unknown", &[1, 2]).to_json()?,
        sample("TXN-9002", "payment", 10.0, "Unknown", &[1, 0, 3]).to_json()?,
        "{\"id\":\"TXN-9003\"}".to_string(),
    ];

    for body in &bodies {
        info!("{}", gateway::handle_json(engine, body)?);
    }

    Ok(())
}

/// Report rule-order dependence over short words.
fn demo_confluence() {
    info!("=== Confluence Check ===");

    let report = check_confluence(4, 7);
    info!(
        "Checked {} words up to length {}: {} with multiple normal forms",
        report.words_checked,
        report.max_len,
        report.divergences.len()
    );

    for divergence in report.divergences.iter().take(3) {
        let forms: Vec<String> = divergence.normal_forms.iter().map(|w| w.to_string()).collect();
        warn!("  {} reduces to any of {}", divergence.word, forms.join(", "));
    }
}
