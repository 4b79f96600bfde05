//! Receipt verification: structure, signature, chain, and timestamp checks.
//!
//! Verification never fails with an error. Every input, however malformed,
//! produces a `VerificationReport` with an independent result per check so
//! batch pipelines can report per-receipt detail without aborting.

use chrono::{DateTime, Duration, Utc};

use crate::crypto::{Ed25519PublicKey, Ed25519Signature};
use crate::legacy::ReceiptDocument;
use crate::receipt::TrustReceipt;

/// Outcome of one verification check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    pub passed: bool,
    /// Informational pass: the check had nothing to verify.
    pub skipped: bool,
    pub detail: Option<String>,
}

impl CheckResult {
    fn pass() -> Self {
        Self {
            passed: true,
            skipped: false,
            detail: None,
        }
    }

    fn fail(detail: impl Into<String>) -> Self {
        Self {
            passed: false,
            skipped: false,
            detail: Some(detail.into()),
        }
    }

    fn skip(detail: impl Into<String>) -> Self {
        Self {
            passed: true,
            skipped: true,
            detail: Some(detail.into()),
        }
    }
}

/// The four independent checks, reported separately (no short-circuit).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationChecks {
    pub structure: CheckResult,
    pub signature: CheckResult,
    pub chain: CheckResult,
    pub timestamp: CheckResult,
}

/// Aggregated verification outcome for one receipt.
#[derive(Debug, Clone, PartialEq)]
pub struct VerificationReport {
    /// All four checks passed.
    pub valid: bool,
    pub checks: VerificationChecks,
    /// Details of every failed check.
    pub errors: Vec<String>,
    /// Informational score: mean CIQ x 100, falling back to resonance x 100.
    pub trust_score: Option<f64>,
    /// The input was a legacy-format receipt.
    pub legacy: bool,
}

/// Freshness windows for the timestamp check.
///
/// Boundary-inclusive: a timestamp exactly at either edge passes. `now` is
/// injectable so the windows can be tested without wall-clock races.
#[derive(Debug, Clone)]
pub struct VerifierConfig {
    pub max_future: Duration,
    pub max_age: Duration,
    pub now: Option<DateTime<Utc>>,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            max_future: Duration::minutes(5),
            max_age: Duration::days(365),
            now: None,
        }
    }
}

/// Verify a current-format receipt against a public key.
pub fn verify_receipt(
    receipt: &TrustReceipt,
    public_key: &Ed25519PublicKey,
    config: &VerifierConfig,
) -> VerificationReport {
    let structure = check_structure(receipt);
    let signature = check_signature(receipt, public_key);
    let chain = check_chain(receipt);
    let timestamp = check_timestamp(&receipt.timestamp, config);

    finish_report(structure, signature, chain, timestamp, trust_score(receipt), false)
}

/// Verify any wire document, handling the legacy format.
///
/// Legacy receipts fail the structure check with a migration message; their
/// signature (over the old `self_hash` material) is still checked, and the
/// absent chain data is reported as skipped rather than failed.
pub fn verify_document(
    document: &ReceiptDocument,
    public_key: &Ed25519PublicKey,
    config: &VerifierConfig,
) -> VerificationReport {
    match document {
        ReceiptDocument::V2(receipt) => verify_receipt(receipt, public_key, config),
        ReceiptDocument::V1(legacy) => {
            let structure = CheckResult::fail(
                "legacy-format receipt: `self_hash` present without `id`; migration required",
            );

            let signature = if legacy.signature.is_empty() {
                CheckResult::fail("signature value missing")
            } else {
                match Ed25519Signature::from_hex(&legacy.signature) {
                    Ok(sig) => match public_key.verify(legacy.self_hash.as_bytes(), &sig) {
                        Ok(()) => CheckResult::pass(),
                        Err(_) => CheckResult::fail("legacy signature does not verify"),
                    },
                    Err(e) => CheckResult::fail(format!("signature is not valid hex: {e}")),
                }
            };

            let chain = CheckResult::skip("legacy receipt carries no chain data");
            let timestamp = check_timestamp(&legacy.timestamp, config);

            let score = legacy
                .scores
                .as_ref()
                .and_then(|s| s.get("resonance_score").or_else(|| s.get("resonance")))
                .and_then(serde_json::Value::as_f64)
                .map(|r| r * 100.0);

            finish_report(structure, signature, chain, timestamp, score, true)
        }
    }
}

/// Check a session's receipts link into an intact chain.
///
/// Receipts must be in session order. Each link recomputes the predecessor's
/// chain hash from its current content, so tampering with receipt `i`
/// breaks the link check of receipt `i + 1` even though `i + 1`'s stored
/// fields are untouched.
pub fn verify_chain_links(receipts: &[TrustReceipt]) -> Vec<CheckResult> {
    let mut results = Vec::with_capacity(receipts.len());

    for (i, receipt) in receipts.iter().enumerate() {
        if i == 0 {
            if receipt.is_genesis() {
                results.push(CheckResult::pass());
            } else {
                results.push(CheckResult::fail(format!(
                    "first receipt must chain from GENESIS, got {}",
                    receipt.chain.previous_hash
                )));
            }
            continue;
        }

        let predecessor = &receipts[i - 1];
        let expected_prev = match predecessor.compute_chain_hash() {
            Ok(hash) => hash,
            Err(e) => {
                results.push(CheckResult::fail(format!(
                    "predecessor chain hash could not be recomputed: {e}"
                )));
                continue;
            }
        };

        if receipt.chain.previous_hash != expected_prev {
            results.push(CheckResult::fail(format!(
                "previous_hash does not match predecessor content at position {}",
                i + 1
            )));
        } else if receipt.chain.chain_length != predecessor.chain.chain_length + 1 {
            results.push(CheckResult::fail(format!(
                "chain_length {} does not follow predecessor {}",
                receipt.chain.chain_length, predecessor.chain.chain_length
            )));
        } else {
            results.push(CheckResult::pass());
        }
    }

    results
}

fn check_structure(receipt: &TrustReceipt) -> CheckResult {
    let mut missing = Vec::new();
    if receipt.id.is_empty() {
        missing.push("id");
    }
    match &receipt.signature {
        None => missing.push("signature"),
        Some(sig) if sig.value.is_empty() => missing.push("signature.value"),
        Some(_) => {}
    }

    if missing.is_empty() {
        CheckResult::pass()
    } else {
        CheckResult::fail(format!("missing required fields: {}", missing.join(", ")))
    }
}

fn check_signature(receipt: &TrustReceipt, public_key: &Ed25519PublicKey) -> CheckResult {
    let Some(signature) = &receipt.signature else {
        return CheckResult::fail("no signature attached");
    };

    let sig = match Ed25519Signature::from_hex(&signature.value) {
        Ok(sig) => sig,
        Err(e) => return CheckResult::fail(format!("signature is not valid hex: {e}")),
    };

    let message = match receipt.signing_bytes() {
        Ok(bytes) => bytes,
        Err(e) => return CheckResult::fail(format!("could not reconstruct signed bytes: {e}")),
    };

    match public_key.verify(&message, &sig) {
        Ok(()) => CheckResult::pass(),
        Err(_) => CheckResult::fail("signature does not verify against receipt content"),
    }
}

fn check_chain(receipt: &TrustReceipt) -> CheckResult {
    if receipt.chain.chain_hash.is_empty() {
        return CheckResult::fail("chain_hash missing");
    }

    match receipt.compute_chain_hash() {
        Ok(expected) if expected == receipt.chain.chain_hash => CheckResult::pass(),
        Ok(_) => CheckResult::fail("chain_hash does not match recomputed value"),
        Err(e) => CheckResult::fail(format!("chain_hash could not be recomputed: {e}")),
    }
}

fn check_timestamp(timestamp: &str, config: &VerifierConfig) -> CheckResult {
    let parsed = match DateTime::parse_from_rfc3339(timestamp) {
        Ok(dt) => dt.with_timezone(&Utc),
        Err(e) => return CheckResult::fail(format!("timestamp is not ISO-8601: {e}")),
    };

    let now = config.now.unwrap_or_else(Utc::now);

    if parsed > now + config.max_future {
        return CheckResult::fail(format!(
            "timestamp is more than {} minutes in the future",
            config.max_future.num_minutes()
        ));
    }
    if parsed < now - config.max_age {
        return CheckResult::fail(format!(
            "timestamp is more than {} days in the past",
            config.max_age.num_days()
        ));
    }
    CheckResult::pass()
}

fn trust_score(receipt: &TrustReceipt) -> Option<f64> {
    let telemetry = receipt.telemetry.as_ref()?;
    if let Some(ciq) = &telemetry.ciq_metrics {
        return Some(ciq.mean() * 100.0);
    }
    telemetry.resonance_score.map(|r| r * 100.0)
}

fn finish_report(
    structure: CheckResult,
    signature: CheckResult,
    chain: CheckResult,
    timestamp: CheckResult,
    trust_score: Option<f64>,
    legacy: bool,
) -> VerificationReport {
    let checks = VerificationChecks {
        structure,
        signature,
        chain,
        timestamp,
    };

    let errors: Vec<String> = [
        ("structure", &checks.structure),
        ("signature", &checks.signature),
        ("chain", &checks.chain),
        ("timestamp", &checks.timestamp),
    ]
    .into_iter()
    .filter(|(_, c)| !c.passed)
    .filter_map(|(name, c)| c.detail.as_ref().map(|d| format!("{name}: {d}")))
    .collect();

    let valid = checks.structure.passed
        && checks.signature.passed
        && checks.chain.passed
        && checks.timestamp.passed;

    VerificationReport {
        valid,
        checks,
        errors,
        trust_score,
        legacy,
    }
}
