//! TrustReceipt: the atomic unit of verifiable interaction history.
//!
//! A receipt is an immutable, signed record of one AI interaction. Once
//! created it is never edited; corrections are new receipts. Receipts within
//! a session form a singly-linked, append-only chain via `chain_hash`.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::canonical::{canonical_json, hash_canonical};
use crate::crypto::Sha256Hash;
use crate::error::{CoreError, ValidationError};

/// The current receipt schema version.
pub const RECEIPT_VERSION: &str = "1.0";

/// Sentinel `previous_hash` for the first receipt in a session.
pub const GENESIS_PREVIOUS_HASH: &str = "GENESIS";

/// The only signature algorithm receipts carry.
pub const SIGNATURE_ALGORITHM: &str = "Ed25519";

/// Whether raw interaction text is embedded or only its hashes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentMode {
    /// Store only privacy-preserving SHA-256 hashes of prompt/response.
    #[default]
    HashOnly,
    /// Store raw text alongside the hashes.
    Include,
}

/// Clarity / integrity / quality metrics, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CiqMetrics {
    pub clarity: f64,
    pub integrity: f64,
    pub quality: f64,
}

impl CiqMetrics {
    /// Mean of the three components.
    pub fn mean(&self) -> f64 {
        (self.clarity + self.integrity + self.quality) / 3.0
    }
}

/// Optional governance telemetry attached to a receipt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Telemetry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resonance_score: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub coherence_score: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub truth_debt: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ciq_metrics: Option<CiqMetrics>,
}

impl Telemetry {
    /// Reject NaN/infinite scores before they reach canonical encoding.
    fn validate(&self) -> Result<(), ValidationError> {
        let check = |v: Option<f64>, field: &'static str| match v {
            Some(x) if !x.is_finite() => Err(ValidationError::NonFiniteScore { field }),
            _ => Ok(()),
        };
        check(self.resonance_score, "resonance_score")?;
        check(self.coherence_score, "coherence_score")?;
        check(self.truth_debt, "truth_debt")?;
        if let Some(ciq) = &self.ciq_metrics {
            check(Some(ciq.clarity), "ciq_metrics.clarity")?;
            check(Some(ciq.integrity), "ciq_metrics.integrity")?;
            check(Some(ciq.quality), "ciq_metrics.quality")?;
        }
        Ok(())
    }
}

/// The interaction payload: raw text, privacy-preserving hashes, or both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_hash: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_hash: Option<String>,

    /// The model that produced the response. Required.
    pub model: String,
}

/// The hash-chain linkage of a receipt to its session predecessor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainLink {
    /// `chain_hash` of the predecessor, or `"GENESIS"` for the first receipt.
    pub previous_hash: String,

    /// Hash binding this receipt's content to its predecessor.
    pub chain_hash: String,

    /// Position in the session chain, 1-indexed.
    pub chain_length: u64,
}

/// A detached Ed25519 signature over the receipt's canonical form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptSignature {
    /// Always `"Ed25519"`.
    pub algorithm: String,

    /// Lowercase hex of the 64-byte signature.
    pub value: String,

    /// Which signing key produced this signature (key rotation support).
    pub key_version: String,

    /// When the signature was produced (ISO-8601).
    pub timestamp_signed: String,
}

/// A trust receipt: the signed, hash-chained record of one AI interaction.
///
/// Field mutation after signing invalidates the signature check; predecessor
/// tampering invalidates every downstream chain hash on recomputation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustReceipt {
    /// Content address: SHA-256 of the canonical receipt body.
    pub id: String,

    pub version: String,

    /// ISO-8601 timestamp of the interaction (UTC, millisecond precision).
    pub timestamp: String,

    pub session_id: String,
    pub agent_did: String,
    pub human_did: String,

    pub interaction: Interaction,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub telemetry: Option<Telemetry>,

    pub chain: ChainLink,

    /// `None` until signed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<ReceiptSignature>,
}

/// Hash arbitrary text content with SHA-256 over its canonical JSON form.
///
/// Used for the privacy-preserving `prompt_hash`/`response_hash` fields.
pub fn hash_content(content: &str) -> String {
    hash_canonical(&Value::String(content.to_string()))
}

impl TrustReceipt {
    /// The receipt body as a JSON value, signature stripped, with the chain
    /// hash overridden and the id optionally removed.
    ///
    /// This is the single source of the bytes that get hashed and signed;
    /// identity, chain, signing, and verification all go through here.
    pub fn canonical_value(
        &self,
        include_id: bool,
        chain_hash: &str,
    ) -> Result<Value, CoreError> {
        let mut receipt = self.clone();
        receipt.signature = None;
        receipt.chain.chain_hash = chain_hash.to_string();

        let mut value =
            serde_json::to_value(&receipt).map_err(|e| CoreError::EncodingError(e.to_string()))?;
        if !include_id {
            if let Value::Object(map) = &mut value {
                map.remove("id");
            }
        }
        Ok(value)
    }

    /// Recompute the content address: body without id, chain hash blanked.
    pub fn compute_id(&self) -> Result<String, CoreError> {
        let body = self.canonical_value(false, "")?;
        Ok(hash_canonical(&body))
    }

    /// Recompute the chain hash from this receipt's own `previous_hash`.
    ///
    /// `sha256(canonical(body with id, chain_hash="") || previous_hash)`.
    /// Computed for GENESIS receipts too, never skipped.
    pub fn compute_chain_hash(&self) -> Result<String, CoreError> {
        let body = self.canonical_value(true, "")?;
        let mut content = canonical_json(&body);
        content.push_str(&self.chain.previous_hash);
        Ok(Sha256Hash::hash(content.as_bytes()).to_hex())
    }

    /// The exact bytes covered by the Ed25519 signature: the canonical body
    /// with id and the populated chain hash, signature excluded.
    pub fn signing_bytes(&self) -> Result<Vec<u8>, CoreError> {
        let body = self.canonical_value(true, &self.chain.chain_hash)?;
        Ok(canonical_json(&body).into_bytes())
    }

    /// Whether a signature is attached.
    pub fn is_signed(&self) -> bool {
        self.signature.is_some()
    }

    /// Whether this is the first receipt of its session.
    pub fn is_genesis(&self) -> bool {
        self.chain.previous_hash == GENESIS_PREVIOUS_HASH
    }
}

/// Builder for trust receipts.
///
/// Validates the interaction payload, then computes the content-addressed id
/// and the chain hash in the mandated order: id over the id-less body with a
/// blank chain hash, then chain hash over the id-bearing body plus
/// `previous_hash`. The result is unsigned; see `Signer`.
pub struct ReceiptBuilder {
    session_id: String,
    agent_did: String,
    human_did: String,
    prompt: String,
    response: String,
    model: String,
    telemetry: Option<Telemetry>,
    content_mode: ContentMode,
    timestamp: Option<DateTime<Utc>>,
    previous_hash: String,
    previous_length: u64,
}

impl ReceiptBuilder {
    /// Start building a receipt for one interaction.
    pub fn new(
        session_id: impl Into<String>,
        agent_did: impl Into<String>,
        human_did: impl Into<String>,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            agent_did: agent_did.into(),
            human_did: human_did.into(),
            prompt: String::new(),
            response: String::new(),
            model: String::new(),
            telemetry: None,
            content_mode: ContentMode::default(),
            timestamp: None,
            previous_hash: GENESIS_PREVIOUS_HASH.to_string(),
            previous_length: 0,
        }
    }

    /// Set the prompt text.
    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Set the response text.
    pub fn response(mut self, response: impl Into<String>) -> Self {
        self.response = response.into();
        self
    }

    /// Set the model identifier.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Attach governance telemetry.
    pub fn telemetry(mut self, telemetry: Telemetry) -> Self {
        self.telemetry = Some(telemetry);
        self
    }

    /// Choose between hash-only and full-content interaction storage.
    pub fn content_mode(mut self, mode: ContentMode) -> Self {
        self.content_mode = mode;
        self
    }

    /// Set an explicit timestamp (defaults to now).
    pub fn timestamp(mut self, ts: DateTime<Utc>) -> Self {
        self.timestamp = Some(ts);
        self
    }

    /// Chain onto a predecessor receipt.
    pub fn previous(mut self, chain_hash: impl Into<String>, chain_length: u64) -> Self {
        self.previous_hash = chain_hash.into();
        self.previous_length = chain_length;
        self
    }

    /// Validate, then compute id and chain hash.
    pub fn build(self) -> Result<TrustReceipt, ValidationError> {
        if self.model.trim().is_empty() {
            return Err(ValidationError::MissingModel);
        }
        if self.session_id.trim().is_empty() {
            return Err(ValidationError::MissingSessionId);
        }
        if let Some(t) = &self.telemetry {
            t.validate()?;
        }

        let timestamp = self
            .timestamp
            .unwrap_or_else(Utc::now)
            .to_rfc3339_opts(SecondsFormat::Millis, true);

        let (prompt, response) = match self.content_mode {
            ContentMode::HashOnly => (None, None),
            ContentMode::Include => (Some(self.prompt.clone()), Some(self.response.clone())),
        };

        let interaction = Interaction {
            prompt,
            prompt_hash: Some(hash_content(&self.prompt)),
            response,
            response_hash: Some(hash_content(&self.response)),
            model: self.model,
        };

        let mut receipt = TrustReceipt {
            id: String::new(),
            version: RECEIPT_VERSION.to_string(),
            timestamp,
            session_id: self.session_id,
            agent_did: self.agent_did,
            human_did: self.human_did,
            interaction,
            telemetry: self.telemetry,
            chain: ChainLink {
                previous_hash: self.previous_hash,
                chain_hash: String::new(),
                chain_length: self.previous_length + 1,
            },
            signature: None,
        };

        receipt.id = receipt.compute_id()?;
        receipt.chain.chain_hash = receipt.compute_chain_hash()?;
        Ok(receipt)
    }
}
