//! Legacy receipt format and migration.
//!
//! Early receipts carried `self_hash` instead of `id`, a bare hex string
//! signature, and no chain block. They coexist on the wire with current
//! receipts, so the two formats are modeled as an explicit tagged union
//! rather than optional fields scattered through one struct.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::receipt::{
    ChainLink, Interaction, Telemetry, TrustReceipt, GENESIS_PREVIOUS_HASH, RECEIPT_VERSION,
};

/// Any receipt as it may arrive off the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReceiptDocument {
    /// Current format.
    V2(TrustReceipt),
    /// Pre-chain format, flagged for migration.
    V1(LegacyReceipt),
}

impl ReceiptDocument {
    /// Whether this document needs migration.
    pub fn is_legacy(&self) -> bool {
        matches!(self, ReceiptDocument::V1(_))
    }

    /// The current-format receipt, if this already is one.
    pub fn as_v2(&self) -> Option<&TrustReceipt> {
        match self {
            ReceiptDocument::V2(r) => Some(r),
            ReceiptDocument::V1(_) => None,
        }
    }
}

/// The pre-chain receipt shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyReceipt {
    /// Content hash under the old name.
    pub self_hash: String,

    pub version: String,
    pub timestamp: String,
    pub session_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_hash: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_hash: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Loose score map; known keys are lifted into telemetry on migration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scores: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev_receipt_hash: Option<String>,

    /// Bare hex signature over the old format's hash string.
    pub signature: String,
}

/// Placeholder model for migrated receipts that never recorded one.
pub const MIGRATED_UNKNOWN_MODEL: &str = "unknown";

/// Lift a legacy receipt into the current format.
///
/// The old signature covered the old byte layout, so it cannot be carried
/// over; the migrated receipt comes back unsigned with an empty chain hash
/// and must be re-issued to join a verified chain. `self_hash` is preserved
/// as the id so existing references keep resolving.
pub fn migrate(legacy: &LegacyReceipt) -> TrustReceipt {
    let telemetry = legacy.scores.as_ref().and_then(telemetry_from_scores);

    TrustReceipt {
        id: legacy.self_hash.clone(),
        version: RECEIPT_VERSION.to_string(),
        timestamp: legacy.timestamp.clone(),
        session_id: legacy.session_id.clone(),
        agent_did: legacy.agent_id.clone().unwrap_or_default(),
        human_did: String::new(),
        interaction: Interaction {
            prompt: None,
            prompt_hash: legacy.prompt_hash.clone(),
            response: None,
            response_hash: legacy.response_hash.clone(),
            model: legacy
                .model
                .clone()
                .unwrap_or_else(|| MIGRATED_UNKNOWN_MODEL.to_string()),
        },
        telemetry,
        chain: ChainLink {
            previous_hash: legacy
                .prev_receipt_hash
                .clone()
                .unwrap_or_else(|| GENESIS_PREVIOUS_HASH.to_string()),
            chain_hash: String::new(),
            chain_length: 1,
        },
        signature: None,
    }
}

fn telemetry_from_scores(scores: &Value) -> Option<Telemetry> {
    let map = scores.as_object()?;
    let get = |key: &str| map.get(key).and_then(Value::as_f64);

    let telemetry = Telemetry {
        resonance_score: get("resonance_score").or_else(|| get("resonance")),
        coherence_score: get("coherence_score").or_else(|| get("coherence")),
        truth_debt: get("truth_debt"),
        ciq_metrics: None,
    };

    if telemetry == Telemetry::default() {
        None
    } else {
        Some(telemetry)
    }
}
