//! Proptest generators for property-based testing.

use chrono::{DateTime, TimeZone, Utc};
use proptest::prelude::*;

use trust_kernel_core::{
    CiqMetrics, ContentMode, ReceiptBuilder, Signer, Telemetry, TrustReceipt,
};

/// Generate a signing seed.
pub fn seed() -> impl Strategy<Value = [u8; 32]> {
    any::<[u8; 32]>()
}

/// Generate a session identifier.
pub fn session_id() -> impl Strategy<Value = String> {
    "sess-[a-z0-9]{4,12}".prop_map(String::from)
}

/// Generate a DID-shaped identifier.
pub fn did() -> impl Strategy<Value = String> {
    "did:example:[a-z0-9]{4,16}".prop_map(String::from)
}

/// Generate prompt/response text.
pub fn text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 .,?!]{0,80}".prop_map(String::from)
}

/// Generate a score in `[0, 1]`.
pub fn score() -> impl Strategy<Value = f64> {
    (0u32..=1000).prop_map(|n| f64::from(n) / 1000.0)
}

/// Generate optional telemetry.
pub fn telemetry() -> impl Strategy<Value = Option<Telemetry>> {
    prop::option::of((
        prop::option::of(score()),
        prop::option::of(score()),
        prop::option::of(score()),
        prop::option::of((score(), score(), score())),
    )
        .prop_map(|(resonance, coherence, debt, ciq)| Telemetry {
            resonance_score: resonance,
            coherence_score: coherence,
            truth_debt: debt,
            ciq_metrics: ciq.map(|(clarity, integrity, quality)| CiqMetrics {
                clarity,
                integrity,
                quality,
            }),
        }))
}

/// Generate a timestamp in a sane range (2017..2027).
pub fn timestamp() -> impl Strategy<Value = DateTime<Utc>> {
    (1_500_000_000i64..1_800_000_000).prop_map(|secs| Utc.timestamp_opt(secs, 0).unwrap())
}

/// Parameters for generating a receipt.
#[derive(Debug, Clone)]
pub struct ReceiptParams {
    pub seed: [u8; 32],
    pub session_id: String,
    pub agent_did: String,
    pub human_did: String,
    pub prompt: String,
    pub response: String,
    pub model: String,
    pub telemetry: Option<Telemetry>,
    pub include_content: bool,
    pub timestamp: DateTime<Utc>,
}

impl Arbitrary for ReceiptParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            seed(),
            session_id(),
            did(),
            did(),
            text(),
            text(),
            "[a-z0-9-]{1,24}",
            telemetry(),
            any::<bool>(),
            timestamp(),
        )
            .prop_map(
                |(seed, session_id, agent, human, prompt, response, model, telemetry, include, ts)| {
                    ReceiptParams {
                        seed,
                        session_id,
                        agent_did: agent,
                        human_did: human,
                        prompt,
                        response,
                        model,
                        telemetry,
                        include_content: include,
                        timestamp: ts,
                    }
                },
            )
            .boxed()
    }
}

/// Generate a signed receipt from parameters.
pub fn receipt_from_params(params: &ReceiptParams) -> TrustReceipt {
    let mut builder = ReceiptBuilder::new(
        params.session_id.clone(),
        params.agent_did.clone(),
        params.human_did.clone(),
    )
    .prompt(params.prompt.clone())
    .response(params.response.clone())
    .model(params.model.clone())
    .timestamp(params.timestamp)
    .content_mode(if params.include_content {
        ContentMode::Include
    } else {
        ContentMode::HashOnly
    });

    if let Some(telemetry) = params.telemetry.clone() {
        builder = builder.telemetry(telemetry);
    }

    let receipt = builder.build().expect("generated receipt must build");
    Signer::from_seed(&params.seed, "v1")
        .sign_at(&receipt, params.timestamp)
        .expect("generated receipt must sign")
}
