//! Golden test vectors for cross-implementation verification.
//!
//! Every implementation of the trust receipt format must produce identical:
//! - canonical signing body (byte for byte)
//! - receipt id and chain hash (SHA-256 hex)
//! - Ed25519 signature (deterministic per RFC 8032)
//!
//! The expected values below were produced independently of this crate;
//! any divergence in canonicalization, hashing, or signing shows up here.

use chrono::{DateTime, Utc};
use trust_kernel::core::{
    hash_content, verify_receipt, CiqMetrics, ContentMode, ReceiptBuilder, Signer, Telemetry,
    TrustReceipt, VerifierConfig,
};

const SEED_42: [u8; 32] = [0x42; 32];
const SEED_01: [u8; 32] = [0x01; 32];

const PROMPT_1: &str = "What is the weather today?";
const RESPONSE_1: &str = "I cannot access live weather data.";
const PROMPT_2: &str = "Summarize my account history.";
const RESPONSE_2: &str = "Your account shows three transactions this month.";

fn ts(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
}

fn verifier_at(now: &str) -> VerifierConfig {
    VerifierConfig {
        now: Some(ts(now)),
        ..VerifierConfig::default()
    }
}

/// Vector 1: genesis receipt, hash-only content, full telemetry, seed 0x42.
fn vector_one() -> TrustReceipt {
    let receipt = ReceiptBuilder::new("sess-demo-001", "did:example:agent-1", "did:example:human-1")
        .prompt(PROMPT_1)
        .response(RESPONSE_1)
        .model("atlas-9b")
        .timestamp(ts("2026-08-05T12:00:00.000Z"))
        .telemetry(Telemetry {
            resonance_score: Some(0.75),
            coherence_score: Some(0.875),
            truth_debt: Some(0.125),
            ciq_metrics: Some(CiqMetrics {
                clarity: 0.9,
                integrity: 0.8,
                quality: 0.7,
            }),
        })
        .build()
        .unwrap();

    Signer::from_seed(&SEED_42, "v1")
        .sign_at(&receipt, ts("2026-08-05T12:00:00.000Z"))
        .unwrap()
}

/// Vector 2: chained onto vector 1, partial telemetry, same key.
fn vector_two(previous: &TrustReceipt) -> TrustReceipt {
    let receipt = ReceiptBuilder::new("sess-demo-001", "did:example:agent-1", "did:example:human-1")
        .prompt(PROMPT_2)
        .response(RESPONSE_2)
        .model("atlas-9b")
        .timestamp(ts("2026-08-05T12:00:01.000Z"))
        .telemetry(Telemetry {
            coherence_score: Some(0.625),
            truth_debt: Some(0.25),
            ..Telemetry::default()
        })
        .previous(previous.chain.chain_hash.clone(), previous.chain.chain_length)
        .build()
        .unwrap();

    Signer::from_seed(&SEED_42, "v1")
        .sign_at(&receipt, ts("2026-08-05T12:00:01.000Z"))
        .unwrap()
}

/// Vector 3: genesis receipt with embedded content, no telemetry, seed 0x01.
fn vector_three() -> TrustReceipt {
    let receipt = ReceiptBuilder::new("sess-demo-002", "did:example:agent-2", "did:example:human-2")
        .prompt("hello")
        .response("hi there")
        .model("atlas-9b")
        .content_mode(ContentMode::Include)
        .timestamp(ts("2026-08-05T12:00:02.000Z"))
        .build()
        .unwrap();

    Signer::from_seed(&SEED_01, "v2")
        .sign_at(&receipt, ts("2026-08-05T12:00:02.000Z"))
        .unwrap()
}

#[test]
fn golden_content_hashes() {
    assert_eq!(
        hash_content(PROMPT_1),
        "614ac257710c8f68eff926b47176465ad08b0b7418e7db1c828457224b5badb3"
    );
    assert_eq!(
        hash_content(RESPONSE_1),
        "53c3842e6fa53836b85b28b53c927463d7541c671dbf6d896103efeb16a5904e"
    );
    assert_eq!(
        hash_content("hello"),
        "5aa762ae383fbb727af3c7a36d4940a5b8c40a989452d2304fc958ff3f354e7a"
    );
}

#[test]
fn golden_vector_one_identity() {
    let receipt = vector_one();
    assert_eq!(
        receipt.id,
        "ed4c3166edbb5225db78bf71cc67f4b00df66d215df0b216693db84fb37efcf6"
    );
    assert_eq!(
        receipt.chain.chain_hash,
        "51c8bfdefa069997397e6f8c887f982997cde5fd2b4600a979c50da7581b3796"
    );
}

#[test]
fn golden_vector_one_signing_body() {
    let receipt = vector_one();
    let body = String::from_utf8(receipt.signing_bytes().unwrap()).unwrap();
    assert_eq!(
        body,
        "{\"agent_did\":\"did:example:agent-1\",\
         \"chain\":{\"chain_hash\":\"51c8bfdefa069997397e6f8c887f982997cde5fd2b4600a979c50da7581b3796\",\
         \"chain_length\":1,\"previous_hash\":\"GENESIS\"},\
         \"human_did\":\"did:example:human-1\",\
         \"id\":\"ed4c3166edbb5225db78bf71cc67f4b00df66d215df0b216693db84fb37efcf6\",\
         \"interaction\":{\"model\":\"atlas-9b\",\
         \"prompt_hash\":\"614ac257710c8f68eff926b47176465ad08b0b7418e7db1c828457224b5badb3\",\
         \"response_hash\":\"53c3842e6fa53836b85b28b53c927463d7541c671dbf6d896103efeb16a5904e\"},\
         \"session_id\":\"sess-demo-001\",\
         \"telemetry\":{\"ciq_metrics\":{\"clarity\":0.9,\"integrity\":0.8,\"quality\":0.7},\
         \"coherence_score\":0.875,\"resonance_score\":0.75,\"truth_debt\":0.125},\
         \"timestamp\":\"2026-08-05T12:00:00.000Z\",\"version\":\"1.0\"}"
    );
}

#[test]
fn golden_vector_one_signature() {
    let receipt = vector_one();
    assert_eq!(
        receipt.signature.as_ref().unwrap().value,
        "8e2c56f3f81e028e99ebd6e1522517a609de51ac6b2a90454303aba68a7abe84\
         b050951b3541dd50fb9fbe437dde183abfe07d61a55b9db400923d7e964a470c"
    );
}

#[test]
fn golden_vector_two_chains_from_one() {
    let r1 = vector_one();
    let r2 = vector_two(&r1);

    assert_eq!(r2.chain.previous_hash, r1.chain.chain_hash);
    assert_eq!(r2.chain.chain_length, 2);
    assert_eq!(
        r2.id,
        "31607fd390af0d9b272ec6eee1ba1e31fcba41a3641a46078c0aa261e0d04fa8"
    );
    assert_eq!(
        r2.chain.chain_hash,
        "815af9541f8a00103dfaff944aecf50b58a7d991c49b11076ce210950efff599"
    );
    assert_eq!(
        r2.signature.as_ref().unwrap().value,
        "d0ce71e9b29d95ffa503b95b6ee54cd2a223def2ad3fcffd075eb4369e227f0d\
         56974fa8ea247b0fa98290d7615055165627c4666c576431b78ae8f06c4d4c0d"
    );
}

#[test]
fn golden_vector_three_embedded_content() {
    let receipt = vector_three();

    assert_eq!(receipt.interaction.prompt.as_deref(), Some("hello"));
    assert_eq!(receipt.interaction.response.as_deref(), Some("hi there"));
    assert_eq!(
        receipt.id,
        "699e2464c47b24d460fab1a6b30da318c938ea49fae022b5f15d899178459ddc"
    );
    assert_eq!(
        receipt.chain.chain_hash,
        "4efad0a0b1155904444cfdb098f75370da6d92a241d75bbecc71a8257e8e22b6"
    );
    assert_eq!(
        receipt.signature.as_ref().unwrap().value,
        "efc144351c369044073b6d2c5dd2b3dd4c8a7e7e89bffa54d9ed342bda5c2451\
         f04de8c679720de8548904f9451727a40440cc259b606cd3b6a8fa4e80a06303"
    );
}

#[test]
fn golden_vectors_verify() {
    let config = verifier_at("2026-08-05T12:30:00.000Z");

    let r1 = vector_one();
    let signer_42 = Signer::from_seed(&SEED_42, "v1");
    let report = verify_receipt(&r1, &signer_42.public_key(), &config);
    assert!(report.valid, "vector 1 errors: {:?}", report.errors);

    let r2 = vector_two(&r1);
    let report = verify_receipt(&r2, &signer_42.public_key(), &config);
    assert!(report.valid, "vector 2 errors: {:?}", report.errors);

    let r3 = vector_three();
    let signer_01 = Signer::from_seed(&SEED_01, "v2");
    let report = verify_receipt(&r3, &signer_01.public_key(), &config);
    assert!(report.valid, "vector 3 errors: {:?}", report.errors);
}

#[test]
fn golden_vectors_deterministic() {
    // Regenerate each vector twice; everything derived must be identical.
    let a = vector_one();
    let b = vector_one();
    assert_eq!(a.id, b.id);
    assert_eq!(a.chain.chain_hash, b.chain.chain_hash);
    assert_eq!(
        a.signature.as_ref().unwrap().value,
        b.signature.as_ref().unwrap().value
    );
}

#[test]
fn golden_public_keys() {
    assert_eq!(
        Signer::from_seed(&SEED_42, "v1").public_key().to_hex(),
        "2152f8d19b791d24453242e15f2eab6cb7cffa7b6a5ed30097960e069881db12"
    );
    assert_eq!(
        Signer::from_seed(&SEED_01, "v2").public_key().to_hex(),
        "8a88e3dd7409f195fd52db2d3cba5d72ca6709bf1d94121bf3748801b40f6f5c"
    );
}
