//! Detached Ed25519 signing of trust receipts.
//!
//! Signing happens strictly after chain-hash computation: the signature
//! covers the canonical receipt body with `chain_hash` already populated,
//! so a signed receipt attests to its position in the session chain.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::crypto::{Ed25519PublicKey, Keypair};
use crate::error::SigningError;
use crate::receipt::{ReceiptSignature, TrustReceipt, SIGNATURE_ALGORITHM};

/// Signs receipts with a versioned Ed25519 key.
///
/// `key_version` travels inside the signature object so verifiers can select
/// the matching public key after a rotation.
#[derive(Clone)]
pub struct Signer {
    keypair: Keypair,
    key_version: String,
}

impl Signer {
    /// Create a signer from an existing keypair.
    pub fn new(keypair: Keypair, key_version: impl Into<String>) -> Self {
        Self {
            keypair,
            key_version: key_version.into(),
        }
    }

    /// Create a signer from a 32-byte seed.
    pub fn from_seed(seed: &[u8; 32], key_version: impl Into<String>) -> Self {
        Self::new(Keypair::from_seed(seed), key_version)
    }

    /// Create a signer from a hex-encoded seed.
    pub fn from_hex_seed(seed: &str, key_version: impl Into<String>) -> Result<Self, SigningError> {
        let keypair = Keypair::from_hex_seed(seed)
            .map_err(|e| SigningError::InvalidKeyMaterial(e.to_string()))?;
        Ok(Self::new(keypair, key_version))
    }

    /// The public key for this signer's key material.
    pub fn public_key(&self) -> Ed25519PublicKey {
        self.keypair.public_key()
    }

    /// The key version stamped into produced signatures.
    pub fn key_version(&self) -> &str {
        &self.key_version
    }

    /// Sign a receipt, returning a new signed copy.
    ///
    /// The input is not mutated. Fails if the chain hash has not been
    /// computed yet.
    pub fn sign(&self, receipt: &TrustReceipt) -> Result<TrustReceipt, SigningError> {
        self.sign_at(receipt, Utc::now())
    }

    /// Sign with an explicit signature timestamp.
    ///
    /// `timestamp_signed` is metadata outside the signed bytes, but fixing it
    /// keeps whole-receipt fixtures reproducible.
    pub fn sign_at(
        &self,
        receipt: &TrustReceipt,
        signed_at: DateTime<Utc>,
    ) -> Result<TrustReceipt, SigningError> {
        if receipt.chain.chain_hash.is_empty() {
            return Err(SigningError::ChainHashMissing);
        }

        let message = receipt
            .signing_bytes()
            .map_err(|e| SigningError::Encoding(e.to_string()))?;
        let signature = self.keypair.sign(&message);

        let mut signed = receipt.clone();
        signed.signature = Some(ReceiptSignature {
            algorithm: SIGNATURE_ALGORITHM.to_string(),
            value: signature.to_hex(),
            key_version: self.key_version.clone(),
            timestamp_signed: signed_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        });
        Ok(signed)
    }
}

impl std::fmt::Debug for Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signer")
            .field("public_key", &self.public_key())
            .field("key_version", &self.key_version)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::Ed25519Signature;
    use crate::receipt::ReceiptBuilder;
    use chrono::TimeZone;

    fn make_receipt() -> TrustReceipt {
        ReceiptBuilder::new("sess-1", "did:example:agent", "did:example:human")
            .prompt("p")
            .response("r")
            .model("atlas-9b")
            .timestamp(Utc.with_ymd_and_hms(2026, 8, 5, 12, 0, 0).unwrap())
            .build()
            .unwrap()
    }

    #[test]
    fn test_sign_produces_new_receipt() {
        let signer = Signer::from_seed(&[0x42; 32], "v1");
        let receipt = make_receipt();

        let signed = signer.sign(&receipt).unwrap();

        assert!(!receipt.is_signed());
        assert!(signed.is_signed());
        let sig = signed.signature.as_ref().unwrap();
        assert_eq!(sig.algorithm, SIGNATURE_ALGORITHM);
        assert_eq!(sig.key_version, "v1");
        assert_eq!(sig.value.len(), 128);
    }

    #[test]
    fn test_signature_verifies_over_signing_bytes() {
        let signer = Signer::from_seed(&[0x42; 32], "v1");
        let signed = signer.sign(&make_receipt()).unwrap();

        let message = signed.signing_bytes().unwrap();
        let sig = Ed25519Signature::from_hex(&signed.signature.as_ref().unwrap().value).unwrap();
        signer.public_key().verify(&message, &sig).unwrap();
    }

    #[test]
    fn test_signature_deterministic_for_same_receipt() {
        let signer = Signer::from_seed(&[0x42; 32], "v1");
        let receipt = make_receipt();
        let s1 = signer.sign(&receipt).unwrap();
        let s2 = signer.sign(&receipt).unwrap();
        assert_eq!(
            s1.signature.as_ref().unwrap().value,
            s2.signature.as_ref().unwrap().value
        );
    }

    #[test]
    fn test_refuses_missing_chain_hash() {
        let signer = Signer::from_seed(&[0x42; 32], "v1");
        let mut receipt = make_receipt();
        receipt.chain.chain_hash.clear();

        let err = signer.sign(&receipt).unwrap_err();
        assert!(matches!(err, SigningError::ChainHashMissing));
    }

    #[test]
    fn test_bad_hex_seed_is_fatal() {
        let err = Signer::from_hex_seed("not-hex", "v1").unwrap_err();
        assert!(matches!(err, SigningError::InvalidKeyMaterial(_)));

        // Wrong length.
        let err = Signer::from_hex_seed("abcd", "v1").unwrap_err();
        assert!(matches!(err, SigningError::InvalidKeyMaterial(_)));
    }

    #[test]
    fn test_signed_at_stamps_timestamp() {
        let signer = Signer::from_seed(&[0x42; 32], "v1");
        let at = Utc.with_ymd_and_hms(2026, 8, 5, 12, 30, 0).unwrap();
        let signed = signer.sign_at(&make_receipt(), at).unwrap();
        assert_eq!(
            signed.signature.unwrap().timestamp_signed,
            "2026-08-05T12:30:00.000Z"
        );
    }
}
