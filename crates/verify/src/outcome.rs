//! Verification request and outcome wire types.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::recovery::recover_personal_signer;

/// Tag identifying the verification scheme in success responses.
pub const VERIFICATION_METHOD: &str = "ethereum_personal_sign";

/// Stable error code attached to failed verifications.
pub const CODE_VERIFICATION_FAILED: &str = "VERIFICATION_FAILED";

/// A message/signature pair submitted for verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationRequest {
    pub message: String,
    pub signature: String,
}

/// Successful verification: the signature recovers to `signer`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiedSignature {
    pub is_valid: bool,
    /// EIP-55 checksummed recovered address.
    pub signer: String,
    pub original_message: String,
    pub signature: String,
    pub verification_method: String,
    pub timestamp: String,
}

/// Failed verification: the signature could not be parsed or recovered.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationFailure {
    pub is_valid: bool,
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    pub timestamp: String,
}

/// Outcome of verifying a message/signature pair.
///
/// Serialized flat: the variants share the `isValid` discriminator field
/// rather than an enum tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VerificationOutcome {
    Valid(VerifiedSignature),
    Invalid(VerificationFailure),
}

impl VerificationOutcome {
    /// Whether recovery succeeded.
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    /// The recovered signer, if recovery succeeded.
    pub fn signer(&self) -> Option<&str> {
        match self {
            Self::Valid(v) => Some(&v.signer),
            Self::Invalid(_) => None,
        }
    }
}

/// Verify a personal-sign signature over `message`.
///
/// Recovers the address the signature implies and reports it. Any signature
/// that parses and recovers is valid regardless of which address comes out;
/// deciding whether that address is the *expected* one is the caller's job.
pub fn verify_message(message: &str, signature: &str) -> VerificationOutcome {
    match recover_personal_signer(message, signature) {
        Ok(signer) => VerificationOutcome::Valid(VerifiedSignature {
            is_valid: true,
            signer: signer.to_checksum(None),
            original_message: message.to_string(),
            signature: signature.to_string(),
            verification_method: VERIFICATION_METHOD.to_string(),
            timestamp: rfc3339_timestamp(),
        }),
        Err(err) => VerificationOutcome::Invalid(VerificationFailure {
            is_valid: false,
            error: err.to_string(),
            code: CODE_VERIFICATION_FAILED.to_string(),
            original_message: Some(message.to_string()),
            signature: Some(signature.to_string()),
            timestamp: rfc3339_timestamp(),
        }),
    }
}

/// Current UTC time as an ISO-8601 string with millisecond precision.
pub fn rfc3339_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::recovery::personal_message_hash;
    use alloy_primitives::{hex, keccak256, Address};
    use k256::ecdsa::signature::hazmat::PrehashSigner;
    use k256::ecdsa::{SigningKey, VerifyingKey};
    use rand::rngs::OsRng;

    fn sign_personal(signing_key: &SigningKey, message: &str) -> String {
        let digest = personal_message_hash(message);
        let (sig, recovery_id): (k256::ecdsa::Signature, k256::ecdsa::RecoveryId) = signing_key
            .sign_prehash(digest.as_slice())
            .expect("sign");
        let mut raw = [0u8; 65];
        raw[..32].copy_from_slice(&sig.r().to_bytes());
        raw[32..64].copy_from_slice(&sig.s().to_bytes());
        raw[64] = 27 + recovery_id.to_byte();
        hex::encode_prefixed(raw)
    }

    fn get_address(signing_key: &SigningKey) -> Address {
        let verifying_key = VerifyingKey::from(signing_key);
        let public_key = verifying_key.to_encoded_point(false);
        let hash = keccak256(&public_key.as_bytes()[1..]);
        Address::from_slice(&hash[12..])
    }

    #[test]
    fn test_verify_message_success_shape() {
        let key = SigningKey::random(&mut OsRng);
        let signature = sign_personal(&key, "hello world");

        let outcome = verify_message("hello world", &signature);
        assert!(outcome.is_valid());

        match outcome {
            VerificationOutcome::Valid(v) => {
                assert_eq!(v.signer, get_address(&key).to_checksum(None));
                assert_eq!(v.original_message, "hello world");
                assert_eq!(v.signature, signature);
                assert_eq!(v.verification_method, VERIFICATION_METHOD);
                assert!(!v.timestamp.is_empty());
            }
            VerificationOutcome::Invalid(f) => panic!("expected valid outcome, got {:?}", f),
        }
    }

    #[test]
    fn test_verify_message_failure_shape() {
        let outcome = verify_message("hello world", "0xdeadbeef");
        assert!(!outcome.is_valid());
        assert!(outcome.signer().is_none());

        match outcome {
            VerificationOutcome::Invalid(f) => {
                assert_eq!(f.code, CODE_VERIFICATION_FAILED);
                assert_eq!(f.original_message.as_deref(), Some("hello world"));
                assert_eq!(f.signature.as_deref(), Some("0xdeadbeef"));
                assert!(f.error.contains("65 bytes"));
            }
            VerificationOutcome::Valid(_) => panic!("expected failure outcome"),
        }
    }

    /// A signature over a different message still recovers *an* address.
    /// There is no expected-signer comparison, so the outcome is valid even
    /// though the recovered address is not the original signer's.
    #[test]
    fn test_cross_message_signature_still_recovers() {
        let key = SigningKey::random(&mut OsRng);
        let signature = sign_personal(&key, "the message I actually signed");

        let outcome = verify_message("a different message", &signature);
        assert!(outcome.is_valid());
        assert_ne!(
            outcome.signer().unwrap(),
            get_address(&key).to_checksum(None)
        );
    }

    #[test]
    fn test_verification_is_deterministic() {
        let key = SigningKey::random(&mut OsRng);
        let signature = sign_personal(&key, "idempotent");

        let first = verify_message("idempotent", &signature);
        let second = verify_message("idempotent", &signature);
        assert_eq!(first.signer(), second.signer());
    }

    #[test]
    fn test_outcome_json_uses_camel_case() {
        let key = SigningKey::random(&mut OsRng);
        let signature = sign_personal(&key, "wire shape");

        let outcome = verify_message("wire shape", &signature);
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["isValid"], true);
        assert_eq!(json["originalMessage"], "wire shape");
        assert_eq!(json["verificationMethod"], VERIFICATION_METHOD);
        assert!(json["signer"].as_str().unwrap().starts_with("0x"));

        let failure = verify_message("wire shape", "0x00");
        let json = serde_json::to_value(&failure).unwrap();
        assert_eq!(json["isValid"], false);
        assert_eq!(json["code"], CODE_VERIFICATION_FAILED);
    }

    #[test]
    fn test_outcome_json_round_trip() {
        let key = SigningKey::random(&mut OsRng);
        let signature = sign_personal(&key, "round trip");

        let outcome = verify_message("round trip", &signature);
        let json = serde_json::to_string(&outcome).unwrap();
        let parsed: VerificationOutcome = serde_json::from_str(&json).unwrap();
        assert!(parsed.is_valid());
        assert_eq!(parsed.signer(), outcome.signer());
    }
}
