//! Local secp256k1 signing key for personal messages.

use alloy_primitives::{hex, keccak256, Address};
use k256::ecdsa::signature::hazmat::PrehashSigner;
use k256::ecdsa::{SigningKey, VerifyingKey};
use rand::rngs::OsRng;

use crate::error::SignError;
use ethsig_verify::personal_message_hash;

/// A locally held secp256k1 signing key.
pub struct LocalSigningKey {
    key: SigningKey,
}

impl LocalSigningKey {
    /// Parse from a hex-encoded 32-byte secret (optional `0x` prefix).
    pub fn from_hex(secret: &str) -> Result<Self, SignError> {
        let bytes = hex::decode(secret).map_err(|e| SignError::KeyParse(e.to_string()))?;
        let key = SigningKey::from_slice(&bytes).map_err(|e| SignError::KeyParse(e.to_string()))?;
        Ok(Self { key })
    }

    /// Generate a fresh random key.
    pub fn random() -> Self {
        Self {
            key: SigningKey::random(&mut OsRng),
        }
    }

    /// The Ethereum address controlled by this key.
    pub fn address(&self) -> Address {
        let verifying_key = VerifyingKey::from(&self.key);
        let public_key = verifying_key.to_encoded_point(false);
        let hash = keccak256(&public_key.as_bytes()[1..]);
        Address::from_slice(&hash[12..])
    }

    /// Sign `message` under the EIP-191 `personal_sign` scheme.
    ///
    /// Returns the 65-byte `r || s || v` signature as `0x`-prefixed hex,
    /// with `v` in the legacy 27/28 form wallets emit.
    pub fn sign_personal(&self, message: &str) -> Result<String, SignError> {
        let digest = personal_message_hash(message);
        let (sig, recovery_id): (k256::ecdsa::Signature, k256::ecdsa::RecoveryId) = self
            .key
            .sign_prehash(digest.as_slice())
            .map_err(|e| SignError::Signing(e.to_string()))?;

        let mut raw = [0u8; 65];
        raw[..32].copy_from_slice(&sig.r().to_bytes());
        raw[32..64].copy_from_slice(&sig.s().to_bytes());
        raw[64] = 27 + recovery_id.to_byte();
        Ok(hex::encode_prefixed(raw))
    }
}
