//! Signer recovery for EIP-191 personal messages.

use alloy_primitives::{
    eip191_hash_message, hex, keccak256, Address, PrimitiveSignature, B256, U256,
};
use secp256k1::ecdsa::{RecoverableSignature, RecoveryId};
use secp256k1::{All, Message, Secp256k1};
use std::sync::OnceLock;

use crate::error::VerifyError;

/// Hash a message under the EIP-191 `personal_sign` prefix.
///
/// The prefix makes signed messages distinguishable from signed
/// transactions, so a signature obtained here can never replay as one.
pub fn personal_message_hash(message: &str) -> B256 {
    eip191_hash_message(message.as_bytes())
}

/// Parse a hex-encoded 65-byte `r || s || v` signature.
///
/// Accepts an optional `0x` prefix. The recovery byte may be 0/1 or the
/// legacy 27/28 form that wallets emit.
pub fn parse_signature(signature: &str) -> Result<PrimitiveSignature, VerifyError> {
    let bytes = hex::decode(signature)?;
    if bytes.len() != 65 {
        return Err(VerifyError::SignatureLength(bytes.len()));
    }

    let v = match bytes[64] {
        0 | 27 => false,
        1 | 28 => true,
        other => return Err(VerifyError::RecoveryId(other)),
    };
    let r = U256::from_be_slice(&bytes[..32]);
    let s = U256::from_be_slice(&bytes[32..64]);
    Ok(PrimitiveSignature::new(r, s, v))
}

/// Recover the address that produced `signature` over `message_hash`.
pub fn recover_address(
    message_hash: B256,
    signature: &PrimitiveSignature,
) -> Result<Address, VerifyError> {
    let mut compact = [0u8; 64];
    compact[..32].copy_from_slice(&signature.r().to_be_bytes::<32>());
    compact[32..].copy_from_slice(&signature.s().to_be_bytes::<32>());

    let recid = RecoveryId::from_i32(if signature.v() { 1 } else { 0 })?;
    let recoverable = RecoverableSignature::from_compact(&compact, recid)?;

    let msg = Message::from_digest_slice(message_hash.as_slice())?;
    let pubkey = secp().recover_ecdsa(&msg, &recoverable)?;
    let uncompressed = pubkey.serialize_uncompressed();
    let hash = keccak256(&uncompressed[1..]);
    Ok(Address::from_slice(&hash[12..]))
}

/// Recover the signer of a personal message from its hex-encoded signature.
pub fn recover_personal_signer(message: &str, signature: &str) -> Result<Address, VerifyError> {
    let parsed = parse_signature(signature)?;
    recover_address(personal_message_hash(message), &parsed)
}

fn secp() -> &'static Secp256k1<All> {
    static SECP: OnceLock<Secp256k1<All>> = OnceLock::new();
    SECP.get_or_init(Secp256k1::new)
}
