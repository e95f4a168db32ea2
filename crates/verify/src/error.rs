//! Error types for signature parsing and recovery.

use thiserror::Error;

/// Errors produced while parsing a signature or recovering its signer.
#[derive(Debug, Error)]
pub enum VerifyError {
    /// The signature string is not valid hex.
    #[error("signature is not valid hex: {0}")]
    SignatureHex(#[from] alloy_primitives::hex::FromHexError),

    /// The decoded signature has the wrong byte length.
    #[error("signature must be 65 bytes, got {0}")]
    SignatureLength(usize),

    /// The recovery byte is not 0, 1, 27 or 28.
    #[error("invalid recovery id: {0}")]
    RecoveryId(u8),

    /// Elliptic-curve recovery rejected the signature components.
    #[error("signature recovery failed: {0}")]
    Recovery(#[from] secp256k1::Error),
}
