//! Ethereum personal-message signature verification.
//!
//! Implements signer recovery for the EIP-191 `personal_sign` scheme: the
//! message is prefixed with `"\x19Ethereum Signed Message:\n" + len`, hashed
//! with keccak256, and the ECDSA signature over that digest is resolved back
//! to the address that produced it.
//!
//! Verification here means *recovery*: a signature is valid whenever an
//! address can be recovered from it. No comparison against an expected
//! signer is performed; callers that need a "prove you control address X"
//! flow must compare the recovered address themselves.
//!
//! # Example
//!
//! ```rust,no_run
//! use ethsig_verify::verify_message;
//!
//! let outcome = verify_message("hello world", "0x...signature...");
//! if let Some(signer) = outcome.signer() {
//!     println!("signed by {signer}");
//! }
//! ```

pub mod error;
pub mod outcome;
pub mod recovery;

pub use error::VerifyError;
pub use outcome::{
    rfc3339_timestamp, verify_message, VerificationFailure, VerificationOutcome,
    VerificationRequest, VerifiedSignature, CODE_VERIFICATION_FAILED, VERIFICATION_METHOD,
};
pub use recovery::{
    parse_signature, personal_message_hash, recover_address, recover_personal_signer,
};
