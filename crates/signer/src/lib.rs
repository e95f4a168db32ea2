//! Local signing toolkit for Ethereum personal messages.
//!
//! Three pieces, all small:
//!
//! - [`LocalSigningKey`]: a secp256k1 key that signs under the EIP-191
//!   `personal_sign` scheme, producing signatures [`ethsig_verify`] can
//!   recover.
//! - [`SignerChain`]: signing backends differ in what they can do, so
//!   signing is a prioritized list of named strategies tried in order until
//!   one succeeds.
//! - [`HistoryStore`]: an explicit store interface for signed-message
//!   history (append, list, clear) with in-memory and JSON-file
//!   implementations.

pub mod error;
pub mod history;
pub mod key;
pub mod strategy;

pub use error::{HistoryError, SignError};
pub use history::{HistoryEntry, HistoryStore, InMemoryHistory, JsonFileHistory};
pub use key::LocalSigningKey;
pub use strategy::{
    Attempt, ConfiguredKey, EnvKey, EphemeralKey, SignedMessage, SignerChain, SigningStrategy,
    SIGNING_KEY_ENV,
};
