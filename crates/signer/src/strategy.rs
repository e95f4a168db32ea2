//! Prioritized signing strategies.
//!
//! Signing backends differ in which capabilities they expose, so signing is
//! modeled as an ordered list of named strategies. Each strategy is asked in
//! turn until one produces a signature; the result is tagged with the name
//! of the strategy that succeeded.

use serde::{Deserialize, Serialize};

use crate::error::SignError;
use crate::key::LocalSigningKey;

/// Environment variable consulted by [`EnvKey`].
pub const SIGNING_KEY_ENV: &str = "ETHSIG_SIGNING_KEY";

/// A successfully signed message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedMessage {
    pub message: String,
    /// 65-byte `r || s || v` signature, 0x-prefixed hex.
    pub signature: String,
    /// EIP-55 checksummed address of the signing key.
    pub signer: String,
    /// Name of the strategy that produced the signature.
    pub method: String,
}

/// One failed signing attempt, recorded while walking the chain.
#[derive(Debug, Clone)]
pub struct Attempt {
    pub strategy: &'static str,
    pub error: String,
}

/// A named way of producing a personal-sign signature.
pub trait SigningStrategy: Send + Sync {
    /// Strategy name, reported on success and failure.
    fn name(&self) -> &'static str;

    /// Attempt to sign `message`.
    fn sign(&self, message: &str) -> Result<SignedMessage, SignError>;
}

fn signed_with(key: &LocalSigningKey, message: &str, method: &str) -> Result<SignedMessage, SignError> {
    let signature = key.sign_personal(message)?;
    Ok(SignedMessage {
        message: message.to_string(),
        signature,
        signer: key.address().to_checksum(None),
        method: method.to_string(),
    })
}

/// Sign with an explicitly configured secret key.
pub struct ConfiguredKey {
    key: LocalSigningKey,
}

impl ConfiguredKey {
    /// Parse the hex secret up front so misconfiguration fails fast.
    pub fn new(secret_hex: &str) -> Result<Self, SignError> {
        Ok(Self {
            key: LocalSigningKey::from_hex(secret_hex)?,
        })
    }

    pub fn from_key(key: LocalSigningKey) -> Self {
        Self { key }
    }
}

impl SigningStrategy for ConfiguredKey {
    fn name(&self) -> &'static str {
        "configured_key"
    }

    fn sign(&self, message: &str) -> Result<SignedMessage, SignError> {
        signed_with(&self.key, message, self.name())
    }
}

/// Sign with a key read from the `ETHSIG_SIGNING_KEY` environment variable.
pub struct EnvKey;

impl SigningStrategy for EnvKey {
    fn name(&self) -> &'static str {
        "env_key"
    }

    fn sign(&self, message: &str) -> Result<SignedMessage, SignError> {
        let secret = std::env::var(SIGNING_KEY_ENV)
            .map_err(|_| SignError::Unavailable(format!("{SIGNING_KEY_ENV} is not set")))?;
        let key = LocalSigningKey::from_hex(&secret)?;
        signed_with(&key, message, self.name())
    }
}

/// Sign with a wallet created on demand: a fresh random key generated when
/// the strategy is constructed and held for its lifetime.
pub struct EphemeralKey {
    key: LocalSigningKey,
}

impl EphemeralKey {
    pub fn new() -> Self {
        Self {
            key: LocalSigningKey::random(),
        }
    }
}

impl Default for EphemeralKey {
    fn default() -> Self {
        Self::new()
    }
}

impl SigningStrategy for EphemeralKey {
    fn name(&self) -> &'static str {
        "ephemeral_key"
    }

    fn sign(&self, message: &str) -> Result<SignedMessage, SignError> {
        signed_with(&self.key, message, self.name())
    }
}

/// An ordered chain of signing strategies.
pub struct SignerChain {
    strategies: Vec<Box<dyn SigningStrategy>>,
}

impl SignerChain {
    /// An empty chain. Every sign attempt fails until strategies are pushed.
    pub fn new() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }

    /// Append a strategy at the lowest priority.
    pub fn push(mut self, strategy: impl SigningStrategy + 'static) -> Self {
        self.strategies.push(Box::new(strategy));
        self
    }

    /// Default priority order: an explicitly provisioned env key first,
    /// falling back to an on-demand ephemeral wallet.
    pub fn standard() -> Self {
        Self::new().push(EnvKey).push(EphemeralKey::new())
    }

    /// Try each strategy in priority order until one signs.
    ///
    /// When every strategy fails, the error carries each attempted strategy
    /// and the error it produced.
    pub fn sign(&self, message: &str) -> Result<SignedMessage, SignError> {
        let mut attempts = Vec::new();

        for strategy in &self.strategies {
            match strategy.sign(message) {
                Ok(signed) => {
                    tracing::debug!(strategy = strategy.name(), "message signed");
                    return Ok(signed);
                }
                Err(err) => {
                    tracing::debug!(
                        strategy = strategy.name(),
                        error = %err,
                        "signing strategy failed, trying next"
                    );
                    attempts.push(Attempt {
                        strategy: strategy.name(),
                        error: err.to_string(),
                    });
                }
            }
        }

        Err(SignError::AllStrategiesFailed { attempts })
    }
}

impl Default for SignerChain {
    fn default() -> Self {
        Self::new()
    }
}
