//! Error types for the signing toolkit.

use thiserror::Error;

use crate::strategy::Attempt;

/// Errors from signing keys and strategies.
#[derive(Debug, Error)]
pub enum SignError {
    /// The provided secret key could not be parsed.
    #[error("invalid signing key: {0}")]
    KeyParse(String),

    /// The ECDSA signing operation itself failed.
    #[error("signing failed: {0}")]
    Signing(String),

    /// The strategy cannot run in the current environment.
    #[error("strategy unavailable: {0}")]
    Unavailable(String),

    /// Every strategy in the chain was tried and failed.
    #[error("no signing strategy succeeded: {}", format_attempts(attempts))]
    AllStrategiesFailed { attempts: Vec<Attempt> },
}

fn format_attempts(attempts: &[Attempt]) -> String {
    attempts
        .iter()
        .map(|a| format!("{}: {}", a.strategy, a.error))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors from history stores.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("history I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("history serialization failed: {0}")]
    Serde(#[from] serde_json::Error),
}
