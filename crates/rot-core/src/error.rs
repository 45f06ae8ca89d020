//! Error types for random OT and signature operations

use crate::ot::Phase;
use thiserror::Error;

/// Result type alias for rot-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during setup, OT execution or signature handling
#[derive(Debug, Error)]
pub enum Error {
    /// The sender's setup proof did not verify
    #[error("Schnorr proof of the setup key failed to verify")]
    ProofInvalid,

    /// The receiver's round 2 response does not match the sender's commitment
    #[error("Invalid response from OT receiver")]
    InvalidResponse,

    /// The sender's decommitments do not match its challenge
    #[error("Incorrect decommitment from OT sender")]
    DecommitmentMismatch,

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Deserialization error
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// The oracle key must be exactly `expected` bytes
    #[error("Invalid nonce length: expected {expected}, got {actual}")]
    InvalidNonceLength { expected: usize, actual: usize },

    /// A session round was called out of order
    #[error("Unexpected call to {operation} while {phase:?}")]
    UnexpectedRound {
        phase: Phase,
        operation: &'static str,
    },

    /// Malformed signature
    #[error("Invalid signature: {0}")]
    InvalidSignature(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
