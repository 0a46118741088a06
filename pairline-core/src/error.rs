use thiserror::Error;

/// Failures surfaced to the caller of a peer operation.
///
/// Per-candidate gathering failures are not represented here: they are
/// published as [`crate::PeerEvent::Error`] and never fail an operation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PeerError {
    /// The stack could not produce an offer/answer or commit a description.
    #[error("negotiation failed: {0}")]
    Negotiation(String),

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("invalid signal: {0}")]
    InvalidSignal(String),

    #[error("operation not allowed while {0}")]
    InvalidState(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl From<serde_json::Error> for PeerError {
    fn from(err: serde_json::Error) -> Self {
        PeerError::InvalidSignal(err.to_string())
    }
}
