use crate::error::PeerError;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SdpKind {
    Offer,
    Answer,
}

impl fmt::Display for SdpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SdpKind::Offer => f.write_str("offer"),
            SdpKind::Answer => f.write_str("answer"),
        }
    }
}

/// Snapshot of local or remote session parameters.
///
/// Serializes to the same `{"type": ..., "sdp": ...}` shape browsers use, so
/// the text an operator copies can be pasted into either implementation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SignalDescriptor {
    #[serde(rename = "type")]
    pub kind: SdpKind,
    pub sdp: String,
}

impl SignalDescriptor {
    pub fn offer(sdp: impl Into<String>) -> Self {
        Self {
            kind: SdpKind::Offer,
            sdp: sdp.into(),
        }
    }

    pub fn answer(sdp: impl Into<String>) -> Self {
        Self {
            kind: SdpKind::Answer,
            sdp: sdp.into(),
        }
    }

    pub fn to_json(&self) -> Result<String, PeerError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parses text pasted by the operator. Surrounding whitespace is ignored.
    pub fn from_json(text: &str) -> Result<Self, PeerError> {
        let descriptor: Self = serde_json::from_str(text.trim())?;
        if descriptor.sdp.is_empty() {
            return Err(PeerError::InvalidSignal(format!(
                "{} carries an empty sdp",
                descriptor.kind
            )));
        }
        Ok(descriptor)
    }

    /// Fails unless this descriptor is of the `expected` kind.
    pub fn expect_kind(&self, expected: SdpKind) -> Result<(), PeerError> {
        if self.kind != expected {
            return Err(PeerError::InvalidSignal(format!(
                "expected {expected}, got {}",
                self.kind
            )));
        }
        Ok(())
    }
}
