use crate::events::HubEvent;
use crate::model::{ChannelMessage, ConnectionState, IceCandidateError};

/// Everything a peer reports to its observers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeerEvent {
    /// The data channel became ready; `send` now transmits.
    Open,
    /// The data channel closed; `send` is a no-op again.
    Close,
    Message(ChannelMessage),
    /// A non-fatal candidate gathering failure.
    Error(IceCandidateError),
    ConnectionState(ConnectionState),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PeerEventKind {
    Open,
    Close,
    Message,
    Error,
    ConnectionState,
}

impl HubEvent for PeerEvent {
    type Kind = PeerEventKind;

    fn kind(&self) -> PeerEventKind {
        match self {
            PeerEvent::Open => PeerEventKind::Open,
            PeerEvent::Close => PeerEventKind::Close,
            PeerEvent::Message(_) => PeerEventKind::Message,
            PeerEvent::Error(_) => PeerEventKind::Error,
            PeerEvent::ConnectionState(_) => PeerEventKind::ConnectionState,
        }
    }
}
