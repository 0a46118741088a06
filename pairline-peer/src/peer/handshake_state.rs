use std::fmt;

/// Which half of the asymmetric handshake an engine plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Creates the data channel and the offer.
    Host,
    /// Consumes the offer, answers, and receives the channel.
    Client,
}

/// Where an engine is in its handshake.
///
/// Host path: `Idle → OfferCreated → LocalDescriptionSet →
/// RemoteDescriptionSet → ChannelOpen → ChannelClosed`.
///
/// Client path: `Idle → RemoteDescriptionSet → AnswerCreated →
/// LocalDescriptionSet → ChannelOpen → ChannelClosed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeState {
    Idle,
    OfferCreated,
    AnswerCreated,
    LocalDescriptionSet,
    RemoteDescriptionSet,
    ChannelOpen,
    ChannelClosed,
    /// A negotiation step failed; the engine cannot be reused.
    Failed,
    Closed,
}

impl HandshakeState {
    /// No further handshake step may run.
    pub fn is_finished(self) -> bool {
        matches!(self, HandshakeState::Failed | HandshakeState::Closed)
    }
}

impl fmt::Display for HandshakeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HandshakeState::Idle => "idle",
            HandshakeState::OfferCreated => "offer-created",
            HandshakeState::AnswerCreated => "answer-created",
            HandshakeState::LocalDescriptionSet => "local-description-set",
            HandshakeState::RemoteDescriptionSet => "remote-description-set",
            HandshakeState::ChannelOpen => "channel-opened",
            HandshakeState::ChannelClosed => "channel-closed",
            HandshakeState::Failed => "failed",
            HandshakeState::Closed => "closed",
        };
        f.write_str(name)
    }
}
