use crate::transport::DataChannel;
use pairline_core::{ChannelMessage, ConnectionState, IceCandidate, IceCandidateError};
use std::fmt;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Where a transport and its channels push their notifications.
pub type EventSender = mpsc::Sender<TransportEvent>;

/// Notifications emitted by the underlying stack.
#[derive(Clone)]
pub enum TransportEvent {
    /// The remote side created a data channel (answering side only).
    ChannelArrived(Arc<dyn DataChannel>),

    /// The data channel is ready for writes.
    ChannelOpen,

    ChannelClose,

    Message(ChannelMessage),

    /// A local candidate was gathered.
    Candidate(IceCandidate),

    /// Gathering against one helper failed.
    CandidateError(IceCandidateError),

    SignalingStateChange(String),

    ConnectionStateChange(ConnectionState),

    /// No further candidates will be gathered.
    GatheringComplete,
}

impl fmt::Debug for TransportEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportEvent::ChannelArrived(channel) => {
                f.debug_tuple("ChannelArrived").field(&channel.label()).finish()
            }
            TransportEvent::ChannelOpen => f.write_str("ChannelOpen"),
            TransportEvent::ChannelClose => f.write_str("ChannelClose"),
            TransportEvent::Message(msg) => f.debug_tuple("Message").field(msg).finish(),
            TransportEvent::Candidate(c) => f.debug_tuple("Candidate").field(c).finish(),
            TransportEvent::CandidateError(e) => f.debug_tuple("CandidateError").field(e).finish(),
            TransportEvent::SignalingStateChange(s) => {
                f.debug_tuple("SignalingStateChange").field(s).finish()
            }
            TransportEvent::ConnectionStateChange(s) => {
                f.debug_tuple("ConnectionStateChange").field(s).finish()
            }
            TransportEvent::GatheringComplete => f.write_str("GatheringComplete"),
        }
    }
}
