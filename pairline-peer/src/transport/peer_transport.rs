use crate::transport::EventSender;
use async_trait::async_trait;
use pairline_core::{ChannelMessage, PeerConfig, PeerError, SignalDescriptor};
use std::sync::Arc;

/// The capability a peer drives: one native connection owned by the
/// platform stack, which stays authoritative for its internal state.
#[async_trait]
pub trait PeerTransport: Send + Sync {
    /// Routes every connection-level notification into `events`.
    /// Notifications raised before the first call are dropped.
    fn attach(&self, events: EventSender);

    /// Creates a data channel locally (offering side).
    async fn create_channel(&self, label: &str) -> Result<Arc<dyn DataChannel>, PeerError>;

    async fn create_offer(&self) -> Result<SignalDescriptor, PeerError>;

    async fn create_answer(&self) -> Result<SignalDescriptor, PeerError>;

    async fn set_local_description(&self, descriptor: SignalDescriptor) -> Result<(), PeerError>;

    async fn set_remote_description(&self, descriptor: SignalDescriptor)
    -> Result<(), PeerError>;

    /// The committed local description, including whatever candidates the
    /// stack embedded after committing it.
    async fn local_description(&self) -> Option<SignalDescriptor>;

    async fn close(&self) -> Result<(), PeerError>;
}

/// A logical message stream carried by a [`PeerTransport`].
#[async_trait]
pub trait DataChannel: Send + Sync {
    fn label(&self) -> String;

    /// Routes open/close/message notifications into `events`. Anything the
    /// channel raised before the first call is delivered first, in order.
    fn attach(&self, events: EventSender);

    async fn send(&self, message: &ChannelMessage) -> Result<(), PeerError>;

    async fn close(&self) -> Result<(), PeerError>;
}

/// Creates fresh transports. One connection per call; connections are never
/// reused.
#[async_trait]
pub trait TransportFactory: Send + Sync {
    async fn connect(&self, config: &PeerConfig) -> Result<Arc<dyn PeerTransport>, PeerError>;
}
