mod candidate;
mod config;
mod connection;
mod message;
mod session;
mod signaling;

pub use candidate::{CandidateKind, IceCandidate, IceCandidateError, NO_IPV6_ROUTE_ADDRESS};
pub use config::{IceServerConfig, PeerConfig};
pub use connection::ConnectionState;
pub use message::ChannelMessage;
pub use session::SessionId;
pub use signaling::{SdpKind, SignalDescriptor};
