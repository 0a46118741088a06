//! Data model and event hub shared by the pairline runtime.
//!
//! Nothing in here touches the network: the types describe what a peer
//! connection is configured with, what travels over the manual signaling
//! path, and what a peer reports back to its observers.

pub mod error;
pub mod events;
pub mod model;
pub mod stun_servers;

pub use error::PeerError;
pub use events::{Delivery, EventHub, HubEvent, Listener, PeerEvent, PeerEventKind, Propagation};
pub use model::*;
pub use stun_servers::PROBE_SERVERS;
