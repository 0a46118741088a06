mod hub;
mod peer_event;

pub use hub::{Delivery, EventHub, HubEvent, Listener, Propagation};
pub use peer_event::{PeerEvent, PeerEventKind};
