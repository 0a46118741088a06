pub use pairline_core::{EventHub, Listener, PeerError, PeerEvent, PeerEventKind, SessionId};

pub mod model {
    pub use pairline_core::model::*;
}

pub mod events {
    pub use pairline_core::events::*;
}

pub use pairline_core::PROBE_SERVERS;

#[cfg(feature = "rtc")]
pub mod peer {
    pub use pairline_peer::*;
}
