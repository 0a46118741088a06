mod handshake_state;
mod peer;

pub use handshake_state::{HandshakeState, Role};
pub use peer::Peer;
