//! Connection-establishment engine for a manually signaled peer-to-peer
//! data channel, plus a single-helper reachability probe.

pub mod mock;
mod peer;
mod probe;
mod transport;

pub use peer::*;
pub use probe::*;
pub use transport::*;
