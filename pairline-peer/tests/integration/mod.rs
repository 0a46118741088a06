//! Integration tests for pairline_peer.
//!
//! Tests are organized by functionality:
//! - `connection_tests` - offer/answer handshake and channel ownership
//! - `messaging_tests` - send gating and inbound messages
//! - `candidate_error_tests` - non-fatal gathering failures
//! - `probe_tests` - STUN reachability probing
//! - `rtc_tests` - two engines over the real stack

pub mod messaging_tests;

use std::sync::Arc;

use pairline_core::PeerConfig;
use pairline_peer::mock::{MockChannel, MockTransport};
use pairline_peer::Peer;
use tracing::Level;

use crate::utils::EventRecorder;

/// Initialize tracing for tests (call once per test).
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// Create an engine over a fresh mock transport with a recorder attached.
pub fn create_test_peer() -> (Peer, Arc<MockTransport>, EventRecorder) {
    let transport = MockTransport::new();
    let peer = Peer::with_transport(PeerConfig::with_channel_name("chat"), transport.clone());
    let recorder = EventRecorder::attach(&peer);
    (peer, transport, recorder)
}

/// Run the host side up to an open channel.
pub async fn open_host_channel(peer: &Peer, transport: &MockTransport) -> Arc<MockChannel> {
    peer.produce_offer().await.expect("offer failed");
    let channel = transport.channels().pop().expect("no channel created");
    assert!(channel.open().await, "channel not attached");
    peer.wait_until_ready().await;
    channel
}
