use pairline_peer::mock::MockFactory;
use pairline_peer::{ProbeError, probe_all};
use std::time::Duration;

use super::{probed_url, srflx};
use crate::integration::init_tracing;

#[tokio::test(start_paused = true)]
async fn test_probe_all_keeps_input_order() {
    init_tracing();

    // Only helpers named "up" answer; the slower one answers first in the list.
    let factory = MockFactory::with_setup(|transport, config| {
        let url = probed_url(config);
        if url.contains("up-slow") {
            transport.schedule(Duration::from_millis(80), srflx("203.0.113.1"));
        } else if url.contains("up-fast") {
            transport.schedule(Duration::from_millis(10), srflx("203.0.113.2"));
        }
    });

    let servers = ["up-slow.example:3478", "down.example:3478", "up-fast.example:3478"];
    let results = probe_all(&servers[..], Duration::from_millis(200), &factory).await;

    assert_eq!(results.len(), 3);
    assert_eq!(
        results[0].as_ref().unwrap().address.as_deref(),
        Some("203.0.113.1")
    );
    assert!(matches!(results[1], Err(ProbeError::Timeout { .. })));
    assert_eq!(
        results[2].as_ref().unwrap().address.as_deref(),
        Some("203.0.113.2")
    );

    assert_eq!(factory.transports().len(), 3);
    assert!(factory.transports().iter().all(|t| t.is_closed()));
}
