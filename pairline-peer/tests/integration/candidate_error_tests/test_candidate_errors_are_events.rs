use pairline_core::{
    ConnectionState, IceCandidateError, Listener, NO_IPV6_ROUTE_ADDRESS, PeerEvent, PeerEventKind,
};
use pairline_peer::{HandshakeState, TransportEvent};

use crate::integration::{create_test_peer, init_tracing, open_host_channel};

fn lookup_failure(url: &str) -> IceCandidateError {
    IceCandidateError::new("STUN host lookup received error.", "0.0.0.0", 701, 0, url)
}

#[tokio::test]
async fn test_each_candidate_error_is_published() {
    init_tracing();

    let (peer, transport, recorder) = create_test_peer();
    peer.produce_offer().await.expect("offer failed");

    let urls = [
        "stun:stun.l.google.com:19302",
        "stun:stun1.l.google.com:19302",
        "stun:stun.anyfirewall.com:3478",
    ];
    for url in urls {
        transport
            .emit(TransportEvent::CandidateError(lookup_failure(url)))
            .await;
    }
    transport
        .emit(TransportEvent::CandidateError(IceCandidateError::new(
            "STUN host lookup received error.",
            NO_IPV6_ROUTE_ADDRESS,
            701,
            0,
            "stun:stun.l.google.com:19302",
        )))
        .await;

    assert!(recorder.wait_for(PeerEventKind::Error, 4, 1000).await);

    let errors = recorder.errors();
    let reported: Vec<&str> = errors.iter().take(3).map(|e| e.url.as_str()).collect();
    assert_eq!(reported, urls);
    assert!(errors[3].is_no_ipv6_route());

    // Gathering failures never abort the handshake.
    assert_eq!(peer.state(), HandshakeState::LocalDescriptionSet);
}

#[tokio::test]
async fn test_candidate_errors_do_not_block_the_channel() {
    init_tracing();

    let (peer, transport, recorder) = create_test_peer();
    transport
        .emit(TransportEvent::CandidateError(lookup_failure("stun:a.example:3478")))
        .await;

    let channel = open_host_channel(&peer, &transport).await;
    assert!(peer.send("still works").await.unwrap());
    assert_eq!(channel.sent().len(), 1);
    assert_eq!(recorder.count(PeerEventKind::Error), 1);
}

#[tokio::test]
async fn test_panicking_listener_does_not_stop_the_pump() {
    init_tracing();

    let (peer, transport, recorder) = create_test_peer();
    peer.on(
        PeerEventKind::Error,
        Listener::observer(|_: &PeerEvent| panic!("listener blew up")),
    );

    transport
        .emit(TransportEvent::CandidateError(lookup_failure("stun:a.example:3478")))
        .await;
    transport
        .emit(TransportEvent::ConnectionStateChange(ConnectionState::Connecting))
        .await;

    assert!(recorder.wait_for(PeerEventKind::ConnectionState, 1, 1000).await);
    assert_eq!(recorder.count(PeerEventKind::Error), 1);
    assert_eq!(
        recorder.events().last(),
        Some(&PeerEvent::ConnectionState(ConnectionState::Connecting))
    );
}
