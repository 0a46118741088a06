use pairline_core::{PeerError, PeerEventKind, SignalDescriptor};
use pairline_peer::mock::MockTransport;
use pairline_peer::{HandshakeState, PeerTransport};

use crate::integration::{create_test_peer, init_tracing};
use crate::utils::EventRecorder;

#[tokio::test]
async fn test_client_rejects_answer_as_offer() {
    init_tracing();

    let (client, transport, _recorder) = create_test_peer();
    let err = client
        .consume_offer_produce_answer(SignalDescriptor::answer("v=0\r\n"))
        .await
        .unwrap_err();

    assert!(matches!(err, PeerError::InvalidSignal(_)));
    assert!(transport.calls().is_empty());
    // Nothing was claimed, so a valid offer is still accepted afterwards.
    assert_eq!(client.state(), HandshakeState::Idle);
    assert_eq!(client.role(), None);
}

#[tokio::test]
async fn test_unparseable_offer_fails_the_session() {
    init_tracing();

    let (client, _transport, _recorder) = create_test_peer();
    let err = client
        .consume_offer_produce_answer(SignalDescriptor::offer("not a session description"))
        .await
        .unwrap_err();

    assert!(matches!(err, PeerError::Negotiation(_)));
    assert_eq!(client.state(), HandshakeState::Failed);
}

#[tokio::test]
async fn test_host_ignores_remote_channel() {
    init_tracing();

    let (host, transport, _recorder) = create_test_peer();
    let stray = transport.deliver_remote_channel("stray").await;

    host.produce_offer().await.expect("offer failed");
    let own = transport.channels().pop().unwrap();
    assert!(own.open().await);
    host.wait_until_ready().await;

    assert!(!stray.is_attached());
    assert_eq!(host.channel_label().as_deref(), Some("chat"));
}

#[tokio::test]
async fn test_accept_answer_requires_committed_offer() {
    init_tracing();

    let (host, _transport, _recorder) = create_test_peer();
    let err = host
        .accept_answer(SignalDescriptor::answer("v=0\r\n"))
        .await
        .unwrap_err();
    assert!(matches!(err, PeerError::InvalidState(_)));

    host.produce_offer().await.expect("offer failed");
    let err = host
        .accept_answer(SignalDescriptor::offer("v=0\r\n"))
        .await
        .unwrap_err();
    assert!(matches!(err, PeerError::InvalidSignal(_)));
}

#[tokio::test]
async fn test_close_is_terminal() {
    init_tracing();

    let (host, transport, _) = create_test_peer();
    let recorder = EventRecorder::attach(&host);
    host.produce_offer().await.expect("offer failed");

    host.close().await.expect("close failed");

    assert!(transport.is_closed());
    assert_eq!(host.state(), HandshakeState::Closed);
    assert!(recorder.wait_for(PeerEventKind::Close, 1, 1000).await);
    assert_eq!(host.state(), HandshakeState::Closed);
}

#[tokio::test]
async fn test_close_closes_the_owned_channel() {
    init_tracing();

    let (host, host_transport, _) = create_test_peer();
    host.produce_offer().await.expect("offer failed");
    host.close().await.expect("close failed");
    assert!(host_transport.channels()[0].is_closed_by_owner());

    let offer = MockTransport::new().create_offer().await.unwrap();
    let (client, client_transport, _) = create_test_peer();
    client
        .consume_offer_produce_answer(offer)
        .await
        .expect("answer failed");
    let remote = client_transport.deliver_remote_channel("chat").await;
    client.wait_for_channel().await;

    client.close().await.expect("close failed");
    assert!(remote.is_closed_by_owner());
    assert_eq!(client_transport.calls().last(), Some(&"close"));
}

#[tokio::test]
async fn test_open_queued_before_close_is_ignored() {
    init_tracing();

    let (host, transport, recorder) = create_test_peer();
    host.produce_offer().await.expect("offer failed");
    let channel = transport.channels().pop().unwrap();

    // Queued, but not yet handled by the pump when the engine closes.
    assert!(channel.open().await);
    host.close().await.expect("close failed");

    assert!(recorder.wait_for(PeerEventKind::Close, 1, 1000).await);
    assert_eq!(recorder.count(PeerEventKind::Open), 0);
    assert!(!host.is_ready());
    assert!(!host.send("after close").await.unwrap());
    assert_eq!(host.state(), HandshakeState::Closed);
}
