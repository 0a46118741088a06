use pairline_core::{PeerError, SdpKind, SignalDescriptor};
use pairline_peer::{HandshakeState, Role};

use crate::integration::{create_test_peer, init_tracing};

#[tokio::test]
async fn test_offer_creates_channel_before_negotiating() {
    init_tracing();

    let (peer, transport, _recorder) = create_test_peer();
    let offer = peer.produce_offer().await.expect("offer failed");

    assert_eq!(offer.kind, SdpKind::Offer);
    assert!(offer.sdp.starts_with("v=0"));
    assert_eq!(
        transport.calls(),
        vec!["create_channel", "create_offer", "set_local_description"]
    );

    let channels = transport.channels();
    assert_eq!(channels.len(), 1);
    assert!(channels[0].is_attached());
    assert!(peer.has_channel());
    assert_eq!(peer.channel_label().as_deref(), Some("chat"));

    assert_eq!(peer.role(), Some(Role::Host));
    assert_eq!(peer.state(), HandshakeState::LocalDescriptionSet);
    assert!(!peer.is_ready());
    assert_eq!(peer.local_description().await, Some(offer));
}

#[tokio::test]
async fn test_second_offer_is_rejected() {
    init_tracing();

    let (peer, transport, _recorder) = create_test_peer();
    peer.produce_offer().await.expect("offer failed");

    let err = peer.produce_offer().await.unwrap_err();
    assert!(matches!(err, PeerError::InvalidState(_)));
    assert_eq!(transport.channels().len(), 1);
}

#[tokio::test]
async fn test_offer_failure_fails_the_session() {
    init_tracing();

    let (peer, transport, _recorder) = create_test_peer();
    transport.fail_offers();

    let err = peer.produce_offer().await.unwrap_err();
    assert!(matches!(err, PeerError::Negotiation(_)));
    assert_eq!(peer.state(), HandshakeState::Failed);
    assert!(!transport.calls().contains(&"set_local_description"));
}

#[tokio::test]
async fn test_host_accepts_answer() {
    init_tracing();

    let (host, _host_transport, _) = create_test_peer();
    let (client, _client_transport, _) = create_test_peer();

    let offer = host.produce_offer().await.expect("offer failed");
    let answer = client
        .consume_offer_produce_answer(offer)
        .await
        .expect("answer failed");

    host.accept_answer(answer).await.expect("accept failed");
    assert_eq!(host.state(), HandshakeState::RemoteDescriptionSet);
}

#[tokio::test]
async fn test_descriptor_survives_copy_paste() {
    init_tracing();

    let (peer, _transport, _recorder) = create_test_peer();
    let offer = peer.produce_offer().await.expect("offer failed");

    let pasted = format!("\n  {}  \n", offer.to_json().unwrap());
    let parsed = SignalDescriptor::from_json(&pasted).unwrap();
    assert_eq!(parsed, offer);
}
