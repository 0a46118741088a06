use bytes::Bytes;
use pairline_core::{ChannelMessage, Listener, PeerEvent, PeerEventKind, Propagation};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::integration::{create_test_peer, init_tracing, open_host_channel};

#[tokio::test]
async fn test_messages_are_published_in_order() {
    init_tracing();

    let (peer, transport, recorder) = create_test_peer();
    let channel = open_host_channel(&peer, &transport).await;

    channel.receive("ping").await;
    channel.receive(Bytes::from_static(b"\x01\x02")).await;
    assert!(recorder.wait_for(PeerEventKind::Message, 2, 1000).await);

    assert_eq!(
        recorder.messages(),
        vec![
            ChannelMessage::from("ping"),
            ChannelMessage::Binary(Bytes::from_static(b"\x01\x02")),
        ]
    );
}

#[tokio::test]
async fn test_stopping_listener_hides_message_from_later_listeners() {
    init_tracing();

    let (peer, transport, recorder) = create_test_peer();
    let channel = open_host_channel(&peer, &transport).await;

    let delivered = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&delivered);
    peer.on(
        PeerEventKind::Message,
        Listener::new(|event: &PeerEvent| match event {
            PeerEvent::Message(message) if message.as_text() == Some("secret") => Propagation::Stop,
            _ => Propagation::Continue,
        }),
    )
    .on(
        PeerEventKind::Message,
        Listener::observer(move |_: &PeerEvent| {
            counter.fetch_add(1, Ordering::SeqCst);
        }),
    );

    channel.receive("secret").await;
    channel.receive("public").await;
    assert!(recorder.wait_for(PeerEventKind::Message, 2, 1000).await);
    tokio::task::yield_now().await;

    // The recorder subscribed first, so it saw both.
    assert_eq!(delivered.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_unsubscribed_listener_stops_receiving() {
    init_tracing();

    let (peer, transport, recorder) = create_test_peer();
    let channel = open_host_channel(&peer, &transport).await;

    let seen = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&seen);
    let listener = Listener::observer(move |_: &PeerEvent| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    peer.on(PeerEventKind::Message, listener.clone());

    channel.receive("one").await;
    assert!(recorder.wait_for(PeerEventKind::Message, 1, 1000).await);

    peer.off(PeerEventKind::Message, &listener);
    assert!(!peer.events().has_listener(PeerEventKind::Message, &listener));

    channel.receive("two").await;
    assert!(recorder.wait_for(PeerEventKind::Message, 2, 1000).await);

    assert_eq!(seen.load(Ordering::SeqCst), 1);
}
