use bytes::Bytes;
use pairline_core::{ChannelMessage, PeerEventKind};

use crate::integration::{create_test_peer, init_tracing, open_host_channel};

#[tokio::test]
async fn test_send_before_channel_exists_is_dropped() {
    init_tracing();

    let (peer, _transport, _recorder) = create_test_peer();
    assert!(!peer.send("too early").await.unwrap());
}

#[tokio::test]
async fn test_send_before_open_is_dropped() {
    init_tracing();

    let (peer, transport, _recorder) = create_test_peer();
    peer.produce_offer().await.expect("offer failed");

    assert!(!peer.send("not yet").await.unwrap());
    assert!(transport.channels()[0].sent().is_empty());
}

#[tokio::test]
async fn test_sends_after_open_arrive_in_order() {
    init_tracing();

    let (peer, transport, recorder) = create_test_peer();
    let channel = open_host_channel(&peer, &transport).await;
    assert_eq!(recorder.count(PeerEventKind::Open), 1);

    assert!(peer.send("first").await.unwrap());
    assert!(peer.send(vec![0xde, 0xad]).await.unwrap());
    assert!(peer.send(String::from("third")).await.unwrap());

    assert_eq!(
        channel.sent(),
        vec![
            ChannelMessage::from("first"),
            ChannelMessage::Binary(Bytes::from_static(&[0xde, 0xad])),
            ChannelMessage::from("third"),
        ]
    );
}

#[tokio::test]
async fn test_send_after_remote_close_is_dropped() {
    init_tracing();

    let (peer, transport, recorder) = create_test_peer();
    let channel = open_host_channel(&peer, &transport).await;
    assert!(peer.send("hello").await.unwrap());

    channel.close_remote().await;
    assert!(recorder.wait_for(PeerEventKind::Close, 1, 1000).await);

    assert!(!peer.is_ready());
    assert!(!peer.send("goodbye").await.unwrap());
    assert_eq!(channel.sent(), vec![ChannelMessage::from("hello")]);
}

#[tokio::test]
async fn test_send_after_close_is_dropped() {
    init_tracing();

    let (peer, transport, _recorder) = create_test_peer();
    let channel = open_host_channel(&peer, &transport).await;

    peer.close().await.expect("close failed");

    assert!(!peer.send("late").await.unwrap());
    assert!(channel.sent().is_empty());
}
