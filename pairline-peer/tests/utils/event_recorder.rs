use pairline_core::{ChannelMessage, IceCandidateError, Listener, PeerEvent, PeerEventKind};
use pairline_peer::Peer;
use std::sync::{Arc, Mutex};
use std::time::Duration;

const ALL_KINDS: [PeerEventKind; 5] = [
    PeerEventKind::Open,
    PeerEventKind::Close,
    PeerEventKind::Message,
    PeerEventKind::Error,
    PeerEventKind::ConnectionState,
];

/// Records every event a peer publishes, in delivery order.
#[derive(Clone)]
pub struct EventRecorder {
    events: Arc<Mutex<Vec<PeerEvent>>>,
}

impl EventRecorder {
    /// Subscribes one recording listener to every event kind of `peer`.
    pub fn attach(peer: &Peer) -> Self {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let listener = Listener::observer(move |event: &PeerEvent| {
            sink.lock().unwrap().push(event.clone());
        });

        for kind in ALL_KINDS {
            peer.on(kind, listener.clone());
        }
        Self { events }
    }

    pub fn events(&self) -> Vec<PeerEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn count(&self, kind: PeerEventKind) -> usize {
        use pairline_core::HubEvent;
        self.events().iter().filter(|e| e.kind() == kind).count()
    }

    pub fn messages(&self) -> Vec<ChannelMessage> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                PeerEvent::Message(message) => Some(message),
                _ => None,
            })
            .collect()
    }

    pub fn errors(&self) -> Vec<IceCandidateError> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                PeerEvent::Error(err) => Some(err),
                _ => None,
            })
            .collect()
    }

    /// Wait until at least `count` events of `kind` arrived.
    pub async fn wait_for(&self, kind: PeerEventKind, count: usize, timeout_ms: u64) -> bool {
        let deadline = tokio::time::Instant::now() + Duration::from_millis(timeout_ms);

        loop {
            if self.count(kind) >= count {
                return true;
            }
            if tokio::time::Instant::now() > deadline {
                return false;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }
}
