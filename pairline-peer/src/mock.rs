//! In-memory transport for tests and simulations.
//!
//! Nothing is negotiated: descriptors are synthetic, and every notification
//! a real stack would raise is injected by the test, either immediately
//! ([`MockTransport::emit`], [`MockChannel::open`], ...) or on a timer
//! ([`MockTransport::schedule`]).

use crate::transport::{DataChannel, EventSender, PeerTransport, TransportEvent, TransportFactory};
use async_trait::async_trait;
use pairline_core::{ChannelMessage, PeerConfig, PeerError, SdpKind, SignalDescriptor};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

static NEXT_SESSION: AtomicU64 = AtomicU64::new(4_611_686_018);

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn synthetic_sdp(setup: &str) -> String {
    let session = NEXT_SESSION.fetch_add(1, Ordering::Relaxed);
    format!(
        "v=0\r\n\
         o=- {session} 2 IN IP4 127.0.0.1\r\n\
         s=-\r\n\
         t=0 0\r\n\
         a=group:BUNDLE 0\r\n\
         m=application 9 UDP/DTLS/SCTP webrtc-datachannel\r\n\
         c=IN IP4 0.0.0.0\r\n\
         a=setup:{setup}\r\n\
         a=mid:0\r\n\
         a=sctp-port:5000\r\n"
    )
}

fn spawn_delayed(events: EventSender, after: Duration, event: TransportEvent) {
    tokio::spawn(async move {
        tokio::time::sleep(after).await;
        let _ = events.send(event).await;
    });
}

/// A scriptable [`PeerTransport`].
pub struct MockTransport {
    events: Mutex<Option<EventSender>>,
    pending: Mutex<Vec<(Duration, TransportEvent)>>,
    local: Mutex<Option<SignalDescriptor>>,
    remote: Mutex<Option<SignalDescriptor>>,
    channels: Mutex<Vec<Arc<MockChannel>>>,
    calls: Mutex<Vec<&'static str>>,
    fail_offer: AtomicBool,
    fail_answer: AtomicBool,
    closed: AtomicBool,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            events: Mutex::new(None),
            pending: Mutex::new(Vec::new()),
            local: Mutex::new(None),
            remote: Mutex::new(None),
            channels: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
            fail_offer: AtomicBool::new(false),
            fail_answer: AtomicBool::new(false),
            closed: AtomicBool::new(false),
        })
    }

    /// Delivers `event` `after` the transport is attached (or after now, if
    /// it already is). Events sharing a delay arrive in no particular order.
    pub fn schedule(&self, after: Duration, event: TransportEvent) {
        match lock(&self.events).clone() {
            Some(events) => spawn_delayed(events, after, event),
            None => lock(&self.pending).push((after, event)),
        }
    }

    /// Delivers `event` now. False when nothing is attached.
    pub async fn emit(&self, event: TransportEvent) -> bool {
        let events = lock(&self.events).clone();
        match events {
            Some(events) => events.send(event).await.is_ok(),
            None => false,
        }
    }

    /// Simulates the remote side creating a data channel.
    pub async fn deliver_remote_channel(&self, label: &str) -> Arc<MockChannel> {
        let channel = MockChannel::new(label);
        self.emit(TransportEvent::ChannelArrived(channel.clone()))
            .await;
        channel
    }

    pub fn fail_offers(&self) {
        self.fail_offer.store(true, Ordering::SeqCst);
    }

    pub fn fail_answers(&self) {
        self.fail_answer.store(true, Ordering::SeqCst);
    }

    /// Trait methods invoked so far, in order.
    pub fn calls(&self) -> Vec<&'static str> {
        lock(&self.calls).clone()
    }

    /// Channels created locally through [`PeerTransport::create_channel`].
    pub fn channels(&self) -> Vec<Arc<MockChannel>> {
        lock(&self.channels).clone()
    }

    pub fn remote_description(&self) -> Option<SignalDescriptor> {
        lock(&self.remote).clone()
    }

    pub fn is_attached(&self) -> bool {
        lock(&self.events).is_some()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn record(&self, call: &'static str) -> Result<(), PeerError> {
        lock(&self.calls).push(call);
        if self.is_closed() {
            return Err(PeerError::Negotiation("connection closed".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl PeerTransport for MockTransport {
    fn attach(&self, events: EventSender) {
        for (after, event) in lock(&self.pending).drain(..) {
            spawn_delayed(events.clone(), after, event);
        }
        *lock(&self.events) = Some(events);
    }

    async fn create_channel(&self, label: &str) -> Result<Arc<dyn DataChannel>, PeerError> {
        self.record("create_channel")?;
        let channel = MockChannel::new(label);
        lock(&self.channels).push(channel.clone());
        Ok(channel)
    }

    async fn create_offer(&self) -> Result<SignalDescriptor, PeerError> {
        self.record("create_offer")?;
        if self.fail_offer.load(Ordering::SeqCst) {
            return Err(PeerError::Negotiation("offer creation refused".into()));
        }
        Ok(SignalDescriptor::offer(synthetic_sdp("actpass")))
    }

    async fn create_answer(&self) -> Result<SignalDescriptor, PeerError> {
        self.record("create_answer")?;
        if self.fail_answer.load(Ordering::SeqCst) {
            return Err(PeerError::Negotiation("answer creation refused".into()));
        }
        match lock(&self.remote).as_ref() {
            Some(remote) if remote.kind == SdpKind::Offer => {
                Ok(SignalDescriptor::answer(synthetic_sdp("active")))
            }
            _ => Err(PeerError::Negotiation("no remote offer to answer".into())),
        }
    }

    async fn set_local_description(&self, descriptor: SignalDescriptor) -> Result<(), PeerError> {
        self.record("set_local_description")?;
        *lock(&self.local) = Some(descriptor);
        Ok(())
    }

    async fn set_remote_description(
        &self,
        descriptor: SignalDescriptor,
    ) -> Result<(), PeerError> {
        self.record("set_remote_description")?;
        if !descriptor.sdp.starts_with("v=0") {
            return Err(PeerError::Negotiation(
                "unparseable session description".into(),
            ));
        }
        *lock(&self.remote) = Some(descriptor);
        Ok(())
    }

    async fn local_description(&self) -> Option<SignalDescriptor> {
        lock(&self.local).clone()
    }

    async fn close(&self) -> Result<(), PeerError> {
        lock(&self.calls).push("close");
        self.closed.store(true, Ordering::SeqCst);
        for channel in lock(&self.channels).iter() {
            channel.shut();
        }
        Ok(())
    }
}

/// A scriptable [`DataChannel`] that records what was sent on it.
///
/// Notifications raised before [`DataChannel::attach`] are held back and
/// replayed on attach, like the real adapter does.
pub struct MockChannel {
    label: String,
    events: Mutex<Option<EventSender>>,
    backlog: Mutex<Vec<TransportEvent>>,
    sent: Mutex<Vec<ChannelMessage>>,
    closed: AtomicBool,
    closed_by_owner: AtomicBool,
}

impl MockChannel {
    pub fn new(label: &str) -> Arc<Self> {
        Arc::new(Self {
            label: label.to_owned(),
            events: Mutex::new(None),
            backlog: Mutex::new(Vec::new()),
            sent: Mutex::new(Vec::new()),
            closed: AtomicBool::new(false),
            closed_by_owner: AtomicBool::new(false),
        })
    }

    /// False only when the attached receiver is gone.
    async fn emit(&self, event: TransportEvent) -> bool {
        let events = {
            let events = lock(&self.events);
            match events.as_ref() {
                Some(events) => events.clone(),
                None => {
                    lock(&self.backlog).push(event);
                    return true;
                }
            }
        };
        events.send(event).await.is_ok()
    }

    /// Signals that the channel became ready.
    pub async fn open(&self) -> bool {
        self.emit(TransportEvent::ChannelOpen).await
    }

    /// Simulates the remote side closing the channel.
    pub async fn close_remote(&self) -> bool {
        self.closed.store(true, Ordering::SeqCst);
        self.emit(TransportEvent::ChannelClose).await
    }

    /// Simulates a message from the remote side.
    pub async fn receive(&self, message: impl Into<ChannelMessage>) -> bool {
        self.emit(TransportEvent::Message(message.into())).await
    }

    /// Everything handed to [`DataChannel::send`], in call order.
    pub fn sent(&self) -> Vec<ChannelMessage> {
        lock(&self.sent).clone()
    }

    pub fn is_attached(&self) -> bool {
        lock(&self.events).is_some()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// True once [`DataChannel::close`] was called on this channel, as
    /// opposed to the connection closing underneath it.
    pub fn is_closed_by_owner(&self) -> bool {
        self.closed_by_owner.load(Ordering::SeqCst)
    }

    // Local shutdown never waits on a full event queue.
    fn shut(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        let events = lock(&self.events);
        match events.as_ref() {
            Some(events) => {
                let _ = events.try_send(TransportEvent::ChannelClose);
            }
            None => lock(&self.backlog).push(TransportEvent::ChannelClose),
        }
    }
}

#[async_trait]
impl DataChannel for MockChannel {
    fn label(&self) -> String {
        self.label.clone()
    }

    fn attach(&self, events: EventSender) {
        let mut slot = lock(&self.events);
        for event in lock(&self.backlog).drain(..) {
            let _ = events.try_send(event);
        }
        *slot = Some(events);
    }

    async fn send(&self, message: &ChannelMessage) -> Result<(), PeerError> {
        if self.is_closed() {
            return Err(PeerError::Transport("channel closed".into()));
        }
        lock(&self.sent).push(message.clone());
        Ok(())
    }

    async fn close(&self) -> Result<(), PeerError> {
        self.closed_by_owner.store(true, Ordering::SeqCst);
        self.shut();
        Ok(())
    }
}

type SetupFn = dyn Fn(&MockTransport, &PeerConfig) + Send + Sync;

/// Hands out fresh [`MockTransport`]s and remembers them.
#[derive(Default)]
pub struct MockFactory {
    setup: Option<Arc<SetupFn>>,
    created: Mutex<Vec<(PeerConfig, Arc<MockTransport>)>>,
    refuse: AtomicBool,
}

impl MockFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `setup` on every transport before it is handed out, e.g. to
    /// schedule candidates per configured helper.
    pub fn with_setup<F>(setup: F) -> Self
    where
        F: Fn(&MockTransport, &PeerConfig) + Send + Sync + 'static,
    {
        Self {
            setup: Some(Arc::new(setup)),
            ..Self::default()
        }
    }

    /// Makes every later `connect` fail.
    pub fn refuse_connections(&self) {
        self.refuse.store(true, Ordering::SeqCst);
    }

    pub fn transports(&self) -> Vec<Arc<MockTransport>> {
        lock(&self.created).iter().map(|(_, t)| Arc::clone(t)).collect()
    }

    pub fn configs(&self) -> Vec<PeerConfig> {
        lock(&self.created).iter().map(|(c, _)| c.clone()).collect()
    }
}

#[async_trait]
impl TransportFactory for MockFactory {
    async fn connect(&self, config: &PeerConfig) -> Result<Arc<dyn PeerTransport>, PeerError> {
        if self.refuse.load(Ordering::SeqCst) {
            return Err(PeerError::Transport("connection refused".into()));
        }

        let transport = MockTransport::new();
        if let Some(setup) = &self.setup {
            setup(&transport, config);
        }
        lock(&self.created).push((config.clone(), Arc::clone(&transport)));
        Ok(transport)
    }
}
