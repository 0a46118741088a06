use crate::peer::{HandshakeState, Role};
use crate::transport::{
    DataChannel, EventSender, PeerTransport, RtcTransportFactory, TransportEvent, TransportFactory,
};
use pairline_core::{
    ChannelMessage, EventHub, HubEvent, Listener, PeerConfig, PeerError, PeerEvent, PeerEventKind,
    SdpKind, SessionId, SignalDescriptor,
};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

const EVENT_BUFFER: usize = 256;

struct Handshake {
    role: Option<Role>,
    state: HandshakeState,
}

/// State shared between the engine handle and its event pump.
struct PeerShared {
    session_id: SessionId,
    hub: EventHub<PeerEvent>,
    channel: Mutex<Option<Arc<dyn DataChannel>>>,
    has_channel: watch::Sender<bool>,
    ready: watch::Sender<bool>,
    handshake: Mutex<Handshake>,
    /// Set once this engine answers an offer; until then remote channels are refused.
    accepts_remote_channel: AtomicBool,
    events_tx: EventSender,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        *msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.as_str()
    } else {
        "non-string panic payload"
    }
}

impl PeerShared {
    async fn run(self: Arc<Self>, mut events_rx: mpsc::Receiver<TransportEvent>) {
        debug!("Event pump started for session {}", self.session_id);

        while let Some(event) = events_rx.recv().await {
            self.handle(event);
        }

        debug!("Event pump finished for session {}", self.session_id);
    }

    fn handle(&self, event: TransportEvent) {
        match event {
            TransportEvent::ChannelArrived(channel) => {
                if !self.accepts_remote_channel.load(Ordering::SeqCst) {
                    warn!(
                        "Session {}: ignoring remote DataChannel '{}', no offer was answered",
                        self.session_id,
                        channel.label()
                    );
                    return;
                }
                self.install_channel(channel);
            }

            TransportEvent::ChannelOpen => {
                let state = self.state();
                if state.is_finished() {
                    debug!(
                        "Session {}: ignoring DataChannel open while {}",
                        self.session_id, state
                    );
                    return;
                }
                self.ready.send_replace(true);
                self.set_state(HandshakeState::ChannelOpen);
                info!("Session {}: DataChannel open and ready", self.session_id);
                self.publish(PeerEvent::Open);
            }

            TransportEvent::ChannelClose => {
                self.ready.send_replace(false);
                self.set_state(HandshakeState::ChannelClosed);
                info!("Session {}: DataChannel closed", self.session_id);
                self.publish(PeerEvent::Close);
            }

            TransportEvent::Message(message) => {
                debug!(
                    "Session {}: received {} byte message",
                    self.session_id,
                    message.len()
                );
                self.publish(PeerEvent::Message(message));
            }

            TransportEvent::CandidateError(err) => {
                warn!("Session {}: ICE candidate error: {}", self.session_id, err);
                self.publish(PeerEvent::Error(err));
            }

            TransportEvent::ConnectionStateChange(state) => {
                info!("Session {}: connection state {}", self.session_id, state);
                self.publish(PeerEvent::ConnectionState(state));
            }

            TransportEvent::Candidate(candidate) => {
                debug!(
                    "Session {}: candidate {:?} {}:{}",
                    self.session_id, candidate.kind, candidate.address, candidate.port
                );
            }

            TransportEvent::SignalingStateChange(state) => {
                debug!("Session {}: signaling state {}", self.session_id, state);
            }

            TransportEvent::GatheringComplete => {
                debug!("Session {}: ICE gathering complete", self.session_id);
            }
        }
    }

    /// Listener panics stop at the pump so later events still get delivered.
    fn publish(&self, event: PeerEvent) {
        let kind = event.kind();
        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| self.hub.publish(&event))) {
            error!(
                "Session {}: {:?} listener panicked: {}",
                self.session_id,
                kind,
                panic_message(payload.as_ref())
            );
        }
    }

    /// Wires and stores `channel` unless one is already owned.
    fn install_channel(&self, channel: Arc<dyn DataChannel>) -> bool {
        let mut slot = lock(&self.channel);
        if slot.is_some() {
            warn!(
                "Session {}: ignoring DataChannel '{}', one is already owned",
                self.session_id,
                channel.label()
            );
            return false;
        }

        channel.attach(self.events_tx.clone());
        debug!(
            "Session {}: DataChannel '{}' wired",
            self.session_id,
            channel.label()
        );
        *slot = Some(channel);
        drop(slot);

        self.has_channel.send_replace(true);
        true
    }

    fn state(&self) -> HandshakeState {
        lock(&self.handshake).state
    }

    /// Finished states are sticky.
    fn set_state(&self, next: HandshakeState) {
        let mut handshake = lock(&self.handshake);
        if handshake.state.is_finished() {
            return;
        }
        debug!(
            "Session {}: {} -> {}",
            self.session_id, handshake.state, next
        );
        handshake.state = next;
    }

    /// Claims `role` for a fresh engine. Each engine runs one handshake.
    fn begin(&self, role: Role) -> Result<(), PeerError> {
        let mut handshake = lock(&self.handshake);
        if handshake.role.is_some() || handshake.state != HandshakeState::Idle {
            return Err(PeerError::InvalidState(handshake.state.to_string()));
        }
        handshake.role = Some(role);
        Ok(())
    }

    fn settle<T>(&self, step: &str, result: &Result<T, PeerError>) {
        if let Err(e) = result {
            warn!("Session {}: {} failed: {}", self.session_id, step, e);
            self.set_state(HandshakeState::Failed);
        }
    }
}

/// Drives one peer connection through an offer/answer handshake and gates
/// writes on the data channel's readiness.
///
/// One engine is one session attempt. After a failure or [`Peer::close`] a
/// fresh engine has to be built.
pub struct Peer {
    shared: Arc<PeerShared>,
    transport: Arc<dyn PeerTransport>,
    config: PeerConfig,
    pump: JoinHandle<()>,
}

impl Peer {
    /// Creates an engine on the `webrtc` stack.
    pub async fn new(config: PeerConfig) -> Result<Self, PeerError> {
        Self::with_factory(config, &RtcTransportFactory).await
    }

    pub async fn with_factory(
        config: PeerConfig,
        factory: &dyn TransportFactory,
    ) -> Result<Self, PeerError> {
        let transport = factory.connect(&config).await?;
        Ok(Self::with_transport(config, transport))
    }

    /// Wraps an existing transport. Must be called inside a tokio runtime.
    pub fn with_transport(config: PeerConfig, transport: Arc<dyn PeerTransport>) -> Self {
        let session_id = SessionId::new();
        let (events_tx, events_rx) = mpsc::channel(EVENT_BUFFER);

        let shared = Arc::new(PeerShared {
            session_id,
            hub: EventHub::new(),
            channel: Mutex::new(None),
            has_channel: watch::Sender::new(false),
            ready: watch::Sender::new(false),
            handshake: Mutex::new(Handshake {
                role: None,
                state: HandshakeState::Idle,
            }),
            accepts_remote_channel: AtomicBool::new(false),
            events_tx: events_tx.clone(),
        });

        transport.attach(events_tx);
        let pump = tokio::spawn(Arc::clone(&shared).run(events_rx));

        info!(
            "Session {} created (channel '{}', {} ICE servers)",
            session_id,
            config.channel_name,
            config.ice_servers.len()
        );

        Self {
            shared,
            transport,
            config,
            pump,
        }
    }

    /// Host role: creates the data channel, then an offer, and commits the
    /// offer locally. The returned descriptor is what the operator copies to
    /// the client.
    pub async fn produce_offer(&self) -> Result<SignalDescriptor, PeerError> {
        self.shared.begin(Role::Host)?;
        let result = self.offer_steps().await;
        self.shared.settle("offer", &result);
        result
    }

    async fn offer_steps(&self) -> Result<SignalDescriptor, PeerError> {
        let channel = self
            .transport
            .create_channel(&self.config.channel_name)
            .await?;
        self.shared.install_channel(channel);

        let offer = self.transport.create_offer().await?;
        self.shared.set_state(HandshakeState::OfferCreated);

        self.transport.set_local_description(offer.clone()).await?;
        self.shared.set_state(HandshakeState::LocalDescriptionSet);

        let local = self.transport.local_description().await.unwrap_or(offer);
        info!(
            "Session {}: offer ready ({} bytes)",
            self.shared.session_id,
            local.sdp.len()
        );
        Ok(local)
    }

    /// Client role: commits the host's offer, answers it and commits the
    /// answer locally.
    ///
    /// Completes once the answer is committed. The data channel is created by
    /// the remote side and shows up later, see [`Peer::wait_for_channel`].
    pub async fn consume_offer_produce_answer(
        &self,
        offer: SignalDescriptor,
    ) -> Result<SignalDescriptor, PeerError> {
        offer.expect_kind(SdpKind::Offer)?;
        self.shared.begin(Role::Client)?;
        self.shared
            .accepts_remote_channel
            .store(true, Ordering::SeqCst);

        let result = self.answer_steps(offer).await;
        self.shared.settle("answer", &result);
        result
    }

    async fn answer_steps(&self, offer: SignalDescriptor) -> Result<SignalDescriptor, PeerError> {
        self.transport.set_remote_description(offer).await?;
        self.shared.set_state(HandshakeState::RemoteDescriptionSet);

        let answer = self.transport.create_answer().await?;
        self.shared.set_state(HandshakeState::AnswerCreated);

        self.transport.set_local_description(answer.clone()).await?;
        self.shared.set_state(HandshakeState::LocalDescriptionSet);

        let local = self.transport.local_description().await.unwrap_or(answer);
        info!(
            "Session {}: answer ready ({} bytes)",
            self.shared.session_id,
            local.sdp.len()
        );
        Ok(local)
    }

    /// Host role: commits the client's answer, completing the handshake.
    pub async fn accept_answer(&self, answer: SignalDescriptor) -> Result<(), PeerError> {
        answer.expect_kind(SdpKind::Answer)?;

        let state = self.shared.state();
        if self.role() != Some(Role::Host) || state != HandshakeState::LocalDescriptionSet {
            return Err(PeerError::InvalidState(state.to_string()));
        }

        let result = self.transport.set_remote_description(answer).await;
        self.shared.settle("accepting answer", &result);
        result?;

        self.shared.set_state(HandshakeState::RemoteDescriptionSet);
        info!("Session {}: answer accepted", self.shared.session_id);
        Ok(())
    }

    /// Transmits `message` if the channel exists and is open.
    ///
    /// Anything sent before [`PeerEvent::Open`] or after [`PeerEvent::Close`]
    /// is dropped without error; `Ok(false)` reports the drop.
    pub async fn send(&self, message: impl Into<ChannelMessage>) -> Result<bool, PeerError> {
        let message = message.into();

        let channel = {
            let slot = lock(&self.shared.channel);
            match slot.as_ref() {
                Some(channel) if self.is_ready() => Arc::clone(channel),
                _ => {
                    debug!(
                        "Session {}: channel not ready, dropping {} byte message",
                        self.shared.session_id,
                        message.len()
                    );
                    return Ok(false);
                }
            }
        };

        channel.send(&message).await?;
        Ok(true)
    }

    /// Closes the owned data channel, then releases the underlying
    /// connection. The engine is unusable afterwards.
    pub async fn close(&self) -> Result<(), PeerError> {
        self.shared.ready.send_replace(false);
        self.shared.set_state(HandshakeState::Closed);
        info!("Session {}: closing", self.shared.session_id);

        let channel = lock(&self.shared.channel).clone();
        if let Some(channel) = channel {
            if let Err(e) = channel.close().await {
                warn!(
                    "Session {}: DataChannel '{}' did not close cleanly: {}",
                    self.shared.session_id,
                    channel.label(),
                    e
                );
            }
        }
        self.transport.close().await
    }

    /// Resolves once this engine owns a data channel: immediately on the
    /// host after [`Peer::produce_offer`], on the client when the remote
    /// channel arrives.
    pub async fn wait_for_channel(&self) {
        let mut has_channel = self.shared.has_channel.subscribe();
        let _ = has_channel.wait_for(|owned| *owned).await;
    }

    /// Resolves once the channel is open.
    pub async fn wait_until_ready(&self) {
        let mut ready = self.shared.ready.subscribe();
        let _ = ready.wait_for(|open| *open).await;
    }

    /// The committed local description, if any.
    pub async fn local_description(&self) -> Option<SignalDescriptor> {
        self.transport.local_description().await
    }

    pub fn is_ready(&self) -> bool {
        *self.shared.ready.borrow()
    }

    pub fn has_channel(&self) -> bool {
        lock(&self.shared.channel).is_some()
    }

    pub fn channel_label(&self) -> Option<String> {
        lock(&self.shared.channel).as_ref().map(|c| c.label())
    }

    pub fn state(&self) -> HandshakeState {
        self.shared.state()
    }

    pub fn role(&self) -> Option<Role> {
        lock(&self.shared.handshake).role
    }

    pub fn session_id(&self) -> SessionId {
        self.shared.session_id
    }

    pub fn config(&self) -> &PeerConfig {
        &self.config
    }

    pub fn events(&self) -> &EventHub<PeerEvent> {
        &self.shared.hub
    }

    pub fn on(&self, kind: PeerEventKind, listener: Listener<PeerEvent>) -> &Self {
        self.shared.hub.subscribe(kind, listener);
        self
    }

    pub fn off(&self, kind: PeerEventKind, listener: &Listener<PeerEvent>) -> &Self {
        self.shared.hub.unsubscribe(kind, listener);
        self
    }
}

impl Drop for Peer {
    fn drop(&mut self) {
        self.pump.abort();
    }
}
