use crate::transport::{DataChannel, EventSender, PeerTransport, TransportEvent, TransportFactory};
use anyhow::Context;
use async_trait::async_trait;
use pairline_core::{
    CandidateKind, ChannelMessage, ConnectionState, IceCandidate, IceCandidateError, PeerConfig,
    PeerError, SdpKind, SignalDescriptor,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, info, warn};
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::MediaEngine;
use webrtc::api::setting_engine::SettingEngine;
use webrtc::api::{API, APIBuilder};
use webrtc::data_channel::RTCDataChannel;
use webrtc::data_channel::data_channel_message::DataChannelMessage;
use webrtc::ice_transport::ice_candidate::RTCIceCandidate;
use webrtc::ice_transport::ice_candidate_type::RTCIceCandidateType;
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;
use webrtc::peer_connection::sdp::sdp_type::RTCSdpType;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::peer_connection::signaling_state::RTCSignalingState;

/// Error code browsers use when a helper server could not be reached.
const HELPER_UNREACHABLE: u16 = 701;

/// Notifications a channel keeps while nobody is attached to it.
const RELAY_BACKLOG: usize = 256;

/// Builds transports on top of the `webrtc` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct RtcTransportFactory;

impl RtcTransportFactory {
    fn build_api(config: &PeerConfig) -> anyhow::Result<API> {
        // Codecs are registered even though only data channels are used.
        let mut media_engine = MediaEngine::default();
        media_engine
            .register_default_codecs()
            .context("Failed to register default codecs")?;

        let registry = register_default_interceptors(Registry::new(), &mut media_engine)
            .context("Failed to register interceptors")?;

        let mut setting_engine = SettingEngine::default();
        setting_engine.set_include_loopback_candidate(config.include_loopback);

        Ok(APIBuilder::new()
            .with_media_engine(media_engine)
            .with_interceptor_registry(registry)
            .with_setting_engine(setting_engine)
            .build())
    }

    fn rtc_configuration(config: &PeerConfig) -> RTCConfiguration {
        let ice_servers = config
            .ice_servers
            .iter()
            .map(|server| RTCIceServer {
                urls: server.urls.clone(),
                username: server.username.clone().unwrap_or_default(),
                credential: server.credential.clone().unwrap_or_default(),
                ..Default::default()
            })
            .collect();

        RTCConfiguration {
            ice_servers,
            ..Default::default()
        }
    }
}

#[async_trait]
impl TransportFactory for RtcTransportFactory {
    async fn connect(&self, config: &PeerConfig) -> Result<Arc<dyn PeerTransport>, PeerError> {
        let api = Self::build_api(config).map_err(|e| PeerError::Transport(format!("{e:#}")))?;
        let peer_connection = api
            .new_peer_connection(Self::rtc_configuration(config))
            .await
            .map_err(|e| PeerError::Transport(e.to_string()))?;

        Ok(Arc::new(RtcTransport {
            peer_connection: Arc::new(peer_connection),
            stun_urls: Arc::new(config.stun_urls().map(str::to_owned).collect()),
            gathering_timeout: config.gathering_timeout(),
        }))
    }
}

/// One `RTCPeerConnection`.
pub struct RtcTransport {
    peer_connection: Arc<RTCPeerConnection>,
    stun_urls: Arc<Vec<String>>,
    gathering_timeout: Duration,
}

fn negotiation(err: webrtc::Error) -> PeerError {
    PeerError::Negotiation(err.to_string())
}

fn to_rtc_description(descriptor: SignalDescriptor) -> Result<RTCSessionDescription, PeerError> {
    let parsed = match descriptor.kind {
        SdpKind::Offer => RTCSessionDescription::offer(descriptor.sdp),
        SdpKind::Answer => RTCSessionDescription::answer(descriptor.sdp),
    };
    parsed.map_err(|e| PeerError::InvalidSignal(e.to_string()))
}

fn from_rtc_description(description: RTCSessionDescription) -> Result<SignalDescriptor, PeerError> {
    match description.sdp_type {
        RTCSdpType::Offer => Ok(SignalDescriptor::offer(description.sdp)),
        RTCSdpType::Answer => Ok(SignalDescriptor::answer(description.sdp)),
        other => Err(PeerError::Negotiation(format!(
            "unsupported description type {other}"
        ))),
    }
}

fn to_candidate(candidate: &RTCIceCandidate) -> IceCandidate {
    let kind = match candidate.typ {
        RTCIceCandidateType::Host => CandidateKind::Host,
        RTCIceCandidateType::Srflx => CandidateKind::Srflx,
        RTCIceCandidateType::Prflx => CandidateKind::Prflx,
        RTCIceCandidateType::Relay => CandidateKind::Relay,
        _ => CandidateKind::Unspecified,
    };
    IceCandidate {
        kind,
        address: candidate.address.clone(),
        port: candidate.port,
        protocol: candidate.protocol.to_string(),
    }
}

fn to_connection_state(state: RTCPeerConnectionState) -> ConnectionState {
    match state {
        RTCPeerConnectionState::Connecting => ConnectionState::Connecting,
        RTCPeerConnectionState::Connected => ConnectionState::Connected,
        RTCPeerConnectionState::Disconnected => ConnectionState::Disconnected,
        RTCPeerConnectionState::Failed => ConnectionState::Failed,
        RTCPeerConnectionState::Closed => ConnectionState::Closed,
        _ => ConnectionState::New,
    }
}

#[async_trait]
impl PeerTransport for RtcTransport {
    fn attach(&self, events: EventSender) {
        let state_tx = events.clone();
        self.peer_connection
            .on_peer_connection_state_change(Box::new(move |s: RTCPeerConnectionState| {
                let tx = state_tx.clone();
                Box::pin(async move {
                    info!("Peer connection state changed: {}", s);
                    let _ = tx
                        .send(TransportEvent::ConnectionStateChange(to_connection_state(s)))
                        .await;
                })
            }));

        let signaling_tx = events.clone();
        self.peer_connection
            .on_signaling_state_change(Box::new(move |s: RTCSignalingState| {
                let tx = signaling_tx.clone();
                Box::pin(async move {
                    debug!("Signaling state changed: {}", s);
                    let _ = tx
                        .send(TransportEvent::SignalingStateChange(s.to_string()))
                        .await;
                })
            }));

        // The stack has no per-helper error callback. A gathering pass that
        // ends without any server-reflexive candidate is reported against
        // every configured STUN url instead.
        let ice_tx = events.clone();
        let srflx_seen = Arc::new(AtomicBool::new(false));
        let stun_urls = Arc::clone(&self.stun_urls);
        self.peer_connection
            .on_ice_candidate(Box::new(move |c: Option<RTCIceCandidate>| {
                let tx = ice_tx.clone();
                let srflx_seen = Arc::clone(&srflx_seen);
                let stun_urls = Arc::clone(&stun_urls);

                Box::pin(async move {
                    let Some(candidate) = c else {
                        debug!("ICE gathering complete");
                        if !srflx_seen.load(Ordering::SeqCst) {
                            for url in stun_urls.iter() {
                                let err = IceCandidateError::new(
                                    "STUN binding produced no server-reflexive candidate",
                                    "",
                                    HELPER_UNREACHABLE,
                                    0,
                                    url.as_str(),
                                );
                                let _ = tx.send(TransportEvent::CandidateError(err)).await;
                            }
                        }
                        let _ = tx.send(TransportEvent::GatheringComplete).await;
                        return;
                    };

                    let candidate = to_candidate(&candidate);
                    if candidate.is_server_reflexive() {
                        srflx_seen.store(true, Ordering::SeqCst);
                    }
                    debug!(
                        "ICE candidate gathered: {:?} {}:{}",
                        candidate.kind, candidate.address, candidate.port
                    );
                    let _ = tx.send(TransportEvent::Candidate(candidate)).await;
                })
            }));

        let dc_tx = events;
        self.peer_connection
            .on_data_channel(Box::new(move |dc: Arc<RTCDataChannel>| {
                let tx = dc_tx.clone();
                Box::pin(async move {
                    debug!("Remote DataChannel '{}' arrived", dc.label());
                    // Wired before returning, the stack starts reading right after.
                    let channel: Arc<dyn DataChannel> = Arc::new(RtcDataChannel::new(dc));
                    let _ = tx.send(TransportEvent::ChannelArrived(channel)).await;
                })
            }));
    }

    async fn create_channel(&self, label: &str) -> Result<Arc<dyn DataChannel>, PeerError> {
        let dc = self
            .peer_connection
            .create_data_channel(label, None)
            .await
            .map_err(negotiation)?;
        Ok(Arc::new(RtcDataChannel::new(dc)))
    }

    async fn create_offer(&self) -> Result<SignalDescriptor, PeerError> {
        let offer = self
            .peer_connection
            .create_offer(None)
            .await
            .map_err(negotiation)?;
        from_rtc_description(offer)
    }

    async fn create_answer(&self) -> Result<SignalDescriptor, PeerError> {
        let answer = self
            .peer_connection
            .create_answer(None)
            .await
            .map_err(negotiation)?;
        from_rtc_description(answer)
    }

    async fn set_local_description(&self, descriptor: SignalDescriptor) -> Result<(), PeerError> {
        self.peer_connection
            .set_local_description(to_rtc_description(descriptor)?)
            .await
            .map_err(negotiation)
    }

    async fn set_remote_description(
        &self,
        descriptor: SignalDescriptor,
    ) -> Result<(), PeerError> {
        self.peer_connection
            .set_remote_description(to_rtc_description(descriptor)?)
            .await
            .map_err(negotiation)
    }

    async fn local_description(&self) -> Option<SignalDescriptor> {
        // Signaling is copied by hand, so there is no trickle: the
        // description handed out has to carry the gathered candidates.
        let mut gathering_complete = self.peer_connection.gathering_complete_promise().await;
        if tokio::time::timeout(self.gathering_timeout, gathering_complete.recv())
            .await
            .is_err()
        {
            warn!(
                "ICE gathering still running after {:?}, using partial description",
                self.gathering_timeout
            );
        }

        let description = self.peer_connection.local_description().await?;
        from_rtc_description(description).ok()
    }

    async fn close(&self) -> Result<(), PeerError> {
        self.peer_connection
            .close()
            .await
            .map_err(|e| PeerError::Transport(e.to_string()))
    }
}

/// Notifications a channel raised before anyone attached to it.
enum Relay {
    Buffering(Vec<TransportEvent>),
    Attached(EventSender),
}

/// Routes one channel's notifications, holding them back until
/// [`DataChannel::attach`] is called.
#[derive(Clone)]
struct ChannelRelay {
    label: Arc<str>,
    state: Arc<tokio::sync::Mutex<Relay>>,
}

impl ChannelRelay {
    fn new(label: &str) -> Self {
        Self {
            label: Arc::from(label),
            state: Arc::new(tokio::sync::Mutex::new(Relay::Buffering(Vec::new()))),
        }
    }

    async fn forward(&self, event: TransportEvent) {
        let events = {
            let mut state = self.state.lock().await;
            match &mut *state {
                Relay::Attached(events) => events.clone(),
                Relay::Buffering(backlog) if backlog.len() < RELAY_BACKLOG => {
                    backlog.push(event);
                    return;
                }
                Relay::Buffering(_) => {
                    warn!(
                        "DataChannel '{}' backlog full, dropping {:?}",
                        self.label, event
                    );
                    return;
                }
            }
        };
        let _ = events.send(event).await;
    }

    /// Replays the backlog into `events` before anything raised later.
    async fn attach(&self, events: EventSender) {
        let mut state = self.state.lock().await;
        let previous = std::mem::replace(&mut *state, Relay::Attached(events.clone()));
        if let Relay::Buffering(backlog) = previous {
            if !backlog.is_empty() {
                debug!(
                    "DataChannel '{}' replaying {} early notifications",
                    self.label,
                    backlog.len()
                );
            }
            for event in backlog {
                let _ = events.send(event).await;
            }
        }
    }
}

/// One `RTCDataChannel`.
///
/// Callbacks are registered on construction: the stack starts reading as
/// soon as a remote channel is announced, and drops messages that arrive
/// before a message handler exists.
pub struct RtcDataChannel {
    inner: Arc<RTCDataChannel>,
    relay: ChannelRelay,
}

impl RtcDataChannel {
    fn new(inner: Arc<RTCDataChannel>) -> Self {
        let relay = ChannelRelay::new(inner.label());

        let open_relay = relay.clone();
        inner.on_open(Box::new(move || {
            let relay = open_relay.clone();
            Box::pin(async move {
                info!("DataChannel '{}' open", relay.label);
                relay.forward(TransportEvent::ChannelOpen).await;
            })
        }));

        let close_relay = relay.clone();
        inner.on_close(Box::new(move || {
            let relay = close_relay.clone();
            Box::pin(async move {
                info!("DataChannel '{}' closed", relay.label);
                relay.forward(TransportEvent::ChannelClose).await;
            })
        }));

        let msg_relay = relay.clone();
        inner.on_message(Box::new(move |msg: DataChannelMessage| {
            let relay = msg_relay.clone();
            Box::pin(async move {
                let message = if msg.is_string {
                    ChannelMessage::Text(String::from_utf8_lossy(&msg.data).into_owned())
                } else {
                    ChannelMessage::Binary(msg.data)
                };
                relay.forward(TransportEvent::Message(message)).await;
            })
        }));

        let error_label = Arc::clone(&relay.label);
        inner.on_error(Box::new(move |err: webrtc::Error| {
            let label = Arc::clone(&error_label);
            Box::pin(async move {
                warn!("DataChannel '{}' error: {}", label, err);
            })
        }));

        Self { inner, relay }
    }
}

#[async_trait]
impl DataChannel for RtcDataChannel {
    fn label(&self) -> String {
        self.inner.label().to_owned()
    }

    fn attach(&self, events: EventSender) {
        let relay = self.relay.clone();
        tokio::spawn(async move { relay.attach(events).await });
    }

    async fn send(&self, message: &ChannelMessage) -> Result<(), PeerError> {
        let sent = match message {
            ChannelMessage::Text(text) => self.inner.send_text(text.clone()).await,
            ChannelMessage::Binary(data) => self.inner.send(data).await,
        };
        sent.map(|_| ())
            .map_err(|e| PeerError::Transport(e.to_string()))
    }

    async fn close(&self) -> Result<(), PeerError> {
        self.inner
            .close()
            .await
            .map_err(|e| PeerError::Transport(e.to_string()))
    }
}
