use crate::probe::{ProbeError, ProbeReport};
use crate::transport::{
    EventSender, PeerTransport, RtcTransportFactory, TransportEvent, TransportFactory,
};
use futures::future::join_all;
use pairline_core::{IceServerConfig, PeerConfig, PeerError};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

const PROBE_CHANNEL: &str = "reachability-probe";
const PROBE_EVENT_BUFFER: usize = 64;

/// Checks one STUN helper by gathering candidates on a throwaway connection
/// that knows only that helper.
#[derive(Debug, Clone)]
pub struct StunProbe {
    server: String,
    timeout: Duration,
}

impl StunProbe {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(6000);

    /// `server` is a bare `host:port`.
    pub fn new(server: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn server(&self) -> &str {
        &self.server
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Connection settings naming exactly the probed helper.
    pub fn config(&self) -> PeerConfig {
        PeerConfig {
            channel_name: PROBE_CHANNEL.to_owned(),
            ice_servers: vec![IceServerConfig::stun(&self.server)],
            ..PeerConfig::default()
        }
    }

    /// Races candidate gathering against the timeout.
    ///
    /// Succeeds with the observed address on the first server-reflexive
    /// candidate. The probe connection is closed on every path.
    pub async fn run(&self, factory: &dyn TransportFactory) -> Result<ProbeReport, ProbeError> {
        let transport = factory.connect(&self.config()).await?;
        let (events_tx, mut events_rx) = mpsc::channel(PROBE_EVENT_BUFFER);
        transport.attach(events_tx.clone());

        let mut report = ProbeReport::new(self.server.as_str());
        let outcome = tokio::select! {
            found = gather(transport.as_ref(), events_tx, &mut events_rx, &mut report) => Some(found),
            _ = tokio::time::sleep(self.timeout) => None,
        };

        if let Err(e) = transport.close().await {
            debug!("Probe connection for {} did not close cleanly: {}", self.server, e);
        }

        match outcome {
            Some(Ok(true)) => {
                info!(
                    "STUN {} reports address {}",
                    self.server,
                    report.address.as_deref().unwrap_or_default()
                );
                Ok(report)
            }
            Some(Ok(false)) => {
                warn!(
                    "STUN {} yielded no address ({} errors)",
                    self.server,
                    report.errors.len()
                );
                Err(ProbeError::Unreachable(report))
            }
            Some(Err(e)) => Err(ProbeError::Setup(e)),
            None => {
                warn!(
                    "STUN {} timed out after {:?} ({} errors)",
                    self.server,
                    self.timeout,
                    report.errors.len()
                );
                Err(ProbeError::Timeout {
                    report,
                    timeout: self.timeout,
                })
            }
        }
    }
}

/// Returns `Ok(true)` once a server-reflexive candidate was recorded.
async fn gather(
    transport: &dyn PeerTransport,
    events_tx: EventSender,
    events_rx: &mut mpsc::Receiver<TransportEvent>,
    report: &mut ProbeReport,
) -> Result<bool, PeerError> {
    // Never written to; it only makes the stack negotiate and gather.
    let channel = transport.create_channel(PROBE_CHANNEL).await?;
    channel.attach(events_tx);

    let offer = transport.create_offer().await?;
    transport.set_local_description(offer).await?;

    while let Some(event) = events_rx.recv().await {
        match event {
            TransportEvent::Candidate(candidate) if candidate.is_server_reflexive() => {
                report.address = Some(candidate.address);
                return Ok(true);
            }
            TransportEvent::CandidateError(err) => {
                debug!("Probe of {} recorded error: {}", report.server, err);
                report.record(err);
            }
            TransportEvent::GatheringComplete | TransportEvent::ChannelClose => {
                return Ok(false);
            }
            _ => {}
        }
    }
    Ok(false)
}

/// Probes `server` over the `webrtc` stack.
pub async fn stun_check(server: &str, timeout: Duration) -> Result<ProbeReport, ProbeError> {
    StunProbe::new(server)
        .with_timeout(timeout)
        .run(&RtcTransportFactory)
        .await
}

/// Probes every helper concurrently. Results follow the order of `servers`.
pub async fn probe_all<S: AsRef<str>>(
    servers: &[S],
    timeout: Duration,
    factory: &dyn TransportFactory,
) -> Vec<Result<ProbeReport, ProbeError>> {
    let probes: Vec<StunProbe> = servers
        .iter()
        .map(|server| StunProbe::new(server.as_ref()).with_timeout(timeout))
        .collect();

    join_all(probes.iter().map(|probe| probe.run(factory))).await
}
