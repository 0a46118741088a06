use pairline_core::{IceCandidateError, PeerError};
use std::time::Duration;
use thiserror::Error;

/// What one probe learned about one helper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeReport {
    /// Externally observed address, once a server-reflexive candidate arrived.
    pub address: Option<String>,
    /// The helper that was probed, as `host:port`.
    pub server: String,
    pub ipv6_supported: bool,
    /// Every gathering error, in arrival order.
    pub errors: Vec<IceCandidateError>,
}

impl ProbeReport {
    pub fn new(server: impl Into<String>) -> Self {
        Self {
            address: None,
            server: server.into(),
            ipv6_supported: true,
            errors: Vec::new(),
        }
    }

    /// Records a gathering error. The masked "no IPv6 route" error also
    /// clears [`ProbeReport::ipv6_supported`].
    pub fn record(&mut self, err: IceCandidateError) {
        if err.is_no_ipv6_route() {
            self.ipv6_supported = false;
        }
        self.errors.push(err);
    }

    /// Errors that speak against the helper itself.
    pub fn failures(&self) -> impl Iterator<Item = &IceCandidateError> {
        self.errors.iter().filter(|e| !e.is_no_ipv6_route())
    }
}

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("no server-reflexive candidate from {} within {timeout:?}", report.server)]
    Timeout {
        report: ProbeReport,
        timeout: Duration,
    },

    /// Gathering finished (or the connection went away) without a
    /// server-reflexive candidate.
    #[error("{} yielded no server-reflexive candidate", .0.server)]
    Unreachable(ProbeReport),

    #[error("probe setup failed: {0}")]
    Setup(#[from] PeerError),
}

impl ProbeError {
    /// Partial diagnostics, when the probe got far enough to collect any.
    pub fn report(&self) -> Option<&ProbeReport> {
        match self {
            ProbeError::Timeout { report, .. } | ProbeError::Unreachable(report) => Some(report),
            ProbeError::Setup(_) => None,
        }
    }
}
