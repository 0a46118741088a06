use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Source address reported when a helper's IPv6 record resolved but the
/// host has no IPv6 route. Browsers mask the address this way.
pub const NO_IPV6_ROUTE_ADDRESS: &str = "[0:0:0:x:x:x:x:x]";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CandidateKind {
    Host,
    /// Address as seen from outside the local network.
    Srflx,
    Prflx,
    Relay,
    Unspecified,
}

/// A locally gathered reachability candidate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IceCandidate {
    pub kind: CandidateKind,
    pub address: String,
    pub port: u16,
    pub protocol: String,
}

impl IceCandidate {
    pub fn is_server_reflexive(&self) -> bool {
        self.kind == CandidateKind::Srflx
    }
}

/// One failed reachability attempt against one helper server.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[error("{message} ({url}, code {error_code})")]
pub struct IceCandidateError {
    pub message: String,
    pub address: String,
    pub error_code: u16,
    pub port: u16,
    pub url: String,
}

impl IceCandidateError {
    pub fn new(
        message: impl Into<String>,
        address: impl Into<String>,
        error_code: u16,
        port: u16,
        url: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            address: address.into(),
            error_code,
            port,
            url: url.into(),
        }
    }

    /// True for the masked "no IPv6 route" failure, which means the host lacks
    /// IPv6, not that the helper is unreachable.
    pub fn is_no_ipv6_route(&self) -> bool {
        self.address == NO_IPV6_ROUTE_ADDRESS
    }
}
