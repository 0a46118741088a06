use crate::error::PeerError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One reachability helper (STUN) or relay helper (TURN) entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IceServerConfig {
    pub urls: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential: Option<String>,
}

impl IceServerConfig {
    /// A STUN entry for a bare `host:port` address.
    pub fn stun(address: &str) -> Self {
        Self {
            urls: vec![format!("stun:{address}")],
            username: None,
            credential: None,
        }
    }

    pub fn turn(url: impl Into<String>, username: &str, credential: &str) -> Self {
        Self {
            urls: vec![url.into()],
            username: Some(username.to_owned()),
            credential: Some(credential.to_owned()),
        }
    }
}

/// Configuration for one peer connection. Fixed once the engine is built.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PeerConfig {
    /// Label of the data channel created by the host.
    pub channel_name: String,
    pub ice_servers: Vec<IceServerConfig>,
    /// Gather loopback candidates too (two peers on one machine).
    pub include_loopback: bool,
    /// Upper bound on waiting for candidate gathering before the local
    /// description is handed out for manual transport.
    pub gathering_timeout_ms: u64,
}

impl Default for PeerConfig {
    fn default() -> Self {
        Self {
            channel_name: "default".to_owned(),
            ice_servers: vec![
                IceServerConfig {
                    urls: vec![
                        "stun:stun.l.google.com:19302".to_owned(),
                        "stun:stun1.l.google.com:19302".to_owned(),
                        "stun:stun2.l.google.com:19302".to_owned(),
                        "stun:stun3.l.google.com:19302".to_owned(),
                        "stun:stun4.l.google.com:19302".to_owned(),
                        "stun:stun.nova.is:3478".to_owned(),
                    ],
                    username: None,
                    credential: None,
                },
                IceServerConfig {
                    urls: vec!["stun:stun.anyfirewall.com:3478".to_owned()],
                    username: None,
                    credential: None,
                },
                IceServerConfig::turn("turn:turn.bistri.com:80", "homeo", "homeo"),
                IceServerConfig::turn(
                    "turn:turn.anyfirewall.com:443?transport=tcp",
                    "webrtc",
                    "webrtc",
                ),
            ],
            include_loopback: false,
            gathering_timeout_ms: 10_000,
        }
    }
}

impl PeerConfig {
    /// Same defaults, different channel label.
    pub fn with_channel_name(name: impl Into<String>) -> Self {
        Self {
            channel_name: name.into(),
            ..Self::default()
        }
    }

    /// Parses a (possibly partial) JSON document; missing fields keep their
    /// defaults.
    pub fn from_json_str(text: &str) -> Result<Self, PeerError> {
        serde_json::from_str(text).map_err(|e| PeerError::Config(e.to_string()))
    }

    pub fn gathering_timeout(&self) -> Duration {
        Duration::from_millis(self.gathering_timeout_ms)
    }

    /// Every configured `stun:`/`stuns:` url, in configuration order.
    pub fn stun_urls(&self) -> impl Iterator<Item = &str> {
        self.ice_servers
            .iter()
            .flat_map(|server| server.urls.iter())
            .map(String::as_str)
            .filter(|url| url.starts_with("stun:") || url.starts_with("stuns:"))
    }
}
