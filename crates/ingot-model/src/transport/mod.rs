//! Stream settings and per-protocol transport configurations.

pub mod http;
pub mod tcp;
pub mod tls;
pub mod websocket;

use ingot_core::TypedEnvelope;
use serde::{Deserialize, Serialize};

/// Settings of one transport protocol inside a [`StreamConfig`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportConfig {
    pub protocol_name: String,
    pub settings: Option<TypedEnvelope>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TproxyMode {
    #[default]
    Off,
    TProxy,
    Redirect,
}

/// Socket options applied to every connection of a handler.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocketConfig {
    pub mark: u32,
    pub tcp_fast_open: Option<bool>,
    pub tproxy: TproxyMode,
    pub accept_proxy_protocol: bool,
}

/// Transport and security settings of a handler.
///
/// `protocol_name` selects the transport in use; `transport_settings` may
/// carry settings for several protocols. `security_type` is the type
/// identifier of the active entry in `security_settings`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamConfig {
    pub protocol_name: String,
    pub transport_settings: Vec<TransportConfig>,
    pub security_type: String,
    pub security_settings: Vec<TypedEnvelope>,
    pub socket_settings: Option<SocketConfig>,
}
