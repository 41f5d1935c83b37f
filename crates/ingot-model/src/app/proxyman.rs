//! Inbound and outbound handler managers.

use ingot_macros::Message;
use serde::{Deserialize, Serialize};

use crate::common::{Address, PortRange};
use crate::transport::StreamConfig;

/// The inbound handler manager. Carries no settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Message)]
#[message(name = "ingot.app.proxyman.InboundConfig")]
pub struct InboundConfig {}

/// The outbound handler manager. Carries no settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Message)]
#[message(name = "ingot.app.proxyman.OutboundConfig")]
pub struct OutboundConfig {}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AllocationType {
    /// Listen on all ports of the range at all times.
    #[default]
    Always,
    /// Listen on a random subset, refreshed periodically.
    Random,
    /// Ports are allocated by an external controller.
    External,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationStrategy {
    pub kind: AllocationType,
    /// Number of ports listened on concurrently (`Random` only).
    pub concurrency: Option<u32>,
    /// Refresh interval in minutes (`Random` only).
    pub refresh: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SniffingConfig {
    pub enabled: bool,
    pub destination_override: Vec<String>,
    pub metadata_only: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Message)]
#[message(name = "ingot.app.proxyman.ReceiverConfig")]
pub struct ReceiverConfig {
    pub port_range: Option<PortRange>,
    pub listen: Option<Address>,
    pub allocation_strategy: Option<AllocationStrategy>,
    pub stream_settings: Option<StreamConfig>,
    pub receive_original_destination: bool,
    pub sniffing_settings: Option<SniffingConfig>,
}

/// Chains an outbound through another outbound.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyConfig {
    pub tag: String,
    pub transport_layer_proxy: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiplexingConfig {
    pub enabled: bool,
    /// Max concurrent connections per physical connection.
    pub concurrency: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Message)]
#[message(name = "ingot.app.proxyman.SenderConfig")]
pub struct SenderConfig {
    pub via: Option<Address>,
    pub stream_settings: Option<StreamConfig>,
    pub proxy_settings: Option<ProxyConfig>,
    pub multiplex_settings: Option<MultiplexingConfig>,
}
