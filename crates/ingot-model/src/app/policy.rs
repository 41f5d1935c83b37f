use std::collections::BTreeMap;

use ingot_macros::Message;
use serde::{Deserialize, Serialize};

/// Timeouts in seconds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeout {
    pub handshake: Option<u32>,
    pub connection_idle: Option<u32>,
    pub uplink_only: Option<u32>,
    pub downlink_only: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsPolicy {
    pub user_uplink: bool,
    pub user_downlink: bool,
}

/// Per-connection buffer size in bytes; `-1` means unlimited.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BufferPolicy {
    pub connection: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    pub timeout: Option<Timeout>,
    pub stats: Option<StatsPolicy>,
    pub buffer: Option<BufferPolicy>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemStats {
    pub inbound_uplink: bool,
    pub inbound_downlink: bool,
    pub outbound_uplink: bool,
    pub outbound_downlink: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemPolicy {
    pub stats: Option<SystemStats>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Message)]
#[message(name = "ingot.app.policy.Config")]
pub struct Config {
    /// Policies keyed by user level.
    pub level: BTreeMap<u32, Policy>,
    pub system: Option<SystemPolicy>,
}
