//! Outbound health observers.

use std::time::Duration;

use ingot_core::TaggedFeatures;
use ingot_macros::Message;
use serde::{Deserialize, Serialize};

/// Periodic latency probing of the selected outbounds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Message)]
#[message(name = "ingot.app.observatory.Config")]
pub struct Config {
    pub subject_selector: Vec<String>,
    pub probe_url: String,
    pub probe_interval: Duration,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthPingConfig {
    pub destination: String,
    pub connectivity: String,
    pub interval: Duration,
    pub sampling_count: u32,
    pub timeout: Duration,
}

/// Burst probing with sampled health pings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Message)]
#[message(name = "ingot.app.observatory.burst.Config")]
pub struct BurstConfig {
    pub subject_selector: Vec<String>,
    pub ping_config: Option<HealthPingConfig>,
}

/// Several tagged observers side by side.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Message)]
#[message(name = "ingot.app.observatory.multiobservatory.Config")]
pub struct MultiConfig {
    pub holders: TaggedFeatures,
}
