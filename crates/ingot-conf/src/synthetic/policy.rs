//! Per-level and system policies.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use ingot_core::{BuildContext, Buildable, ConfigError, ConfigResult};
use ingot_macros::register_builder;
use ingot_model::app::policy::{
    BufferPolicy, Config, Policy, StatsPolicy, SystemPolicy, SystemStats, Timeout,
};
use serde::Deserialize;

const TYPE_NAME: &str = "PolicySettings";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LevelSettings {
    pub handshake: Option<u32>,
    pub conn_idle: Option<u32>,
    pub uplink_only: Option<u32>,
    pub downlink_only: Option<u32>,
    pub stats_user_uplink: bool,
    pub stats_user_downlink: bool,
    /// Kilobytes; zero disables buffering and a negative value means unlimited.
    pub buffer_size: Option<i32>,
}

impl LevelSettings {
    fn build(&self) -> ConfigResult<Policy> {
        Ok(Policy {
            timeout: Some(Timeout {
                handshake: self.handshake,
                connection_idle: self.conn_idle,
                uplink_only: self.uplink_only,
                downlink_only: self.downlink_only,
            }),
            stats: Some(StatsPolicy {
                user_uplink: self.stats_user_uplink,
                user_downlink: self.stats_user_downlink,
            }),
            buffer: self.buffer_size.map(buffer_policy).transpose()?,
        })
    }
}

/// Converts a kilobyte count into a byte-valued buffer policy.
pub fn buffer_policy(size: i32) -> ConfigResult<BufferPolicy> {
    let connection = match size {
        0 => 0,
        size if size < 0 => -1,
        size => size.checked_mul(1024).ok_or_else(|| {
            ConfigError::validation("bufferSize", TYPE_NAME, format!("{size} KiB overflows"))
        })?,
    };
    Ok(BufferPolicy { connection })
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SystemSettings {
    pub stats_inbound_uplink: bool,
    pub stats_inbound_downlink: bool,
    pub stats_outbound_uplink: bool,
    pub stats_outbound_downlink: bool,
}

#[register_builder(category = "service", name = "policy")]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PolicySettings {
    pub levels: IndexMap<String, LevelSettings>,
    pub system: Option<SystemSettings>,
}

impl Buildable for PolicySettings {
    type Output = Config;

    fn build(&self, _ctx: &BuildContext<'_>) -> ConfigResult<Config> {
        let mut level = BTreeMap::new();
        for (key, settings) in &self.levels {
            let key: u32 = key.trim().parse().map_err(|_| {
                ConfigError::validation("levels", TYPE_NAME, format!("invalid level '{key}'"))
            })?;
            level.insert(key, settings.build()?);
        }

        Ok(Config {
            level,
            system: self.system.as_ref().map(|system| SystemPolicy {
                stats: Some(SystemStats {
                    inbound_uplink: system.stats_inbound_uplink,
                    inbound_downlink: system.stats_inbound_downlink,
                    outbound_uplink: system.stats_outbound_uplink,
                    outbound_downlink: system.stats_outbound_downlink,
                }),
            }),
        })
    }
}
