use ingot_macros::Message;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeConfig {
    pub tag: String,
    pub domain: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalConfig {
    pub tag: String,
    pub domain: String,
}

/// Reverse proxy bridges and portals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Message)]
#[message(name = "ingot.app.reverse.Config")]
pub struct Config {
    pub bridge_config: Vec<BridgeConfig>,
    pub portal_config: Vec<PortalConfig>,
}
