use ingot_macros::Message;
use serde::{Deserialize, Serialize};

use crate::common::ServerEndpoint;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DomainStrategy {
    #[default]
    AsIs,
    UseIp,
    UseIp4,
    UseIp6,
}

impl DomainStrategy {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "" | "asis" => Some(Self::AsIs),
            "useip" => Some(Self::UseIp),
            "useipv4" | "useip4" => Some(Self::UseIp4),
            "useipv6" | "useip6" => Some(Self::UseIp6),
            _ => None,
        }
    }
}

/// Redirects every connection to a fixed destination.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationOverride {
    pub server: Option<ServerEndpoint>,
}

/// Direct outbound.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Message)]
#[message(name = "ingot.proxy.freedom.Config")]
pub struct Config {
    pub domain_strategy: DomainStrategy,
    pub destination_override: Option<DestinationOverride>,
    pub user_level: u32,
}
