//! Network primitives.

use std::net::IpAddr;

use serde::{Deserialize, Serialize};

/// An IP address (raw octets) or a domain name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Address {
    Ip(Vec<u8>),
    Domain(String),
}

impl Address {
    /// Parses `text` as an IP literal, falling back to a domain.
    pub fn parse(text: &str) -> Self {
        match text.parse::<IpAddr>() {
            Ok(IpAddr::V4(ip)) => Self::Ip(ip.octets().to_vec()),
            Ok(IpAddr::V6(ip)) => Self::Ip(ip.octets().to_vec()),
            Err(_) => Self::Domain(text.to_string()),
        }
    }

    pub fn is_ip(&self) -> bool {
        matches!(self, Self::Ip(_))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Network {
    #[default]
    Unknown,
    Tcp,
    Udp,
    Unix,
}

impl Network {
    /// Parses a lowercase network name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "tcp" => Some(Self::Tcp),
            "udp" => Some(Self::Udp),
            "unix" => Some(Self::Unix),
            _ => None,
        }
    }
}

/// Inclusive port range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortRange {
    pub from: u32,
    pub to: u32,
}

impl PortRange {
    pub fn single(port: u16) -> Self {
        Self {
            from: port.into(),
            to: port.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub network: Network,
    pub address: Option<Address>,
    pub port: u32,
}

/// IP prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cidr {
    pub ip: Vec<u8>,
    pub prefix: u32,
}
