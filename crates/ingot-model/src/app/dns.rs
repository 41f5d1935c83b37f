//! Built-in DNS resolver configuration.

use ingot_macros::Message;
use serde::{Deserialize, Serialize};

use crate::app::router::{Domain, DomainKind};
use crate::common::Endpoint;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameServer {
    pub address: Option<Endpoint>,
    pub client_ip: Vec<u8>,
    pub skip_fallback: bool,
    pub prioritized_domain: Vec<Domain>,
}

/// A static host entry. Either `ip` or `proxied_domain` is set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostMapping {
    pub kind: DomainKind,
    pub domain: String,
    pub ip: Vec<Vec<u8>>,
    pub proxied_domain: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryStrategy {
    #[default]
    UseIp,
    UseIp4,
    UseIp6,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Message)]
#[message(name = "ingot.app.dns.Config")]
pub struct Config {
    pub name_server: Vec<NameServer>,
    /// In document order.
    pub static_hosts: Vec<HostMapping>,
    pub client_ip: Vec<u8>,
    pub tag: String,
    pub disable_cache: bool,
    pub disable_fallback: bool,
    pub query_strategy: QueryStrategy,
}
