//! Routing rules and balancers.

use ingot_macros::Message;
use serde::{Deserialize, Serialize};

use crate::common::{Cidr, Network, PortRange};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DomainStrategy {
    /// Route by domain only.
    #[default]
    AsIs,
    /// Resolve domains and route by IP.
    UseIp,
    /// Resolve only when no domain rule matches.
    IpIfNonMatch,
    /// Resolve as soon as an IP rule is met.
    IpOnDemand,
}

impl DomainStrategy {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "" | "asis" => Some(Self::AsIs),
            "useip" => Some(Self::UseIp),
            "ipifnonmatch" => Some(Self::IpIfNonMatch),
            "ipondemand" => Some(Self::IpOnDemand),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DomainKind {
    /// Substring match.
    #[default]
    Plain,
    Regex,
    /// The domain or any of its subdomains.
    RootDomain,
    /// Exact match.
    Full,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    pub kind: DomainKind,
    pub value: String,
}

/// Where a matched connection goes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleTarget {
    Tag(String),
    BalancingTag(String),
}

impl Default for RuleTarget {
    fn default() -> Self {
        Self::Tag(String::new())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingRule {
    pub target: RuleTarget,
    pub domain: Vec<Domain>,
    pub cidr: Vec<Cidr>,
    pub port_list: Vec<PortRange>,
    pub source_port_list: Vec<PortRange>,
    pub networks: Vec<Network>,
    pub source_cidr: Vec<Cidr>,
    pub user_email: Vec<String>,
    pub inbound_tag: Vec<String>,
    pub protocol: Vec<String>,
    pub attributes: String,
    pub domain_matcher: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalancingRule {
    pub tag: String,
    pub outbound_selector: Vec<String>,
    pub strategy: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Message)]
#[message(name = "ingot.app.router.Config")]
pub struct Config {
    pub domain_strategy: DomainStrategy,
    pub rule: Vec<RoutingRule>,
    pub balancing_rule: Vec<BalancingRule>,
}
