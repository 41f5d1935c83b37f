//! Built-in DNS resolver settings.

use std::net::IpAddr;

use indexmap::IndexMap;
use ingot_core::{BuildContext, Buildable, ConfigError, ConfigResult};
use ingot_macros::register_builder;
use ingot_model::app::dns::{Config, HostMapping, NameServer, QueryStrategy};
use ingot_model::app::router::{Domain, DomainKind};
use ingot_model::common::{Address, Endpoint, Network};
use serde::Deserialize;

use crate::cfgcommon::StringList;
use crate::synthetic::router::parse_domain;

const TYPE_NAME: &str = "DnsSettings";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NameServerObject {
    pub address: String,
    pub port: Option<u16>,
    #[serde(rename = "clientIp", alias = "clientIP")]
    pub client_ip: Option<String>,
    pub skip_fallback: bool,
    pub domains: StringList,
}

/// A server written as a bare address or as an object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NameServerSettings {
    Address(String),
    Object(NameServerObject),
}

impl NameServerSettings {
    fn build(&self) -> ConfigResult<NameServer> {
        let object = match self {
            Self::Address(address) => NameServerObject {
                address: address.clone(),
                ..Default::default()
            },
            Self::Object(object) => object.clone(),
        };
        if object.address.is_empty() {
            return Err(ConfigError::missing_field("address", TYPE_NAME));
        }
        Ok(NameServer {
            address: Some(Endpoint {
                network: Network::Udp,
                address: Some(Address::parse(&object.address)),
                port: object.port.unwrap_or(53).into(),
            }),
            client_ip: parse_client_ip(object.client_ip.as_deref())?,
            skip_fallback: object.skip_fallback,
            prioritized_domain: object
                .domains
                .iter()
                .map(parse_domain)
                .collect::<ConfigResult<Vec<_>>>()?,
        })
    }
}

/// One host entry value: addresses, or a domain to resolve instead.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum HostAddress {
    One(String),
    Many(Vec<String>),
}

impl HostAddress {
    fn targets(&self) -> Vec<&str> {
        match self {
            Self::One(one) => vec![one.as_str()],
            Self::Many(many) => many.iter().map(String::as_str).collect(),
        }
    }
}

#[register_builder(category = "service", name = "dns")]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DnsSettings {
    pub servers: Vec<NameServerSettings>,
    pub hosts: IndexMap<String, HostAddress>,
    #[serde(rename = "clientIp", alias = "clientIP")]
    pub client_ip: Option<String>,
    pub tag: String,
    pub disable_cache: bool,
    pub disable_fallback: bool,
    pub query_strategy: String,
}

impl Buildable for DnsSettings {
    type Output = Config;

    fn build(&self, _ctx: &BuildContext<'_>) -> ConfigResult<Config> {
        let query_strategy = match self.query_strategy.to_ascii_lowercase().as_str() {
            "" | "useip" => QueryStrategy::UseIp,
            "useipv4" => QueryStrategy::UseIp4,
            "useipv6" => QueryStrategy::UseIp6,
            other => {
                return Err(ConfigError::validation(
                    "queryStrategy",
                    TYPE_NAME,
                    format!("unknown strategy '{other}'"),
                ));
            }
        };

        Ok(Config {
            name_server: self
                .servers
                .iter()
                .map(NameServerSettings::build)
                .collect::<ConfigResult<_>>()?,
            static_hosts: self
                .hosts
                .iter()
                .map(|(domain, target)| build_host(domain, target))
                .collect::<ConfigResult<_>>()?,
            client_ip: parse_client_ip(self.client_ip.as_deref())?,
            tag: self.tag.clone(),
            disable_cache: self.disable_cache,
            disable_fallback: self.disable_fallback,
            query_strategy,
        })
    }
}

fn parse_client_ip(text: Option<&str>) -> ConfigResult<Vec<u8>> {
    match text.filter(|text| !text.is_empty()) {
        None => Ok(Vec::new()),
        Some(text) => match text.parse::<IpAddr>() {
            Ok(IpAddr::V4(ip)) => Ok(ip.octets().to_vec()),
            Ok(IpAddr::V6(ip)) => Ok(ip.octets().to_vec()),
            Err(_) => Err(ConfigError::validation(
                "clientIp",
                TYPE_NAME,
                format!("not an IP address: '{text}'"),
            )),
        },
    }
}

fn build_host(domain: &str, target: &HostAddress) -> ConfigResult<HostMapping> {
    // Host keys default to exact matching, unlike routing domains.
    let Domain { kind, value } = if domain.contains(':') {
        parse_domain(domain)?
    } else {
        Domain {
            kind: DomainKind::Full,
            value: domain.to_string(),
        }
    };

    let targets = target.targets();
    let mut mapping = HostMapping {
        kind,
        domain: value,
        ..Default::default()
    };
    match targets.as_slice() {
        [] => {
            return Err(ConfigError::validation(
                "hosts",
                TYPE_NAME,
                format!("no address for '{domain}'"),
            ));
        }
        [single] if !Address::parse(single).is_ip() => mapping.proxied_domain = single.to_string(),
        _ => {
            for target in targets {
                match Address::parse(target) {
                    Address::Ip(octets) => mapping.ip.push(octets),
                    Address::Domain(_) => {
                        return Err(ConfigError::validation(
                            "hosts",
                            TYPE_NAME,
                            format!("'{target}' is not an IP address"),
                        ));
                    }
                }
            }
        }
    }
    Ok(mapping)
}
