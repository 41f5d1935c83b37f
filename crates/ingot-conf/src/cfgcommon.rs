//! Shared value parsers for settings documents.

use std::net::IpAddr;
use std::time::Duration;

use ingot_core::{ConfigError, ConfigResult};
use ingot_model::common::{Address, Cidr, Network, PortRange};
use serde::de::{self, Deserializer};
use serde::Deserialize;

/// A list written either as an array of strings or as one comma-separated
/// string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringList(pub Vec<String>);

impl StringList {
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.0.clone()
    }
}

impl<'de> Deserialize<'de> for StringList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            One(String),
            Many(Vec<String>),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::One(text) => Self(
                text.split(',')
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .map(str::to_string)
                    .collect(),
            ),
            Raw::Many(items) => Self(items),
        })
    }
}

/// A port or an inclusive `from-to` range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortSpec {
    pub from: u16,
    pub to: u16,
}

impl PortSpec {
    pub fn build(&self) -> PortRange {
        PortRange {
            from: self.from.into(),
            to: self.to.into(),
        }
    }

    fn parse(text: &str) -> Result<Self, String> {
        let text = text.trim();
        let (from, to) = match text.split_once('-') {
            Some((from, to)) => (parse_port(from)?, parse_port(to)?),
            None => {
                let port = parse_port(text)?;
                (port, port)
            }
        };
        if from > to {
            return Err(format!("invalid port range '{text}'"));
        }
        Ok(Self { from, to })
    }
}

fn parse_port(text: &str) -> Result<u16, String> {
    text.trim()
        .parse::<u16>()
        .map_err(|_| format!("invalid port '{}'", text.trim()))
}

impl<'de> Deserialize<'de> for PortSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u16),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(port) => Ok(Self {
                from: port,
                to: port,
            }),
            Raw::Text(text) => Self::parse(&text).map_err(de::Error::custom),
        }
    }
}

/// Ports written as a number, a `"53,443,1000-2000"` string, or an array of
/// either.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortList(pub Vec<PortSpec>);

impl PortList {
    pub fn build(&self) -> Vec<PortRange> {
        self.0.iter().map(PortSpec::build).collect()
    }
}

impl<'de> Deserialize<'de> for PortList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u16),
            Text(String),
            Many(Vec<PortSpec>),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(port) => Ok(Self(vec![PortSpec {
                from: port,
                to: port,
            }])),
            Raw::Text(text) => text
                .split(',')
                .filter(|item| !item.trim().is_empty())
                .map(PortSpec::parse)
                .collect::<Result<Vec<_>, _>>()
                .map(Self)
                .map_err(de::Error::custom),
            Raw::Many(items) => Ok(Self(items)),
        }
    }
}

/// Network names, as a list or a comma-separated string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct NetworkList(pub StringList);

impl NetworkList {
    /// Resolves the names; an empty list yields `default`.
    pub fn build(&self, type_name: &str, default: &[Network]) -> ConfigResult<Vec<Network>> {
        if self.0.is_empty() {
            return Ok(default.to_vec());
        }
        self.0
            .iter()
            .map(|name| {
                Network::from_name(name).ok_or_else(|| {
                    ConfigError::validation("network", type_name, format!("unknown network '{name}'"))
                })
            })
            .collect()
    }
}

/// A duration written as humantime text (`"30s"`, `"1m 30s"`) or as an
/// integer number of seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DurationSpec(pub Duration);

impl<'de> Deserialize<'de> for DurationSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Seconds(u64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Seconds(secs) => Ok(Self(Duration::from_secs(secs))),
            Raw::Text(text) => humantime::parse_duration(&text)
                .map(Self)
                .map_err(|e| de::Error::custom(format!("invalid duration '{text}': {e}"))),
        }
    }
}

/// Parses an IP literal or a CIDR prefix; a bare IP is a full-length prefix.
pub fn parse_cidr(text: &str) -> Result<Cidr, String> {
    let (ip, prefix) = match text.split_once('/') {
        Some((ip, prefix)) => (ip, Some(prefix)),
        None => (text, None),
    };
    let ip: IpAddr = ip
        .trim()
        .parse()
        .map_err(|_| format!("invalid IP '{}'", ip.trim()))?;
    let (octets, bits) = match ip {
        IpAddr::V4(ip) => (ip.octets().to_vec(), 32),
        IpAddr::V6(ip) => (ip.octets().to_vec(), 128),
    };
    let prefix = match prefix {
        Some(prefix) => prefix
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|prefix| *prefix <= bits)
            .ok_or_else(|| format!("invalid prefix in '{text}'"))?,
        None => bits,
    };
    Ok(Cidr { ip: octets, prefix })
}

/// Splits `host:port`, accepting bracketed IPv6 hosts.
pub fn split_host_port(text: &str) -> Result<(Address, u16), String> {
    let (host, port) = text
        .rsplit_once(':')
        .ok_or_else(|| format!("missing port in '{text}'"))?;
    let host = host.trim_start_matches('[').trim_end_matches(']');
    if host.is_empty() {
        return Err(format!("missing host in '{text}'"));
    }
    Ok((Address::parse(host), parse_port(port)?))
}
