//! Routing settings: field rules and balancers.

use ingot_core::{BuildContext, Buildable, ConfigError, ConfigResult};
use ingot_macros::register_builder;
use ingot_model::app::router::{
    BalancingRule, Config, Domain, DomainKind, DomainStrategy, RoutingRule, RuleTarget,
};
use ingot_model::common::Cidr;
use serde::Deserialize;

use crate::cfgcommon::{NetworkList, PortList, StringList, parse_cidr};

const RULE: &str = "RoutingRule";

/// Legacy nested block: `"settings": { "domainStrategy", "rules" }`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RulesBlock {
    pub domain_strategy: Option<String>,
    pub rules: Vec<RuleSettings>,
}

#[register_builder(category = "service", name = "router")]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RouterSettings {
    pub domain_strategy: Option<String>,
    pub rules: Vec<RuleSettings>,
    pub balancers: Vec<BalancerSettings>,
    pub settings: Option<RulesBlock>,
}

impl Buildable for RouterSettings {
    type Output = Config;

    fn build(&self, _ctx: &BuildContext<'_>) -> ConfigResult<Config> {
        let legacy = self.settings.as_ref();
        let strategy = self
            .domain_strategy
            .as_deref()
            .or_else(|| legacy.and_then(|block| block.domain_strategy.as_deref()))
            .unwrap_or_default();
        let domain_strategy = DomainStrategy::from_name(strategy).ok_or_else(|| {
            ConfigError::validation(
                "domainStrategy",
                "RouterSettings",
                format!("unknown strategy '{strategy}'"),
            )
        })?;

        let rule = legacy
            .into_iter()
            .flat_map(|block| block.rules.iter())
            .chain(self.rules.iter())
            .map(RuleSettings::build)
            .collect::<ConfigResult<Vec<_>>>()?;
        let balancing_rule = self
            .balancers
            .iter()
            .map(BalancerSettings::build)
            .collect::<ConfigResult<Vec<_>>>()?;

        Ok(Config {
            domain_strategy,
            rule,
            balancing_rule,
        })
    }
}

/// One `"type": "field"` routing rule.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RuleSettings {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(alias = "domains")]
    pub domain: StringList,
    pub ip: StringList,
    pub port: Option<PortList>,
    pub source_port: Option<PortList>,
    pub network: NetworkList,
    pub source: StringList,
    pub user: StringList,
    pub inbound_tag: StringList,
    pub protocol: StringList,
    pub attrs: String,
    pub outbound_tag: String,
    pub balancer_tag: String,
    pub domain_matcher: String,
}

impl RuleSettings {
    fn build(&self) -> ConfigResult<RoutingRule> {
        if !self.kind.is_empty() && self.kind != "field" {
            return Err(ConfigError::validation(
                "type",
                RULE,
                format!("unknown rule type '{}'", self.kind),
            ));
        }
        let target = match (self.outbound_tag.as_str(), self.balancer_tag.as_str()) {
            ("", "") => {
                return Err(ConfigError::validation(
                    "outboundTag",
                    RULE,
                    "neither outboundTag nor balancerTag is specified",
                ));
            }
            ("", balancer) => RuleTarget::BalancingTag(balancer.to_string()),
            (outbound, _) => RuleTarget::Tag(outbound.to_string()),
        };

        Ok(RoutingRule {
            target,
            domain: self
                .domain
                .iter()
                .map(parse_domain)
                .collect::<ConfigResult<_>>()?,
            cidr: cidr_list("ip", &self.ip)?,
            port_list: self.port.as_ref().map(PortList::build).unwrap_or_default(),
            source_port_list: self
                .source_port
                .as_ref()
                .map(PortList::build)
                .unwrap_or_default(),
            networks: self.network.build(RULE, &[])?,
            source_cidr: cidr_list("source", &self.source)?,
            user_email: self.user.to_vec(),
            inbound_tag: self.inbound_tag.to_vec(),
            protocol: self.protocol.to_vec(),
            attributes: self.attrs.clone(),
            domain_matcher: self.domain_matcher.clone(),
        })
    }
}

fn cidr_list(field: &str, list: &StringList) -> ConfigResult<Vec<Cidr>> {
    list.iter()
        .map(|entry| {
            if entry.starts_with("geoip:") || entry.starts_with("ext:") {
                return Err(ConfigError::validation(
                    field,
                    RULE,
                    format!("geodata entry '{entry}' is not supported"),
                ));
            }
            parse_cidr(entry).map_err(|reason| ConfigError::validation(field, RULE, reason))
        })
        .collect()
}

/// Parses a domain matcher; a bare value is a substring match.
pub fn parse_domain(entry: &str) -> ConfigResult<Domain> {
    let (kind, value) = match entry.split_once(':') {
        Some(("regexp", value)) => (DomainKind::Regex, value.to_string()),
        Some(("domain", value)) => (DomainKind::RootDomain, value.to_string()),
        Some(("full", value)) => (DomainKind::Full, value.to_string()),
        Some(("keyword", value)) => (DomainKind::Plain, value.to_string()),
        Some(("dotless", value)) => (DomainKind::Regex, format!("^[^.]*{value}[^.]*$")),
        Some(("geosite" | "ext", _)) => {
            return Err(ConfigError::validation(
                "domain",
                RULE,
                format!("geodata entry '{entry}' is not supported"),
            ));
        }
        _ => (DomainKind::Plain, entry.to_string()),
    };
    if value.is_empty() {
        return Err(ConfigError::validation(
            "domain",
            RULE,
            format!("empty domain in '{entry}'"),
        ));
    }
    Ok(Domain { kind, value })
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StrategySettings {
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BalancerSettings {
    pub tag: String,
    pub selector: StringList,
    pub strategy: StrategySettings,
}

impl BalancerSettings {
    fn build(&self) -> ConfigResult<BalancingRule> {
        if self.tag.is_empty() {
            return Err(ConfigError::missing_field("tag", "BalancerSettings"));
        }
        if self.selector.is_empty() {
            return Err(ConfigError::missing_field("selector", "BalancerSettings"));
        }
        let strategy = match self.strategy.kind.to_ascii_lowercase().as_str() {
            "" | "random" => "random".to_string(),
            "leastping" => "leastping".to_string(),
            other => {
                return Err(ConfigError::validation(
                    "strategy",
                    "BalancerSettings",
                    format!("unknown strategy '{other}'"),
                ));
            }
        };
        Ok(BalancingRule {
            tag: self.tag.clone(),
            outbound_selector: self.selector.to_vec(),
            strategy,
        })
    }
}
