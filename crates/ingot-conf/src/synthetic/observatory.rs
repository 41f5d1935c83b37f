//! Outbound observers: latency probing, burst probing, and sets of tagged
//! observers.

use ingot_core::{BuildContext, Buildable, ConfigResult, EXTENSION_MARKER};
use ingot_macros::register_builder;
use ingot_model::app::observatory::{BurstConfig, Config, HealthPingConfig, MultiConfig};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::category::OBSERVER;
use crate::cfgcommon::{DurationSpec, StringList};

#[register_builder(category = "service", name = "observatory")]
#[register_builder(category = "observer", name = "default")]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ObservatorySettings {
    pub subject_selector: StringList,
    #[serde(rename = "probeURL", alias = "probeUrl")]
    pub probe_url: String,
    pub probe_interval: DurationSpec,
}

impl Buildable for ObservatorySettings {
    type Output = Config;

    fn build(&self, _ctx: &BuildContext<'_>) -> ConfigResult<Config> {
        Ok(Config {
            subject_selector: self.subject_selector.to_vec(),
            probe_url: self.probe_url.clone(),
            probe_interval: self.probe_interval.0,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HealthPingSettings {
    pub destination: String,
    pub connectivity: String,
    pub interval: DurationSpec,
    pub sampling: u32,
    pub timeout: DurationSpec,
}

#[register_builder(category = "service", name = "burstObservatory")]
#[register_builder(category = "observer", name = "burst")]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BurstObservatorySettings {
    pub subject_selector: StringList,
    pub ping_config: Option<HealthPingSettings>,
}

impl Buildable for BurstObservatorySettings {
    type Output = BurstConfig;

    fn build(&self, _ctx: &BuildContext<'_>) -> ConfigResult<BurstConfig> {
        Ok(BurstConfig {
            subject_selector: self.subject_selector.to_vec(),
            ping_config: self.ping_config.as_ref().map(|ping| HealthPingConfig {
                destination: ping.destination.clone(),
                connectivity: ping.connectivity.clone(),
                interval: ping.interval.0,
                sampling_count: ping.sampling,
                timeout: ping.timeout.0,
            }),
        })
    }
}

/// `observers` is a tagged-feature array. Members without a `type`, or
/// with a type no observer is registered under, become plain observatories.
#[register_builder(category = "service", name = "multiObservatory")]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MultiObservatorySettings {
    pub observers: Value,
}

impl MultiObservatorySettings {
    fn members(&self, ctx: &BuildContext<'_>) -> Value {
        let Value::Array(items) = &self.observers else {
            return self.observers.clone();
        };
        let members = items
            .iter()
            .map(|item| {
                let mut item = item.clone();
                if let Some(kind) = item.get("type").and_then(Value::as_str)
                    && !kind.starts_with(EXTENSION_MARKER)
                    && !ctx.types().contains(OBSERVER, kind)
                {
                    debug!(kind, "Unknown observer type, using the default observatory");
                    item["type"] = Value::String(String::new());
                }
                item
            })
            .collect();
        Value::Array(members)
    }
}

impl Buildable for MultiObservatorySettings {
    type Output = MultiConfig;

    fn build(&self, ctx: &BuildContext<'_>) -> ConfigResult<MultiConfig> {
        Ok(MultiConfig {
            holders: ctx.load_tagged_features(OBSERVER, "default", &self.members(ctx))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use ingot_core::{ConfigError, TypeRegistry};
    use serde_json::json;

    use super::*;

    #[test]
    fn test_observatory_interval() {
        let types = TypeRegistry::new();
        let settings: ObservatorySettings = serde_json::from_value(json!({
            "subjectSelector": ["proxy"],
            "probeURL": "https://www.google.com/generate_204",
            "probeInterval": "2m"
        }))
        .unwrap();
        let config = settings.build(&BuildContext::new(&types)).unwrap();
        assert_eq!(config.probe_interval, Duration::from_secs(120));
        assert_eq!(config.subject_selector, vec!["proxy"]);
    }

    #[test]
    fn test_burst_without_ping() {
        let types = TypeRegistry::new();
        let settings: BurstObservatorySettings =
            serde_json::from_value(json!({ "subjectSelector": "a,b" })).unwrap();
        let config = settings.build(&BuildContext::new(&types)).unwrap();
        assert!(config.ping_config.is_none());
        assert_eq!(config.subject_selector.len(), 2);
    }

    #[test]
    fn test_multi_observatory() {
        let types = TypeRegistry::collect_all();
        let settings: MultiObservatorySettings = serde_json::from_value(json!({
            "observers": [
                { "tag": "plain", "settings": { "probeInterval": 10 } },
                { "type": "burst", "tag": "burst", "settings": { "pingConfig": { "sampling": 3 } } }
            ]
        }))
        .unwrap();
        let config = settings.build(&BuildContext::new(&types)).unwrap();

        let tags: Vec<_> = config.holders.tags().collect();
        assert_eq!(tags, vec!["plain", "burst"]);
        assert!(config.holders.get("plain").unwrap().is::<Config>());
        let burst: BurstConfig = config.holders.get("burst").unwrap().unpack().unwrap();
        assert_eq!(burst.ping_config.unwrap().sampling_count, 3);
    }

    #[test]
    fn test_unknown_member_type_is_plain_observatory() {
        let types = TypeRegistry::collect_all();
        let settings: MultiObservatorySettings = serde_json::from_value(json!({
            "observers": [
                { "type": "leastload", "tag": "a", "settings": { "probeInterval": 5 } },
                { "type": "default", "tag": "b" }
            ]
        }))
        .unwrap();
        let config = settings.build(&BuildContext::new(&types)).unwrap();

        let first: Config = config.holders.get("a").unwrap().unpack().unwrap();
        assert_eq!(first.probe_interval, Duration::from_secs(5));
        assert!(config.holders.get("b").unwrap().is::<Config>());
    }

    #[test]
    fn test_multi_observatory_duplicate_tag() {
        let types = TypeRegistry::collect_all();
        let settings: MultiObservatorySettings = serde_json::from_value(json!({
            "observers": [{ "tag": "a" }, { "tag": "a" }]
        }))
        .unwrap();
        let err = settings.build(&BuildContext::new(&types)).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateTag { .. }));
    }
}
