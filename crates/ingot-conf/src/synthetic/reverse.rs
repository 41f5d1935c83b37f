use ingot_core::{BuildContext, Buildable, ConfigError, ConfigResult};
use ingot_macros::register_builder;
use ingot_model::app::reverse::{BridgeConfig, Config, PortalConfig};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EndpointSettings {
    pub tag: String,
    pub domain: String,
}

impl EndpointSettings {
    fn validate(&self, type_name: &str) -> ConfigResult<(String, String)> {
        if self.tag.is_empty() {
            return Err(ConfigError::missing_field("tag", type_name));
        }
        if self.domain.is_empty() {
            return Err(ConfigError::missing_field("domain", type_name));
        }
        Ok((self.tag.clone(), self.domain.clone()))
    }
}

/// Reverse proxy `bridges` and `portals`.
#[register_builder(category = "service", name = "reverse")]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReverseSettings {
    pub bridges: Vec<EndpointSettings>,
    pub portals: Vec<EndpointSettings>,
}

impl Buildable for ReverseSettings {
    type Output = Config;

    fn build(&self, _ctx: &BuildContext<'_>) -> ConfigResult<Config> {
        let bridge_config = self
            .bridges
            .iter()
            .map(|bridge| {
                let (tag, domain) = bridge.validate("BridgeConfig")?;
                Ok(BridgeConfig { tag, domain })
            })
            .collect::<ConfigResult<_>>()?;
        let portal_config = self
            .portals
            .iter()
            .map(|portal| {
                let (tag, domain) = portal.validate("PortalConfig")?;
                Ok(PortalConfig { tag, domain })
            })
            .collect::<ConfigResult<_>>()?;

        Ok(Config {
            bridge_config,
            portal_config,
        })
    }
}

#[cfg(test)]
mod tests {
    use ingot_core::TypeRegistry;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_bridges_and_portals() {
        let types = TypeRegistry::new();
        let settings: ReverseSettings = serde_json::from_value(json!({
            "bridges": [{ "tag": "bridge", "domain": "reverse.test" }],
            "portals": [{ "tag": "portal", "domain": "reverse.test" }]
        }))
        .unwrap();
        let config = settings.build(&BuildContext::new(&types)).unwrap();
        assert_eq!(config.bridge_config[0].tag, "bridge");
        assert_eq!(config.portal_config[0].domain, "reverse.test");
    }

    #[test]
    fn test_missing_domain() {
        let types = TypeRegistry::new();
        let settings: ReverseSettings =
            serde_json::from_value(json!({ "portals": [{ "tag": "portal" }] })).unwrap();
        let err = settings.build(&BuildContext::new(&types)).unwrap_err();
        assert!(
            matches!(err, ConfigError::FieldValidation { ref field, ref type_name, .. }
                if field == "domain" && type_name == "PortalConfig")
        );
    }
}
