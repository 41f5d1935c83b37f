//! The v5 root document: log/router/dns objects, handler arrays and a map
//! of named services, all resolved through the type registry.

use indexmap::IndexMap;
use ingot_core::{BuildContext, Buildable, ConfigError, ConfigResult, RootAssembly, TypedEnvelope};
use ingot_model::app::{dispatcher, proxyman};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::info;

use crate::category::SERVICE;
use crate::handler::{InboundSettings, OutboundSettings};
use crate::synthetic::log::default_log_config;
use crate::transport::StreamSettingsV5;

pub type InboundConfig = InboundSettings<StreamSettingsV5>;
pub type OutboundConfig = OutboundSettings<StreamSettingsV5>;

/// A named service and its raw settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceDeclaration {
    pub name: String,
    pub settings: Value,
}

fn services_in_order<'de, D>(deserializer: D) -> Result<Vec<ServiceDeclaration>, D::Error>
where
    D: Deserializer<'de>,
{
    let services = Option::<IndexMap<String, Value>>::deserialize(deserializer)?;
    Ok(services
        .unwrap_or_default()
        .into_iter()
        .map(|(name, settings)| ServiceDeclaration { name, settings })
        .collect())
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RootConfig {
    pub log: Option<Value>,
    pub router: Option<Value>,
    pub dns: Option<Value>,
    pub inbounds: Vec<InboundConfig>,
    pub outbounds: Vec<OutboundConfig>,
    /// In document order.
    #[serde(deserialize_with = "services_in_order")]
    pub services: Vec<ServiceDeclaration>,
}

impl Buildable for RootConfig {
    type Output = RootAssembly;

    fn build(&self, ctx: &BuildContext<'_>) -> ConfigResult<RootAssembly> {
        let mut app = vec![
            TypedEnvelope::from_message(&dispatcher::Config {})?,
            TypedEnvelope::from_message(&proxyman::InboundConfig {})?,
            TypedEnvelope::from_message(&proxyman::OutboundConfig {})?,
        ];

        let log = match &self.log {
            Some(raw) => ctx.load_envelope(SERVICE, "log", "", raw)?,
            None => TypedEnvelope::from_message(&default_log_config())?,
        };
        app.insert(0, log);

        if let Some(raw) = &self.router {
            app.push(ctx.load_envelope(SERVICE, "router", "", raw)?);
        }
        if let Some(raw) = &self.dns {
            let dns = ctx
                .load_envelope(SERVICE, "dns", "", raw)
                .map_err(|err| ConfigError::delegation("dns", None, err))?;
            app.push(dns);
        }

        let inbound = self
            .inbounds
            .iter()
            .map(|handler| handler.build(ctx))
            .collect::<ConfigResult<Vec<_>>>()?;
        let outbound = self
            .outbounds
            .iter()
            .map(|handler| handler.build(ctx))
            .collect::<ConfigResult<Vec<_>>>()?;

        for service in &self.services {
            app.push(ctx.load_envelope(SERVICE, &service.name, "", &service.settings)?);
        }

        info!(
            apps = app.len(),
            inbounds = inbound.len(),
            outbounds = outbound.len(),
            services = self.services.len(),
            "Assembled v5 configuration"
        );
        Ok(RootAssembly {
            app,
            inbound,
            outbound,
        })
    }
}

#[cfg(test)]
mod tests {
    use ingot_core::TypeRegistry;
    use ingot_model::app::log::{self, LogType, Severity};
    use serde_json::json;

    use super::*;

    fn build(raw: Value) -> ConfigResult<RootAssembly> {
        let types = TypeRegistry::collect_all();
        let config: RootConfig = serde_json::from_value(raw).unwrap();
        config.build(&BuildContext::new(&types))
    }

    #[test]
    fn test_log_first() {
        let assembly = build(json!({ "log": { "loglevel": "debug" } })).unwrap();
        assert_eq!(assembly.app_types()[0], "ingot.app.log.Config");
        let log: log::Config = assembly.app[0].unpack().unwrap();
        assert_eq!(log.error.unwrap().level, Severity::Debug);

        let assembly = build(json!({})).unwrap();
        let log: log::Config = assembly.app[0].unpack().unwrap();
        assert_eq!(log.error.unwrap().kind, LogType::Console);
        assert_eq!(assembly.app.len(), 4);
    }

    #[test]
    fn test_services_keep_document_order() {
        let config: RootConfig = serde_json::from_str(
            r#"{ "services": { "stats": {}, "policy": {}, "reverse": {} } }"#,
        )
        .unwrap();
        let names: Vec<_> = config.services.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["stats", "policy", "reverse"]);

        let types = TypeRegistry::collect_all();
        let assembly = config.build(&BuildContext::new(&types)).unwrap();
        assert_eq!(
            &assembly.app_types()[4..],
            &[
                "ingot.app.stats.Config",
                "ingot.app.policy.Config",
                "ingot.app.reverse.Config"
            ]
        );
    }

    #[test]
    fn test_unknown_service() {
        let err = build(json!({ "services": { "teleport": {} } })).unwrap_err();
        assert!(
            matches!(err, ConfigError::UnknownType { ref category, ref type_name, .. }
                if category == "service" && type_name == "teleport")
        );
    }

    #[test]
    fn test_extension_service_without_resolver() {
        let err = build(json!({ "services": { "#vendor.Missing": {} } })).unwrap_err();
        assert!(matches!(err, ConfigError::SchemaNotFound { .. }));
    }

    #[test]
    fn test_router_then_dns() {
        let assembly = build(json!({
            "router": { "rules": [{ "inboundTag": ["in"], "outboundTag": "out" }] },
            "dns": { "servers": ["1.1.1.1"] }
        }))
        .unwrap();
        assert_eq!(
            &assembly.app_types()[4..],
            &["ingot.app.router.Config", "ingot.app.dns.Config"]
        );
    }
}
