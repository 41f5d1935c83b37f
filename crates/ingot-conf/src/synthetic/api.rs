//! Management API settings and the services it can expose.

use ingot_core::{BuildContext, Buildable, ConfigError, ConfigResult, EXTENSION_MARKER};
use ingot_macros::register_builder;
use ingot_model::app::commander::{
    Config, HandlerServiceConfig, LoggerServiceConfig, ObservatoryServiceConfig,
    ReflectionConfig, RoutingServiceConfig, StatsServiceConfig,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::category::GRPC_SERVICE;

#[register_builder(category = "service", name = "api")]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    pub tag: String,
    pub services: Vec<String>,
}

impl Buildable for ApiSettings {
    type Output = Config;

    fn build(&self, ctx: &BuildContext<'_>) -> ConfigResult<Config> {
        if self.tag.is_empty() {
            return Err(ConfigError::missing_field("tag", "ApiSettings"));
        }

        let mut service = Vec::with_capacity(self.services.len());
        for name in &self.services {
            if !name.starts_with(EXTENSION_MARKER) && !ctx.types().contains(GRPC_SERVICE, name) {
                debug!(service = %name, "Skipping unknown API service");
                continue;
            }
            service.push(ctx.load_envelope(GRPC_SERVICE, name, "", &Value::Null)?);
        }

        Ok(Config {
            tag: self.tag.clone(),
            service,
        })
    }
}

#[register_builder(category = "grpcservice", name = "ReflectionService")]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReflectionSettings {}

impl Buildable for ReflectionSettings {
    type Output = ReflectionConfig;

    fn build(&self, _ctx: &BuildContext<'_>) -> ConfigResult<ReflectionConfig> {
        Ok(ReflectionConfig {})
    }
}

#[register_builder(category = "grpcservice", name = "HandlerService")]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HandlerServiceSettings {}

impl Buildable for HandlerServiceSettings {
    type Output = HandlerServiceConfig;

    fn build(&self, _ctx: &BuildContext<'_>) -> ConfigResult<HandlerServiceConfig> {
        Ok(HandlerServiceConfig {})
    }
}

#[register_builder(category = "grpcservice", name = "LoggerService")]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggerServiceSettings {}

impl Buildable for LoggerServiceSettings {
    type Output = LoggerServiceConfig;

    fn build(&self, _ctx: &BuildContext<'_>) -> ConfigResult<LoggerServiceConfig> {
        Ok(LoggerServiceConfig {})
    }
}

#[register_builder(category = "grpcservice", name = "StatsService")]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatsServiceSettings {}

impl Buildable for StatsServiceSettings {
    type Output = StatsServiceConfig;

    fn build(&self, _ctx: &BuildContext<'_>) -> ConfigResult<StatsServiceConfig> {
        Ok(StatsServiceConfig {})
    }
}

#[register_builder(category = "grpcservice", name = "ObservatoryService")]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ObservatoryServiceSettings {}

impl Buildable for ObservatoryServiceSettings {
    type Output = ObservatoryServiceConfig;

    fn build(&self, _ctx: &BuildContext<'_>) -> ConfigResult<ObservatoryServiceConfig> {
        Ok(ObservatoryServiceConfig {})
    }
}

#[register_builder(category = "grpcservice", name = "RoutingService")]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoutingServiceSettings {}

impl Buildable for RoutingServiceSettings {
    type Output = RoutingServiceConfig;

    fn build(&self, _ctx: &BuildContext<'_>) -> ConfigResult<RoutingServiceConfig> {
        Ok(RoutingServiceConfig {})
    }
}

#[cfg(test)]
mod tests {
    use ingot_core::{FieldDescriptor, FieldKind, MessageSchema, SchemaRegistry, TypeRegistry};
    use serde_json::json;

    use super::*;

    fn build(ctx: &BuildContext<'_>, raw: Value) -> ConfigResult<Config> {
        let settings: ApiSettings = serde_json::from_value(raw).unwrap();
        settings.build(ctx)
    }

    #[test]
    fn test_services_case_insensitive() {
        let types = TypeRegistry::collect_all();
        let config = build(
            &BuildContext::new(&types),
            json!({ "tag": "api", "services": ["handlerservice", "StatsService", "Unknown"] }),
        )
        .unwrap();

        assert_eq!(config.tag, "api");
        assert_eq!(config.service.len(), 2);
        assert!(config.service[0].is::<HandlerServiceConfig>());
        assert!(config.service[1].is::<StatsServiceConfig>());
    }

    #[test]
    fn test_extension_service() {
        let types = TypeRegistry::collect_all();
        let schemas = SchemaRegistry::new();
        schemas.register(MessageSchema::new(
            "vendor.api.Custom",
            vec![FieldDescriptor::new("enabled", FieldKind::Bool)],
        ));
        let ctx = BuildContext::new(&types).with_schemas(&schemas);

        let config =
            build(&ctx, json!({ "tag": "api", "services": ["#vendor.api.Custom"] })).unwrap();
        assert_eq!(config.service.len(), 1);
        assert_eq!(config.service[0].type_name(), "vendor.api.Custom");
    }

    #[test]
    fn test_missing_tag() {
        let types = TypeRegistry::collect_all();
        assert!(build(&BuildContext::new(&types), json!({ "services": [] })).is_err());
    }
}
