use ingot_core::{BuildContext, Buildable, ConfigError, ConfigResult};
use ingot_macros::register_builder;
use ingot_model::common::ServerEndpoint;
use ingot_model::proxy::freedom::{Config, DestinationOverride, DomainStrategy};
use serde::Deserialize;

use crate::cfgcommon::split_host_port;

const TYPE_NAME: &str = "FreedomSettings";

/// Direct outbound.
#[register_builder(category = "outbound", name = "freedom")]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FreedomSettings {
    pub domain_strategy: String,
    /// `host:port` every connection is redirected to.
    pub redirect: String,
    pub user_level: u32,
}

impl Buildable for FreedomSettings {
    type Output = Config;

    fn build(&self, _ctx: &BuildContext<'_>) -> ConfigResult<Config> {
        let domain_strategy = DomainStrategy::from_name(&self.domain_strategy).ok_or_else(|| {
            ConfigError::validation(
                "domainStrategy",
                TYPE_NAME,
                format!("unknown strategy '{}'", self.domain_strategy),
            )
        })?;

        let destination_override = if self.redirect.is_empty() {
            None
        } else {
            let (address, port) = split_host_port(&self.redirect)
                .map_err(|reason| ConfigError::validation("redirect", TYPE_NAME, reason))?;
            Some(DestinationOverride {
                server: Some(ServerEndpoint {
                    address: Some(address),
                    port: port.into(),
                    user: Vec::new(),
                }),
            })
        };

        Ok(Config {
            domain_strategy,
            destination_override,
            user_level: self.user_level,
        })
    }
}
