use ingot_core::{BuildContext, Buildable, ConfigError, ConfigResult};
use ingot_macros::register_builder;
use ingot_model::common::{Address, Endpoint, Network};
use ingot_model::proxy::dns::Config;
use serde::Deserialize;

/// DNS outbound. Unset fields keep the values of the intercepted query.
#[register_builder(category = "outbound", name = "dns")]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DnsOutboundSettings {
    pub network: String,
    pub address: String,
    pub port: u16,
    pub user_level: u32,
}

impl Buildable for DnsOutboundSettings {
    type Output = Config;

    fn build(&self, _ctx: &BuildContext<'_>) -> ConfigResult<Config> {
        let network = match self.network.as_str() {
            "" => Network::Unknown,
            "tcp" => Network::Tcp,
            "udp" => Network::Udp,
            other => {
                return Err(ConfigError::validation(
                    "network",
                    "DnsOutboundSettings",
                    format!("unknown network '{other}'"),
                ));
            }
        };
        Ok(Config {
            server: Endpoint {
                network,
                address: (!self.address.is_empty()).then(|| Address::parse(&self.address)),
                port: self.port.into(),
            },
            user_level: self.user_level,
        })
    }
}
