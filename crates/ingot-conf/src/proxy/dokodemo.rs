use ingot_core::{BuildContext, Buildable, ConfigResult};
use ingot_macros::register_builder;
use ingot_model::common::{Address, Network};
use ingot_model::proxy::dokodemo::Config;
use serde::Deserialize;

use crate::cfgcommon::NetworkList;

/// Transparent inbound. Networks default to TCP.
#[register_builder(category = "inbound", name = "dokodemo-door")]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DokodemoSettings {
    pub address: String,
    pub port: u16,
    pub network: NetworkList,
    pub timeout: u32,
    pub follow_redirect: bool,
    pub user_level: u32,
}

impl Buildable for DokodemoSettings {
    type Output = Config;

    fn build(&self, _ctx: &BuildContext<'_>) -> ConfigResult<Config> {
        Ok(Config {
            address: (!self.address.is_empty()).then(|| Address::parse(&self.address)),
            port: self.port.into(),
            networks: self.network.build("DokodemoSettings", &[Network::Tcp])?,
            timeout: self.timeout,
            follow_redirect: self.follow_redirect,
            user_level: self.user_level,
        })
    }
}

#[cfg(test)]
mod tests {
    use ingot_core::TypeRegistry;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_networks() {
        let types = TypeRegistry::new();
        let settings: DokodemoSettings =
            serde_json::from_value(json!({ "address": "8.8.8.8", "port": 53 })).unwrap();
        let config = settings.build(&BuildContext::new(&types)).unwrap();
        assert_eq!(config.networks, vec![Network::Tcp]);
        assert_eq!(config.port, 53);

        let settings: DokodemoSettings =
            serde_json::from_value(json!({ "network": "tcp,udp", "followRedirect": true })).unwrap();
        let config = settings.build(&BuildContext::new(&types)).unwrap();
        assert_eq!(config.networks, vec![Network::Tcp, Network::Udp]);
        assert!(config.follow_redirect);
        assert!(config.address.is_none());
    }
}
