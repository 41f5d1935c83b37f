//! VMess inbound and outbound settings.

use ingot_core::{BuildContext, Buildable, ConfigError, ConfigResult, TypedEnvelope};
use ingot_macros::register_builder;
use ingot_model::common::{Address, SecurityConfig, SecurityType, ServerEndpoint, User};
use ingot_model::proxy::vmess::{Account, inbound, outbound};
use serde::Deserialize;
use uuid::Uuid;

/// One user entry, shared by both directions.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserSettings {
    pub id: String,
    pub level: u32,
    pub alter_id: u32,
    pub email: String,
    pub security: String,
}

impl UserSettings {
    fn build(&self, type_name: &str) -> ConfigResult<User> {
        let id = Uuid::parse_str(&self.id).map_err(|err| {
            ConfigError::validation("id", type_name, format!("invalid UUID '{}': {err}", self.id))
        })?;
        // Unrecognized names fall back to negotiation.
        let kind = SecurityType::from_name(&self.security).unwrap_or(SecurityType::Auto);
        let account = Account {
            id: id.hyphenated().to_string(),
            alter_id: self.alter_id,
            security_settings: Some(SecurityConfig { kind }),
            tests_enabled: String::new(),
        };
        Ok(User {
            level: self.level,
            email: self.email.clone(),
            account: Some(TypedEnvelope::from_message(&account)?),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DefaultSettings {
    pub level: u32,
    pub alter_id: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DetourSettings {
    pub to: String,
}

#[register_builder(category = "inbound", name = "vmess")]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VMessInboundSettings {
    pub clients: Vec<UserSettings>,
    pub default: Option<DefaultSettings>,
    pub detour: Option<DetourSettings>,
    pub disable_insecure_encryption: bool,
}

impl Buildable for VMessInboundSettings {
    type Output = inbound::Config;

    fn build(&self, _ctx: &BuildContext<'_>) -> ConfigResult<inbound::Config> {
        Ok(inbound::Config {
            user: self
                .clients
                .iter()
                .map(|client| client.build("VMessInboundSettings"))
                .collect::<ConfigResult<_>>()?,
            default: self.default.as_ref().map(|default| inbound::DefaultConfig {
                alter_id: default.alter_id,
                level: default.level,
            }),
            detour: self
                .detour
                .as_ref()
                .map(|detour| inbound::DetourConfig {
                    to: detour.to.clone(),
                }),
            secure_encryption_only: self.disable_insecure_encryption,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub address: String,
    pub port: u16,
    pub users: Vec<UserSettings>,
}

#[register_builder(category = "outbound", name = "vmess")]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VMessOutboundSettings {
    pub vnext: Vec<ServerSettings>,
}

impl Buildable for VMessOutboundSettings {
    type Output = outbound::Config;

    fn build(&self, _ctx: &BuildContext<'_>) -> ConfigResult<outbound::Config> {
        const TYPE_NAME: &str = "VMessOutboundSettings";

        if self.vnext.is_empty() {
            return Err(ConfigError::missing_field("vnext", TYPE_NAME));
        }
        let receiver = self
            .vnext
            .iter()
            .map(|server| {
                if server.address.is_empty() {
                    return Err(ConfigError::missing_field("address", TYPE_NAME));
                }
                Ok(ServerEndpoint {
                    address: Some(Address::parse(&server.address)),
                    port: server.port.into(),
                    user: server
                        .users
                        .iter()
                        .map(|user| user.build(TYPE_NAME))
                        .collect::<ConfigResult<_>>()?,
                })
            })
            .collect::<ConfigResult<_>>()?;
        Ok(outbound::Config { receiver })
    }
}

#[cfg(test)]
mod tests {
    use ingot_core::TypeRegistry;
    use serde_json::json;

    use super::*;

    const ID: &str = "0cdf8a45-303d-4fed-9780-29aa7f54175e";

    #[test]
    fn test_inbound_clients() {
        let types = TypeRegistry::new();
        let settings: VMessInboundSettings = serde_json::from_value(json!({
            "clients": [{ "id": ID, "level": 1, "alterId": 4, "email": "love@v2fly.org", "security": "aes-128-gcm" }],
            "default": { "level": 0, "alterId": 32 },
            "detour": { "to": "tag_to_detour" },
            "disableInsecureEncryption": true
        }))
        .unwrap();
        let config = settings.build(&BuildContext::new(&types)).unwrap();

        let user = &config.user[0];
        assert_eq!(user.level, 1);
        let account: Account = user.account.as_ref().unwrap().unpack().unwrap();
        assert_eq!(account.id, ID);
        assert_eq!(account.alter_id, 4);
        assert_eq!(account.security_settings.unwrap().kind, SecurityType::Aes128Gcm);
        assert_eq!(config.default.unwrap().alter_id, 32);
        assert_eq!(config.detour.unwrap().to, "tag_to_detour");
        assert!(config.secure_encryption_only);
    }

    #[test]
    fn test_security_defaults_to_auto() {
        let types = TypeRegistry::new();
        let settings: VMessInboundSettings =
            serde_json::from_value(json!({ "clients": [{ "id": ID, "security": "rot13" }] }))
                .unwrap();
        let config = settings.build(&BuildContext::new(&types)).unwrap();
        let account: Account = config.user[0].account.as_ref().unwrap().unpack().unwrap();
        assert_eq!(account.security_settings.unwrap().kind, SecurityType::Auto);
        assert_eq!(account.alter_id, 0);
    }

    #[test]
    fn test_invalid_id() {
        let types = TypeRegistry::new();
        let settings: VMessInboundSettings =
            serde_json::from_value(json!({ "clients": [{ "id": "not-a-uuid" }] })).unwrap();
        let err = settings.build(&BuildContext::new(&types)).unwrap_err();
        assert!(matches!(err, ConfigError::FieldValidation { ref field, .. } if field == "id"));
    }

    #[test]
    fn test_outbound_vnext() {
        let types = TypeRegistry::new();
        let settings: VMessOutboundSettings = serde_json::from_value(json!({
            "vnext": [{ "address": "example.com", "port": 443, "users": [{ "id": ID }] }]
        }))
        .unwrap();
        let config = settings.build(&BuildContext::new(&types)).unwrap();
        assert_eq!(config.receiver[0].port, 443);
        assert_eq!(
            config.receiver[0].address,
            Some(Address::Domain("example.com".into()))
        );

        let settings = VMessOutboundSettings::default();
        assert!(settings.build(&BuildContext::new(&types)).is_err());
    }
}
