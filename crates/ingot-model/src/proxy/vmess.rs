//! VMess accounts and handler settings.

use ingot_macros::Message;
use serde::{Deserialize, Serialize};

use crate::common::{SecurityConfig, ServerEndpoint, User};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Message)]
#[message(name = "ingot.proxy.vmess.Account")]
pub struct Account {
    /// UUID in canonical hyphenated form.
    pub id: String,
    pub alter_id: u32,
    pub security_settings: Option<SecurityConfig>,
    pub tests_enabled: String,
}

pub mod inbound {
    use super::*;

    /// Applied to users created through detours.
    #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct DefaultConfig {
        pub alter_id: u32,
        pub level: u32,
    }

    #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct DetourConfig {
        pub to: String,
    }

    #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Message)]
    #[message(name = "ingot.proxy.vmess.inbound.Config")]
    pub struct Config {
        pub user: Vec<User>,
        pub default: Option<DefaultConfig>,
        pub detour: Option<DetourConfig>,
        pub secure_encryption_only: bool,
    }
}

pub mod outbound {
    use super::*;

    #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Message)]
    #[message(name = "ingot.proxy.vmess.outbound.Config")]
    pub struct Config {
        pub receiver: Vec<ServerEndpoint>,
    }
}
