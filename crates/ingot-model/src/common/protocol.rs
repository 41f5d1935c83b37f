use ingot_core::TypedEnvelope;
use serde::{Deserialize, Serialize};

use super::net::Address;

/// Payload encryption of a VMess-style account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SecurityType {
    #[default]
    Unknown,
    Auto,
    Aes128Gcm,
    Chacha20Poly1305,
    None,
    Zero,
}

impl SecurityType {
    /// Parses a security name as written in configuration documents.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "auto" | "" => Some(Self::Auto),
            "aes-128-gcm" => Some(Self::Aes128Gcm),
            "chacha20-poly1305" => Some(Self::Chacha20Poly1305),
            "none" => Some(Self::None),
            "zero" => Some(Self::Zero),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub kind: SecurityType,
}

/// A user of a proxy protocol; `account` holds the protocol-specific account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub level: u32,
    pub email: String,
    pub account: Option<TypedEnvelope>,
}

/// A remote server and the users to authenticate with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerEndpoint {
    pub address: Option<Address>,
    pub port: u32,
    pub user: Vec<User>,
}
