use ingot_macros::Message;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CertificateUsage {
    #[default]
    Encipherment,
    AuthorityVerify,
    AuthorityIssue,
}

/// PEM-encoded certificate and key, inlined.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    pub certificate: Vec<u8>,
    pub key: Vec<u8>,
    pub usage: CertificateUsage,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Message)]
#[message(name = "ingot.transport.tls.Config")]
pub struct Config {
    pub allow_insecure: bool,
    pub certificate: Vec<Certificate>,
    pub server_name: String,
    /// ALPN protocols, in preference order.
    pub next_protocol: Vec<String>,
    pub disable_system_root: bool,
}
