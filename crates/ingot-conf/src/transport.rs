//! Stream settings: transport protocol, TLS, and socket options.
//!
//! v4 documents carry one settings block per protocol next to `network`;
//! v5 documents name a single transport and security protocol and resolve
//! them through the `transport` and `security` registry categories.

use indexmap::IndexMap;
use ingot_core::{BuildContext, Buildable, ConfigError, ConfigResult, Message, TypedEnvelope};
use ingot_macros::register_builder;
use ingot_model::transport::tls::{Certificate, CertificateUsage};
use ingot_model::transport::websocket::Header;
use ingot_model::transport::{
    SocketConfig, StreamConfig, TproxyMode, TransportConfig, http, tcp, tls, websocket,
};
use serde::Deserialize;
use serde_json::Value;

use crate::category::{SECURITY, TRANSPORT};
use crate::cfgcommon::StringList;

const STREAM: &str = "StreamSettings";

#[register_builder(category = "transport", name = "tcp")]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TcpSettings {
    pub accept_proxy_protocol: bool,
}

impl Buildable for TcpSettings {
    type Output = tcp::Config;

    fn build(&self, _ctx: &BuildContext<'_>) -> ConfigResult<tcp::Config> {
        Ok(tcp::Config {
            accept_proxy_protocol: self.accept_proxy_protocol,
        })
    }
}

#[register_builder(category = "transport", name = "websocket")]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WebSocketSettings {
    pub path: String,
    pub headers: IndexMap<String, String>,
    pub accept_proxy_protocol: bool,
    pub max_early_data: i32,
    pub early_data_header_name: String,
}

impl Buildable for WebSocketSettings {
    type Output = websocket::Config;

    fn build(&self, _ctx: &BuildContext<'_>) -> ConfigResult<websocket::Config> {
        Ok(websocket::Config {
            path: self.path.clone(),
            header: self
                .headers
                .iter()
                .map(|(key, value)| Header {
                    key: key.clone(),
                    value: value.clone(),
                })
                .collect(),
            accept_proxy_protocol: self.accept_proxy_protocol,
            max_early_data: self.max_early_data,
            early_data_header_name: self.early_data_header_name.clone(),
        })
    }
}

#[register_builder(category = "transport", name = "http")]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    pub host: StringList,
    pub path: String,
    pub method: String,
}

impl Buildable for HttpSettings {
    type Output = http::Config;

    fn build(&self, _ctx: &BuildContext<'_>) -> ConfigResult<http::Config> {
        Ok(http::Config {
            host: self.host.to_vec(),
            path: self.path.clone(),
            method: self.method.clone(),
        })
    }
}

/// PEM text, as one string or as an array of lines.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PemText {
    Text(String),
    Lines(Vec<String>),
}

impl PemText {
    fn to_bytes(&self) -> Vec<u8> {
        match self {
            Self::Text(text) => text.clone().into_bytes(),
            Self::Lines(lines) => lines.join("\n").into_bytes(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CertificateSettings {
    pub certificate: Option<PemText>,
    pub key: Option<PemText>,
    pub usage: String,
}

impl CertificateSettings {
    fn build(&self) -> ConfigResult<Certificate> {
        let usage = match self.usage.to_ascii_lowercase().as_str() {
            "" | "encipherment" => CertificateUsage::Encipherment,
            "verify" => CertificateUsage::AuthorityVerify,
            "issue" => CertificateUsage::AuthorityIssue,
            other => {
                return Err(ConfigError::validation(
                    "usage",
                    "CertificateSettings",
                    format!("unknown usage '{other}'"),
                ));
            }
        };
        let certificate = self
            .certificate
            .as_ref()
            .map(PemText::to_bytes)
            .ok_or_else(|| ConfigError::missing_field("certificate", "CertificateSettings"))?;
        let key = self.key.as_ref().map(PemText::to_bytes).unwrap_or_default();
        if key.is_empty() && usage != CertificateUsage::AuthorityVerify {
            return Err(ConfigError::missing_field("key", "CertificateSettings"));
        }
        Ok(Certificate {
            certificate,
            key,
            usage,
        })
    }
}

#[register_builder(category = "security", name = "tls")]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TlsSettings {
    pub allow_insecure: bool,
    pub certificates: Vec<CertificateSettings>,
    pub server_name: String,
    pub alpn: StringList,
    pub disable_system_root: bool,
}

impl Buildable for TlsSettings {
    type Output = tls::Config;

    fn build(&self, _ctx: &BuildContext<'_>) -> ConfigResult<tls::Config> {
        Ok(tls::Config {
            allow_insecure: self.allow_insecure,
            certificate: self
                .certificates
                .iter()
                .map(CertificateSettings::build)
                .collect::<ConfigResult<_>>()?,
            server_name: self.server_name.clone(),
            next_protocol: self.alpn.to_vec(),
            disable_system_root: self.disable_system_root,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SocketSettings {
    pub mark: u32,
    pub tcp_fast_open: Option<bool>,
    pub tproxy: String,
    pub accept_proxy_protocol: bool,
}

impl SocketSettings {
    pub fn build(&self) -> ConfigResult<SocketConfig> {
        let tproxy = match self.tproxy.to_ascii_lowercase().as_str() {
            "" | "off" => TproxyMode::Off,
            "tproxy" => TproxyMode::TProxy,
            "redirect" => TproxyMode::Redirect,
            other => {
                return Err(ConfigError::validation(
                    "tproxy",
                    "SocketSettings",
                    format!("unknown mode '{other}'"),
                ));
            }
        };
        Ok(SocketConfig {
            mark: self.mark,
            tcp_fast_open: self.tcp_fast_open,
            tproxy,
            accept_proxy_protocol: self.accept_proxy_protocol,
        })
    }
}

/// Per-protocol settings blocks. Also the shape of the v4 global
/// `transport` block.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TransportSettings {
    pub tcp_settings: Option<TcpSettings>,
    pub ws_settings: Option<WebSocketSettings>,
    pub http_settings: Option<HttpSettings>,
}

impl TransportSettings {
    /// Fills every block missing here from `global`.
    pub fn merge_missing(&mut self, global: &TransportSettings) {
        if self.tcp_settings.is_none() {
            self.tcp_settings = global.tcp_settings.clone();
        }
        if self.ws_settings.is_none() {
            self.ws_settings = global.ws_settings.clone();
        }
        if self.http_settings.is_none() {
            self.http_settings = global.http_settings.clone();
        }
    }

    pub fn build(&self, ctx: &BuildContext<'_>) -> ConfigResult<Vec<TransportConfig>> {
        let mut configs = Vec::new();
        if let Some(settings) = &self.tcp_settings {
            configs.push(transport_config("tcp", &settings.build(ctx)?)?);
        }
        if let Some(settings) = &self.ws_settings {
            configs.push(transport_config("websocket", &settings.build(ctx)?)?);
        }
        if let Some(settings) = &self.http_settings {
            configs.push(transport_config("http", &settings.build(ctx)?)?);
        }
        Ok(configs)
    }
}

fn transport_config<M: Message>(protocol: &str, settings: &M) -> ConfigResult<TransportConfig> {
    Ok(TransportConfig {
        protocol_name: protocol.to_string(),
        settings: Some(TypedEnvelope::from_message(settings)?),
    })
}

/// Maps a v4 `network` name onto its transport protocol.
fn protocol_name(network: &str) -> ConfigResult<&'static str> {
    match network.to_ascii_lowercase().as_str() {
        "" | "tcp" => Ok("tcp"),
        "ws" | "websocket" => Ok("websocket"),
        "h2" | "http" => Ok("http"),
        other => Err(ConfigError::validation(
            "network",
            STREAM,
            format!("unknown transport protocol '{other}'"),
        )),
    }
}

/// v4 `streamSettings`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StreamSettings {
    pub network: String,
    pub security: String,
    pub tls_settings: Option<TlsSettings>,
    #[serde(flatten)]
    pub transport: TransportSettings,
    pub sockopt: Option<SocketSettings>,
}

impl StreamSettings {
    /// Applies the document-wide transport block.
    pub fn with_global(mut self, global: Option<&TransportSettings>) -> Self {
        if let Some(global) = global {
            self.transport.merge_missing(global);
        }
        self
    }
}

impl Buildable for StreamSettings {
    type Output = StreamConfig;

    fn build(&self, ctx: &BuildContext<'_>) -> ConfigResult<StreamConfig> {
        let mut config = StreamConfig {
            protocol_name: protocol_name(&self.network)?.to_string(),
            transport_settings: self.transport.build(ctx)?,
            ..Default::default()
        };

        match self.security.to_ascii_lowercase().as_str() {
            "" | "none" => {}
            "tls" => {
                let tls = self.tls_settings.clone().unwrap_or_default().build(ctx)?;
                config.security_type = tls::Config::TYPE_NAME.to_string();
                config.security_settings.push(TypedEnvelope::from_message(&tls)?);
            }
            other => {
                return Err(ConfigError::validation(
                    "security",
                    STREAM,
                    format!("unknown security protocol '{other}'"),
                ));
            }
        }

        config.socket_settings = self.sockopt.as_ref().map(SocketSettings::build).transpose()?;
        Ok(config)
    }
}

/// v5 `streamSettings`: one named transport and one named security
/// protocol, each with free-form settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StreamSettingsV5 {
    pub transport: String,
    pub transport_settings: Value,
    pub security: String,
    pub security_settings: Value,
    pub socket_settings: Option<SocketSettings>,
}

impl Default for StreamSettingsV5 {
    fn default() -> Self {
        Self {
            transport: "tcp".to_string(),
            transport_settings: Value::Object(Default::default()),
            security: "none".to_string(),
            security_settings: Value::Null,
            socket_settings: None,
        }
    }
}

impl Buildable for StreamSettingsV5 {
    type Output = StreamConfig;

    fn build(&self, ctx: &BuildContext<'_>) -> ConfigResult<StreamConfig> {
        let name = if self.transport.is_empty() {
            "tcp"
        } else {
            self.transport.as_str()
        };
        let transport = ctx.load_envelope(TRANSPORT, name, "", &self.transport_settings)?;
        let mut config = StreamConfig {
            protocol_name: name.to_string(),
            transport_settings: vec![TransportConfig {
                protocol_name: name.to_string(),
                settings: Some(transport),
            }],
            ..Default::default()
        };

        if !self.security.is_empty() && self.security != "none" {
            let security =
                ctx.load_envelope(SECURITY, &self.security, "", &self.security_settings)?;
            config.security_type = security.type_name().to_string();
            config.security_settings.push(security);
        }

        config.socket_settings = self
            .socket_settings
            .as_ref()
            .map(SocketSettings::build)
            .transpose()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use ingot_core::TypeRegistry;
    use serde_json::json;

    use super::*;

    fn build_v4(raw: Value, global: Option<TransportSettings>) -> ConfigResult<StreamConfig> {
        let types = TypeRegistry::new();
        let settings: StreamSettings = serde_json::from_value(raw).unwrap();
        settings
            .with_global(global.as_ref())
            .build(&BuildContext::new(&types))
    }

    #[test]
    fn test_websocket_with_tls() {
        let config = build_v4(
            json!({
                "network": "ws",
                "security": "tls",
                "wsSettings": { "path": "/ws", "headers": { "Host": "example.com" } },
                "tlsSettings": { "serverName": "example.com", "alpn": "h2,http/1.1" }
            }),
            None,
        )
        .unwrap();

        assert_eq!(config.protocol_name, "websocket");
        assert_eq!(config.transport_settings.len(), 1);
        let ws: websocket::Config = config.transport_settings[0]
            .settings
            .as_ref()
            .unwrap()
            .unpack()
            .unwrap();
        assert_eq!(ws.path, "/ws");
        assert_eq!(ws.header[0].key, "Host");

        assert_eq!(config.security_type, tls::Config::TYPE_NAME);
        let tls: tls::Config = config.security_settings[0].unpack().unwrap();
        assert_eq!(tls.next_protocol, vec!["h2", "http/1.1"]);
    }

    #[test]
    fn test_global_transport_fills_missing() {
        let global: TransportSettings = serde_json::from_value(json!({
            "tcpSettings": { "acceptProxyProtocol": true },
            "wsSettings": { "path": "/global" }
        }))
        .unwrap();
        let config = build_v4(json!({ "wsSettings": { "path": "/local" } }), Some(global)).unwrap();

        assert_eq!(config.protocol_name, "tcp");
        let names: Vec<_> = config
            .transport_settings
            .iter()
            .map(|t| t.protocol_name.as_str())
            .collect();
        assert_eq!(names, vec!["tcp", "websocket"]);
        let ws: websocket::Config = config.transport_settings[1]
            .settings
            .as_ref()
            .unwrap()
            .unpack()
            .unwrap();
        assert_eq!(ws.path, "/local");
    }

    #[test]
    fn test_rejects_unknown_names() {
        assert!(build_v4(json!({ "network": "quic" }), None).is_err());
        assert!(build_v4(json!({ "security": "reality" }), None).is_err());
        assert!(build_v4(json!({ "sockopt": { "tproxy": "bogus" } }), None).is_err());
    }

    #[test]
    fn test_certificate_lines() {
        let settings: TlsSettings = serde_json::from_value(json!({
            "certificates": [{ "certificate": ["-----BEGIN-----", "-----END-----"], "key": "k" }]
        }))
        .unwrap();
        let types = TypeRegistry::new();
        let config = settings.build(&BuildContext::new(&types)).unwrap();
        assert_eq!(
            config.certificate[0].certificate,
            b"-----BEGIN-----\n-----END-----".to_vec()
        );

        let settings: TlsSettings =
            serde_json::from_value(json!({ "certificates": [{ "certificate": "c" }] })).unwrap();
        assert!(settings.build(&BuildContext::new(&types)).is_err());
    }

    #[test]
    fn test_v5_stream_through_registry() {
        let types = TypeRegistry::collect_all();
        let ctx = BuildContext::new(&types);
        let settings: StreamSettingsV5 = serde_json::from_value(json!({
            "transport": "websocket",
            "transportSettings": { "path": "/v5" },
            "security": "tls",
            "securitySettings": { "serverName": "example.com" }
        }))
        .unwrap();
        let config = settings.build(&ctx).unwrap();

        assert_eq!(config.protocol_name, "websocket");
        assert!(config.transport_settings[0].settings.as_ref().unwrap().is::<websocket::Config>());
        assert_eq!(config.security_type, tls::Config::TYPE_NAME);

        let defaulted = StreamSettingsV5::default().build(&ctx).unwrap();
        assert_eq!(defaulted.protocol_name, "tcp");
        assert!(defaulted.security_settings.is_empty());
    }
}
