//! Inbound and outbound handler settings, shared by both root schemas.
//!
//! The handlers are generic over their stream settings: v4 documents use
//! [`StreamSettings`](crate::transport::StreamSettings), v5 documents
//! [`StreamSettingsV5`](crate::transport::StreamSettingsV5).

use ingot_core::{
    BuildContext, Buildable, ConfigError, ConfigResult, InboundHandlerConfig,
    OutboundHandlerConfig, TypedEnvelope,
};
use ingot_model::app::proxyman::{
    AllocationStrategy, AllocationType, ProxyConfig, ReceiverConfig, SenderConfig, SniffingConfig,
};
use ingot_model::common::Address;
use ingot_model::transport::StreamConfig;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::category::{INBOUND, OUTBOUND};
use crate::cfgcommon::{PortSpec, StringList};
use crate::synthetic::mux::MuxSettings;

const INBOUND_TYPE: &str = "InboundSettings";
const OUTBOUND_TYPE: &str = "OutboundSettings";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AllocationSettings {
    pub strategy: String,
    pub concurrency: Option<u32>,
    pub refresh: Option<u32>,
}

impl AllocationSettings {
    fn build(&self) -> ConfigResult<AllocationStrategy> {
        let kind = match self.strategy.to_ascii_lowercase().as_str() {
            "" | "always" => AllocationType::Always,
            "random" => AllocationType::Random,
            "external" => AllocationType::External,
            other => {
                return Err(ConfigError::validation(
                    "allocate",
                    INBOUND_TYPE,
                    format!("unknown allocation strategy '{other}'"),
                ));
            }
        };
        Ok(AllocationStrategy {
            kind,
            concurrency: self.concurrency,
            refresh: self.refresh,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SniffingSettings {
    pub enabled: bool,
    pub dest_override: StringList,
    pub metadata_only: bool,
}

impl SniffingSettings {
    fn build(&self) -> ConfigResult<SniffingConfig> {
        let destination_override = self
            .dest_override
            .iter()
            .map(|protocol| match protocol.to_ascii_lowercase().as_str() {
                name @ ("http" | "tls" | "quic" | "fakedns") => Ok(name.to_string()),
                _ => Err(ConfigError::validation(
                    "destOverride",
                    "SniffingSettings",
                    format!("unknown protocol '{protocol}'"),
                )),
            })
            .collect::<ConfigResult<_>>()?;
        Ok(SniffingConfig {
            enabled: self.enabled,
            destination_override,
            metadata_only: self.metadata_only,
        })
    }
}

/// A listen address; paths starting with `/` or `@` are unix sockets.
fn listen_address(listen: &str) -> Option<Address> {
    match listen {
        "" => None,
        path if is_unix_path(path) => Some(Address::Domain(path.to_string())),
        address => Some(Address::parse(address)),
    }
}

fn is_unix_path(listen: &str) -> bool {
    listen.starts_with('/') || listen.starts_with('@')
}

/// One inbound handler.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InboundSettings<S> {
    pub protocol: String,
    pub port: Option<PortSpec>,
    pub listen: String,
    pub settings: Value,
    pub tag: String,
    pub allocate: Option<AllocationSettings>,
    pub stream_settings: Option<S>,
    pub sniffing: Option<SniffingSettings>,
}

impl<S> InboundSettings<S>
where
    S: Buildable<Output = StreamConfig>,
{
    fn build_receiver(&self, ctx: &BuildContext<'_>) -> ConfigResult<ReceiverConfig> {
        let port_range = match &self.port {
            Some(port) => Some(port.build()),
            None if is_unix_path(&self.listen) => None,
            None => return Err(ConfigError::missing_field("port", INBOUND_TYPE)),
        };
        let receive_original_destination = self.protocol == "dokodemo-door"
            && self
                .settings
                .get("followRedirect")
                .and_then(Value::as_bool)
                .unwrap_or(false);

        Ok(ReceiverConfig {
            port_range,
            listen: listen_address(&self.listen),
            allocation_strategy: self
                .allocate
                .as_ref()
                .map(AllocationSettings::build)
                .transpose()?,
            stream_settings: self
                .stream_settings
                .as_ref()
                .map(|stream| stream.build(ctx))
                .transpose()?,
            receive_original_destination,
            sniffing_settings: self
                .sniffing
                .as_ref()
                .map(SniffingSettings::build)
                .transpose()?,
        })
    }
}

impl<S> Buildable for InboundSettings<S>
where
    S: Buildable<Output = StreamConfig>,
{
    type Output = InboundHandlerConfig;

    fn build(&self, ctx: &BuildContext<'_>) -> ConfigResult<InboundHandlerConfig> {
        let built = self.build_receiver(ctx).and_then(|receiver| {
            let proxy = ctx.load_envelope(INBOUND, &self.protocol, "", &self.settings)?;
            Ok((TypedEnvelope::from_message(&receiver)?, proxy))
        });
        let (receiver, proxy) = built.map_err(|err| {
            ConfigError::delegation("inbound", (!self.tag.is_empty()).then(|| self.tag.clone()), err)
        })?;

        debug!(tag = %self.tag, protocol = %self.protocol, "Built inbound handler");
        Ok(InboundHandlerConfig {
            tag: self.tag.clone(),
            receiver_settings: Some(receiver),
            proxy_settings: Some(proxy),
        })
    }
}

/// Chains an outbound through the outbound `tag`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProxySettings {
    pub tag: String,
    pub transport_layer: bool,
}

/// One outbound handler.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OutboundSettings<S> {
    pub protocol: String,
    pub send_through: String,
    pub tag: String,
    pub settings: Value,
    pub stream_settings: Option<S>,
    pub proxy_settings: Option<ProxySettings>,
    pub mux: Option<MuxSettings>,
}

impl<S> OutboundSettings<S>
where
    S: Buildable<Output = StreamConfig>,
{
    fn build_sender(&self, ctx: &BuildContext<'_>) -> ConfigResult<SenderConfig> {
        let via = match self.send_through.as_str() {
            "" => None,
            address => match Address::parse(address) {
                ip @ Address::Ip(_) => Some(ip),
                Address::Domain(_) => {
                    return Err(ConfigError::validation(
                        "sendThrough",
                        OUTBOUND_TYPE,
                        format!("'{address}' is not an IP address"),
                    ));
                }
            },
        };
        let proxy_settings = match &self.proxy_settings {
            Some(proxy) if proxy.tag.is_empty() => {
                return Err(ConfigError::missing_field("proxySettings.tag", OUTBOUND_TYPE));
            }
            Some(proxy) => Some(ProxyConfig {
                tag: proxy.tag.clone(),
                transport_layer_proxy: proxy.transport_layer,
            }),
            None => None,
        };

        Ok(SenderConfig {
            via,
            stream_settings: self
                .stream_settings
                .as_ref()
                .map(|stream| stream.build(ctx))
                .transpose()?,
            proxy_settings,
            multiplex_settings: self.mux.as_ref().and_then(MuxSettings::build),
        })
    }
}

impl<S> Buildable for OutboundSettings<S>
where
    S: Buildable<Output = StreamConfig>,
{
    type Output = OutboundHandlerConfig;

    fn build(&self, ctx: &BuildContext<'_>) -> ConfigResult<OutboundHandlerConfig> {
        let built = self.build_sender(ctx).and_then(|sender| {
            let proxy = ctx.load_envelope(OUTBOUND, &self.protocol, "", &self.settings)?;
            Ok((TypedEnvelope::from_message(&sender)?, proxy))
        });
        let (sender, proxy) = built.map_err(|err| {
            ConfigError::delegation("outbound", (!self.tag.is_empty()).then(|| self.tag.clone()), err)
        })?;

        debug!(tag = %self.tag, protocol = %self.protocol, "Built outbound handler");
        Ok(OutboundHandlerConfig {
            tag: self.tag.clone(),
            sender_settings: Some(sender),
            proxy_settings: Some(proxy),
        })
    }
}
