//! The v4 root document: one optional field per app module plus inbound and
//! outbound handler lists.

use ingot_core::{
    BuildContext, Buildable, ConfigError, ConfigResult, Message, RootAssembly, TypedEnvelope,
};
use ingot_model::app::{dispatcher, proxyman};
use serde::Deserialize;
use tracing::info;

use crate::handler::{InboundSettings, OutboundSettings};
use crate::synthetic::api::ApiSettings;
use crate::synthetic::dns::DnsSettings;
use crate::synthetic::log::{LogSettings, default_log_config};
use crate::synthetic::observatory::{
    BurstObservatorySettings, MultiObservatorySettings, ObservatorySettings,
};
use crate::synthetic::policy::PolicySettings;
use crate::synthetic::reverse::ReverseSettings;
use crate::synthetic::router::RouterSettings;
use crate::synthetic::stats::StatsSettings;
use crate::transport::{StreamSettings, TransportSettings};

pub type InboundDetourConfig = InboundSettings<StreamSettings>;
pub type OutboundDetourConfig = OutboundSettings<StreamSettings>;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub log: Option<LogSettings>,
    pub api: Option<ApiSettings>,
    pub stats: Option<StatsSettings>,
    pub routing: Option<RouterSettings>,
    pub dns: Option<DnsSettings>,
    pub policy: Option<PolicySettings>,
    pub reverse: Option<ReverseSettings>,
    pub observatory: Option<ObservatorySettings>,
    pub burst_observatory: Option<BurstObservatorySettings>,
    pub multi_observatory: Option<MultiObservatorySettings>,
    /// Applied to every handler that lacks a protocol's settings block.
    pub transport: Option<TransportSettings>,

    pub inbound: Option<InboundDetourConfig>,
    pub inbound_detour: Vec<InboundDetourConfig>,
    pub inbounds: Vec<InboundDetourConfig>,
    pub outbound: Option<OutboundDetourConfig>,
    pub outbound_detour: Vec<OutboundDetourConfig>,
    pub outbounds: Vec<OutboundDetourConfig>,
}

fn push_app<B>(
    app: &mut Vec<TypedEnvelope>,
    settings: Option<&B>,
    ctx: &BuildContext<'_>,
) -> ConfigResult<()>
where
    B: Buildable,
    B::Output: Message,
{
    if let Some(settings) = settings {
        app.push(TypedEnvelope::from_message(&settings.build(ctx)?)?);
    }
    Ok(())
}

impl Config {
    /// Gives a handler the global transport settings. A handler without
    /// stream settings gets default ones.
    fn with_transport(&self, stream: Option<&StreamSettings>) -> Option<StreamSettings> {
        match (&self.transport, stream) {
            (None, stream) => stream.cloned(),
            (Some(global), stream) => {
                Some(stream.cloned().unwrap_or_default().with_global(Some(global)))
            }
        }
    }
}

impl Buildable for Config {
    type Output = RootAssembly;

    fn build(&self, ctx: &BuildContext<'_>) -> ConfigResult<RootAssembly> {
        let mut app = vec![
            TypedEnvelope::from_message(&dispatcher::Config {})?,
            TypedEnvelope::from_message(&proxyman::InboundConfig {})?,
            TypedEnvelope::from_message(&proxyman::OutboundConfig {})?,
        ];
        push_app(&mut app, self.api.as_ref(), ctx)?;
        push_app(&mut app, self.stats.as_ref(), ctx)?;

        let log = match &self.log {
            Some(log) => log.build(ctx)?,
            None => default_log_config(),
        };
        app.insert(0, TypedEnvelope::from_message(&log)?);

        push_app(&mut app, self.routing.as_ref(), ctx)?;
        if let Some(dns) = &self.dns {
            let dns = dns
                .build(ctx)
                .map_err(|err| ConfigError::delegation("dns", None, err))?;
            app.push(TypedEnvelope::from_message(&dns)?);
        }
        push_app(&mut app, self.policy.as_ref(), ctx)?;
        push_app(&mut app, self.reverse.as_ref(), ctx)?;
        push_app(&mut app, self.observatory.as_ref(), ctx)?;
        push_app(&mut app, self.burst_observatory.as_ref(), ctx)?;
        push_app(&mut app, self.multi_observatory.as_ref(), ctx)?;

        let inbound = self
            .inbound
            .iter()
            .chain(&self.inbound_detour)
            .chain(&self.inbounds)
            .map(|handler| {
                let mut handler = handler.clone();
                handler.stream_settings = self.with_transport(handler.stream_settings.as_ref());
                handler.build(ctx)
            })
            .collect::<ConfigResult<Vec<_>>>()?;

        let outbound = self
            .outbound
            .iter()
            .chain(&self.outbound_detour)
            .chain(&self.outbounds)
            .map(|handler| {
                let mut handler = handler.clone();
                handler.stream_settings = self.with_transport(handler.stream_settings.as_ref());
                handler.build(ctx)
            })
            .collect::<ConfigResult<Vec<_>>>()?;

        info!(
            apps = app.len(),
            inbounds = inbound.len(),
            outbounds = outbound.len(),
            "Assembled v4 configuration"
        );
        Ok(RootAssembly {
            app,
            inbound,
            outbound,
        })
    }
}
