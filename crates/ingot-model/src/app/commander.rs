//! Management API and the services it exposes.

use ingot_core::TypedEnvelope;
use ingot_macros::Message;
use serde::{Deserialize, Serialize};

/// The management API, bound to the inbound `tag`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Message)]
#[message(name = "ingot.app.commander.Config")]
pub struct Config {
    pub tag: String,
    pub service: Vec<TypedEnvelope>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Message)]
#[message(name = "ingot.app.commander.ReflectionConfig")]
pub struct ReflectionConfig {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Message)]
#[message(name = "ingot.app.proxyman.command.Config")]
pub struct HandlerServiceConfig {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Message)]
#[message(name = "ingot.app.log.command.Config")]
pub struct LoggerServiceConfig {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Message)]
#[message(name = "ingot.app.stats.command.Config")]
pub struct StatsServiceConfig {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Message)]
#[message(name = "ingot.app.observatory.command.Config")]
pub struct ObservatoryServiceConfig {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Message)]
#[message(name = "ingot.app.router.command.Config")]
pub struct RoutingServiceConfig {}
