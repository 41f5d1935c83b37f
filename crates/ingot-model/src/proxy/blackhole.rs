use ingot_core::TypedEnvelope;
use ingot_macros::Message;
use serde::{Deserialize, Serialize};

/// Close the connection without a response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Message)]
#[message(name = "ingot.proxy.blackhole.NoneResponse")]
pub struct NoneResponse {}

/// Answer with an HTTP 403 before closing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Message)]
#[message(name = "ingot.proxy.blackhole.HTTPResponse")]
pub struct HttpResponse {}

/// Drops all traffic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Message)]
#[message(name = "ingot.proxy.blackhole.Config")]
pub struct Config {
    pub response: Option<TypedEnvelope>,
}
