use ingot_macros::Message;
use serde::{Deserialize, Serialize};

use crate::common::Endpoint;

/// DNS outbound: forwards queries to `server` when its fields are set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Message)]
#[message(name = "ingot.proxy.dns.Config")]
pub struct Config {
    pub server: Endpoint,
    pub user_level: u32,
}
