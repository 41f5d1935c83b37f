use ingot_macros::Message;
use serde::{Deserialize, Serialize};

use crate::common::{Address, Network};

/// Transparent inbound forwarding to a fixed or redirected destination.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Message)]
#[message(name = "ingot.proxy.dokodemo.Config")]
pub struct Config {
    pub address: Option<Address>,
    pub port: u32,
    pub networks: Vec<Network>,
    /// Idle timeout in seconds.
    pub timeout: u32,
    pub follow_redirect: bool,
    pub user_level: u32,
}
