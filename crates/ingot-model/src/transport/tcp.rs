use ingot_macros::Message;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Message)]
#[message(name = "ingot.transport.tcp.Config")]
pub struct Config {
    pub accept_proxy_protocol: bool,
}
