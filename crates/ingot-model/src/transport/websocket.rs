use ingot_macros::Message;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Message)]
#[message(name = "ingot.transport.websocket.Config")]
pub struct Config {
    pub path: String,
    pub header: Vec<Header>,
    pub accept_proxy_protocol: bool,
    pub max_early_data: i32,
    pub early_data_header_name: String,
}
