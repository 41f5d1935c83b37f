use ingot_macros::Message;
use serde::{Deserialize, Serialize};

/// HTTP/2 transport.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Message)]
#[message(name = "ingot.transport.http.Config")]
pub struct Config {
    pub host: Vec<String>,
    pub path: String,
    pub method: String,
}
