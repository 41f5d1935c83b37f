use ingot_macros::Message;
use serde::{Deserialize, Serialize};

/// Enables traffic statistics counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Message)]
#[message(name = "ingot.app.stats.Config")]
pub struct Config {}
