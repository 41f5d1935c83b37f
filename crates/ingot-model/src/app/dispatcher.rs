use ingot_macros::Message;
use serde::{Deserialize, Serialize};

/// The connection dispatcher. Carries no settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Message)]
#[message(name = "ingot.app.dispatcher.Config")]
pub struct Config {}
