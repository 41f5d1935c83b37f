use std::fmt;
use std::str::FromStr;

use ingot_core::{BuildContext, Buildable, ConfigError, ConfigResult, RootAssembly};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::{v4, v5};

/// Top-level keys only v5 documents have.
const V5_ROOT_KEYS: &[&str] = &["services", "router"];

/// `streamSettings` keys only v5 handlers have; v4 uses `network`,
/// `<protocol>Settings`, `tlsSettings` and `sockopt`.
const V5_STREAM_KEYS: &[&str] = &[
    "transport",
    "transportSettings",
    "securitySettings",
    "socketSettings",
];

/// Which root schema a document follows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SchemaVersion {
    /// v5 if the document has a top-level `services` or `router` key, or a
    /// handler whose stream settings use v5 keys.
    #[default]
    Auto,
    V4,
    V5,
}

impl SchemaVersion {
    /// Resolves [`Auto`](Self::Auto) against `document`.
    pub fn detect(self, document: &Value) -> Self {
        match self {
            Self::Auto => {
                let is_v5 = document.as_object().is_some_and(|root| {
                    V5_ROOT_KEYS.iter().any(|key| root.contains_key(*key))
                        || ["inbounds", "outbounds"]
                            .iter()
                            .filter_map(|key| root.get(*key).and_then(Value::as_array))
                            .flatten()
                            .any(has_v5_stream)
                });
                if is_v5 { Self::V5 } else { Self::V4 }
            }
            version => version,
        }
    }
}

fn has_v5_stream(handler: &Value) -> bool {
    handler
        .get("streamSettings")
        .and_then(Value::as_object)
        .is_some_and(|stream| V5_STREAM_KEYS.iter().any(|key| stream.contains_key(*key)))
}

impl FromStr for SchemaVersion {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "v4" | "4" => Ok(Self::V4),
            "v5" | "5" => Ok(Self::V5),
            other => Err(ConfigError::validation(
                "schema",
                "SchemaVersion",
                format!("unknown schema version '{other}'"),
            )),
        }
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::V4 => write!(f, "v4"),
            Self::V5 => write!(f, "v5"),
        }
    }
}

/// Assembles a parsed document into a [`RootAssembly`].
pub fn assemble(
    document: &Value,
    version: SchemaVersion,
    ctx: &BuildContext<'_>,
) -> ConfigResult<RootAssembly> {
    let version = version.detect(document);
    debug!(%version, "Assembling configuration document");
    match version {
        SchemaVersion::V5 => parse::<v5::RootConfig>(document)?.build(ctx),
        _ => parse::<v4::Config>(document)?.build(ctx),
    }
}

fn parse<T: DeserializeOwned>(document: &Value) -> ConfigResult<T> {
    T::deserialize(document).map_err(ConfigError::parse)
}
