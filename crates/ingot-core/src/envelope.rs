//! Typed envelopes: a type identifier plus an opaque canonical payload.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, SerializeStruct, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::codec;
use crate::error::{ConfigError, ConfigResult};
use crate::message::{Message, ModuleConfig};

/// JSON key carrying the type identifier of an expanded envelope.
pub const EXPANDED_TYPE_KEY: &str = "@type";

/// An immutable, packed module configuration.
///
/// In human-readable formats an envelope is written as
/// `{"type": <name>, "value": <base64 payload>}`, or as
/// `{"@type": <name>, "value": <decoded message>}` while an expanded text
/// encoding is active. Binary formats store the raw fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypedEnvelope {
    type_name: String,
    payload: Vec<u8>,
}

impl TypedEnvelope {
    /// Creates an envelope from an already encoded payload.
    pub fn new(type_name: impl Into<String>, payload: Vec<u8>) -> Self {
        Self {
            type_name: type_name.into(),
            payload,
        }
    }

    /// Packs a module configuration.
    pub fn pack(config: &dyn ModuleConfig) -> ConfigResult<Self> {
        Ok(Self::new(config.type_name(), config.encode()?))
    }

    /// Packs a statically typed message.
    pub fn from_message<T: Message>(message: &T) -> ConfigResult<Self> {
        Ok(Self::new(T::TYPE_NAME, message.encode_to_vec()?))
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Returns `true` if the envelope holds a `T`.
    pub fn is<T: Message>(&self) -> bool {
        self.type_name == T::TYPE_NAME
    }

    /// Decodes the payload as `T`.
    pub fn unpack<T: Message>(&self) -> ConfigResult<T> {
        if !self.is::<T>() {
            return Err(ConfigError::TypeMismatch {
                expected: T::TYPE_NAME.to_string(),
                found: self.type_name.clone(),
            });
        }
        T::decode(&self.payload)
    }
}

impl Serialize for TypedEnvelope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if !serializer.is_human_readable() {
            let mut state = serializer.serialize_struct("TypedEnvelope", 2)?;
            state.serialize_field("type_name", &self.type_name)?;
            state.serialize_field("payload", &self.payload)?;
            return state.end();
        }

        let mut map = serializer.serialize_map(Some(2))?;
        match codec::expand_active(self) {
            Some(Ok(value)) => {
                map.serialize_entry(EXPANDED_TYPE_KEY, &self.type_name)?;
                map.serialize_entry("value", &value)?;
            }
            Some(Err(err)) => return Err(serde::ser::Error::custom(err)),
            None => {
                map.serialize_entry("type", &self.type_name)?;
                map.serialize_entry("value", &STANDARD.encode(&self.payload))?;
            }
        }
        map.end()
    }
}

#[derive(Deserialize)]
struct RawEnvelope {
    type_name: String,
    payload: Vec<u8>,
}

impl<'de> Deserialize<'de> for TypedEnvelope {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if !deserializer.is_human_readable() {
            let raw = RawEnvelope::deserialize(deserializer)?;
            return Ok(Self::new(raw.type_name, raw.payload));
        }

        let Value::Object(mut object) = Value::deserialize(deserializer)? else {
            return Err(de::Error::custom("envelope must be an object"));
        };
        let value = object.remove("value").unwrap_or(Value::Null);

        if let Some(name) = object.remove(EXPANDED_TYPE_KEY) {
            let Value::String(name) = name else {
                return Err(de::Error::custom("'@type' must be a string"));
            };
            let payload = codec::collapse_active(&name, value).map_err(de::Error::custom)?;
            return Ok(Self::new(name, payload));
        }

        let Some(Value::String(name)) = object.remove("type") else {
            return Err(de::Error::custom("envelope is missing its 'type'"));
        };
        let payload = match value {
            Value::Null => Vec::new(),
            Value::String(encoded) => STANDARD
                .decode(encoded.as_bytes())
                .map_err(|e| de::Error::custom(format!("invalid payload of '{name}': {e}")))?,
            _ => return Err(de::Error::custom("envelope 'value' must be base64 text")),
        };
        Ok(Self::new(name, payload))
    }
}
