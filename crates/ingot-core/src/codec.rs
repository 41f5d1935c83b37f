//! Message codec registry.
//!
//! Maps a type identifier to the functions that convert a canonical payload
//! to and from typed JSON. Every `#[derive(Message)]` type contributes one
//! [`MessageCodec`] to [`MESSAGE_CODECS`] at link time; schemas known only
//! through a [`SchemaRegistry`] are decoded as [`DynamicMessage`]s.

use std::cell::RefCell;
use std::collections::HashMap;

use linkme::distributed_slice;
use serde_json::Value;
use tracing::warn;

use crate::descriptor::{DynamicMessage, MessageSchema, SchemaRegistry};
use crate::envelope::TypedEnvelope;
use crate::error::{ConfigError, ConfigResult};
use crate::message::Message;

/// Decodes a canonical payload into typed JSON.
pub type ToJsonFn = fn(&[u8]) -> ConfigResult<Value>;

/// Encodes typed JSON into a canonical payload.
pub type FromJsonFn = fn(Value) -> ConfigResult<Vec<u8>>;

/// Conversion functions for one statically typed message.
#[derive(Clone, Copy)]
pub struct MessageCodec {
    pub type_name: &'static str,
    pub to_json: ToJsonFn,
    pub from_json: FromJsonFn,
}

impl MessageCodec {
    /// Codec for a [`Message`] type.
    pub const fn of<T: Message>() -> Self {
        Self {
            type_name: T::TYPE_NAME,
            to_json: message_to_json::<T>,
            from_json: message_from_json::<T>,
        }
    }
}

impl std::fmt::Debug for MessageCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageCodec")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

fn message_to_json<T: Message>(bytes: &[u8]) -> ConfigResult<Value> {
    let message = T::decode(bytes)?;
    serde_json::to_value(&message).map_err(|e| ConfigError::codec(T::TYPE_NAME, e))
}

fn message_from_json<T: Message>(value: Value) -> ConfigResult<Vec<u8>> {
    let message: T =
        serde_json::from_value(value).map_err(|e| ConfigError::codec(T::TYPE_NAME, e))?;
    message.encode_to_vec()
}

/// Link-time registry of message codecs.
#[distributed_slice]
pub static MESSAGE_CODECS: [MessageCodec];

#[derive(Debug, Clone)]
enum CodecEntry {
    Static(MessageCodec),
    Dynamic(MessageSchema),
}

/// Lookup table from type identifier to codec.
#[derive(Debug, Clone, Default)]
pub struct CodecRegistry {
    entries: HashMap<String, CodecEntry>,
}

impl CodecRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from every codec registered via `#[derive(Message)]`.
    ///
    /// If the same type identifier is registered more than once a warning is
    /// emitted and the **first** one wins.
    pub fn collect_all() -> Self {
        let mut registry = Self::new();
        for codec in MESSAGE_CODECS {
            if !registry.register_codec(*codec) {
                warn!(
                    type_name = codec.type_name,
                    "Multiple codecs registered for the same message type; using the first one"
                );
            }
        }
        registry
    }

    /// Registers the codec of `T`. Returns `false` if the type was already known.
    pub fn register<T: Message>(&mut self) -> bool {
        self.register_codec(MessageCodec::of::<T>())
    }

    /// Registers a codec. Returns `false` if the type was already known.
    pub fn register_codec(&mut self, codec: MessageCodec) -> bool {
        if self.entries.contains_key(codec.type_name) {
            return false;
        }
        self.entries
            .insert(codec.type_name.to_string(), CodecEntry::Static(codec));
        true
    }

    /// Adds every schema of `schemas` that has no static codec.
    pub fn include_schemas(&mut self, schemas: &SchemaRegistry) {
        for schema in schemas.schemas() {
            self.entries
                .entry(schema.full_name.clone())
                .or_insert(CodecEntry::Dynamic(schema));
        }
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.entries.contains_key(type_name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry(&self, type_name: &str) -> ConfigResult<&CodecEntry> {
        self.entries
            .get(type_name)
            .ok_or_else(|| ConfigError::UnknownDecoder {
                type_name: type_name.to_string(),
            })
    }

    /// Decodes a payload of `type_name` into typed JSON.
    pub fn to_json(&self, type_name: &str, payload: &[u8]) -> ConfigResult<Value> {
        entry_to_json(self.entry(type_name)?, payload)
    }

    /// Encodes typed JSON of `type_name` into a canonical payload.
    pub fn from_json(&self, type_name: &str, value: Value) -> ConfigResult<Vec<u8>> {
        entry_from_json(self.entry(type_name)?, value)
    }

    /// Checks that `envelope` can be decoded.
    pub fn verify(&self, envelope: &TypedEnvelope) -> ConfigResult<()> {
        self.to_json(envelope.type_name(), envelope.payload())
            .map(|_| ())
    }
}

// Expansion context used by the expanded text encoding. While active,
// envelopes serialize as `{"@type", "value"}` with decoded payloads.

struct Expansion {
    codecs: CodecRegistry,
    failure: Option<ConfigError>,
}

thread_local! {
    static EXPANSION: RefCell<Option<Expansion>> = const { RefCell::new(None) };
}

/// Runs `f` with envelope expansion enabled for the current thread.
///
/// Returns the result of `f` and the first typed failure recorded by an
/// envelope while `f` ran.
pub(crate) fn with_expansion<R>(
    codecs: &CodecRegistry,
    f: impl FnOnce() -> R,
) -> (R, Option<ConfigError>) {
    let previous = EXPANSION.with(|cell| {
        cell.borrow_mut().replace(Expansion {
            codecs: codecs.clone(),
            failure: None,
        })
    });
    let result = f();
    let failure = EXPANSION.with(|cell| {
        let current = std::mem::replace(&mut *cell.borrow_mut(), previous);
        current.and_then(|expansion| expansion.failure)
    });
    (result, failure)
}

fn active_entry(type_name: &str) -> Option<ConfigResult<CodecEntry>> {
    EXPANSION.with(|cell| {
        cell.borrow()
            .as_ref()
            .map(|expansion| expansion.codecs.entry(type_name).cloned())
    })
}

fn record(err: ConfigError) -> String {
    let message = err.to_string();
    EXPANSION.with(|cell| {
        if let Some(expansion) = cell.borrow_mut().as_mut() {
            expansion.failure.get_or_insert(err);
        }
    });
    message
}

fn entry_to_json(entry: &CodecEntry, payload: &[u8]) -> ConfigResult<Value> {
    match entry {
        CodecEntry::Static(codec) => (codec.to_json)(payload),
        CodecEntry::Dynamic(schema) => DynamicMessage::decode(schema, payload)?.to_json(),
    }
}

fn entry_from_json(entry: &CodecEntry, value: Value) -> ConfigResult<Vec<u8>> {
    match entry {
        CodecEntry::Static(codec) => (codec.from_json)(value),
        CodecEntry::Dynamic(schema) => DynamicMessage::from_json(schema, value)?.encode_payload(),
    }
}

/// Decodes `envelope` if an expansion is active on this thread.
pub(crate) fn expand_active(envelope: &TypedEnvelope) -> Option<Result<Value, String>> {
    let entry = active_entry(envelope.type_name())?;
    Some(
        entry
            .and_then(|entry| entry_to_json(&entry, envelope.payload()))
            .map_err(record),
    )
}

/// Encodes an expanded envelope value; fails outside an active expansion.
pub(crate) fn collapse_active(type_name: &str, value: Value) -> Result<Vec<u8>, String> {
    let Some(entry) = active_entry(type_name) else {
        return Err(format!(
            "expanded envelope '{type_name}' cannot be read without a codec registry"
        ));
    };
    entry
        .and_then(|entry| entry_from_json(&entry, value))
        .map_err(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::testing::{Other, Sample};

    #[test]
    fn test_unknown_decoder() {
        let registry = CodecRegistry::new();
        let err = registry.to_json("ingot.test.Missing", &[]).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownDecoder { type_name } if type_name == "ingot.test.Missing"));
    }

    #[test]
    fn test_first_registration_wins() {
        let mut registry = CodecRegistry::new();
        assert!(registry.register::<Sample>());
        assert!(!registry.register::<Sample>());
        assert!(registry.register::<Other>());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_json_conversion() {
        let mut registry = CodecRegistry::new();
        registry.register::<Sample>();

        let sample = Sample {
            name: "x".into(),
            level: 7,
        };
        let payload = sample.encode_to_vec().unwrap();
        let json = registry.to_json(Sample::TYPE_NAME, &payload).unwrap();
        assert_eq!(json["level"], 7);

        let back = registry.from_json(Sample::TYPE_NAME, json).unwrap();
        assert_eq!(back, payload);
    }

    #[test]
    fn test_expansion_records_typed_failure() {
        let registry = CodecRegistry::new();
        let envelope = TypedEnvelope::new("ingot.test.Missing", Vec::new());

        let (result, failure) = with_expansion(&registry, || serde_json::to_value(&envelope));
        assert!(result.is_err());
        assert!(matches!(failure, Some(ConfigError::UnknownDecoder { .. })));

        // expansion is scoped
        assert!(serde_json::to_value(&envelope).is_ok());
    }
}
