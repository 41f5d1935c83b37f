//! Descriptor fallback for externally declared message schemas.
//!
//! Names carrying the [`EXTENSION_MARKER`] prefix are not looked up in the
//! type registry but resolved by fully-qualified name through a
//! [`SchemaResolver`], producing a zero-valued [`DynamicMessage`].

use std::any::Any;
use std::collections::HashMap;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::error::{ConfigError, ConfigResult};
use crate::message::ModuleConfig;

/// Prefix marking a name as an externally declared schema.
pub const EXTENSION_MARKER: char = '#';

/// Returns the schema name if `name` carries the extension marker.
pub fn extension_name(name: &str) -> Option<&str> {
    name.strip_prefix(EXTENSION_MARKER)
}

/// Scalar or nested kind of a schema field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Bool,
    Int,
    UInt,
    Float,
    String,
    Bytes,
    /// Nested message, by fully-qualified name.
    Message(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,
    pub kind: FieldKind,
    pub repeated: bool,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            repeated: false,
        }
    }

    pub fn repeated(mut self) -> Self {
        self.repeated = true;
        self
    }
}

/// Runtime description of a message type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageSchema {
    pub full_name: String,
    pub fields: Vec<FieldDescriptor>,
}

impl MessageSchema {
    pub fn new(full_name: impl Into<String>, fields: Vec<FieldDescriptor>) -> Self {
        Self {
            full_name: full_name.into(),
            fields,
        }
    }

    fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }
}

/// Resolves message schemas by fully-qualified name.
pub trait SchemaResolver: Send + Sync {
    fn resolve(&self, full_name: &str) -> Option<MessageSchema>;
}

/// In-memory [`SchemaResolver`].
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    schemas: RwLock<HashMap<String, MessageSchema>>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a schema. Returns `false` if the name was already taken.
    pub fn register(&self, schema: MessageSchema) -> bool {
        let mut schemas = self.schemas.write();
        if schemas.contains_key(&schema.full_name) {
            return false;
        }
        schemas.insert(schema.full_name.clone(), schema);
        true
    }

    /// Snapshot of all registered schemas.
    pub fn schemas(&self) -> Vec<MessageSchema> {
        self.schemas.read().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.schemas.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.read().is_empty()
    }
}

impl SchemaResolver for SchemaRegistry {
    fn resolve(&self, full_name: &str) -> Option<MessageSchema> {
        self.schemas.read().get(full_name).cloned()
    }
}

/// Value of a dynamic message field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    String(String),
    Bytes(Vec<u8>),
    List(Vec<FieldValue>),
    /// An absent nested message.
    Unset,
}

impl FieldValue {
    /// The zero value of a field.
    pub fn zero(field: &FieldDescriptor) -> Self {
        if field.repeated {
            return Self::List(Vec::new());
        }
        Self::scalar_zero(&field.kind)
    }

    fn scalar_zero(kind: &FieldKind) -> Self {
        match kind {
            FieldKind::Bool => Self::Bool(false),
            FieldKind::Int => Self::Int(0),
            FieldKind::UInt => Self::UInt(0),
            FieldKind::Float => Self::Float(0.0),
            FieldKind::String => Self::String(String::new()),
            FieldKind::Bytes => Self::Bytes(Vec::new()),
            FieldKind::Message(_) => Self::Unset,
        }
    }

    fn to_json(&self) -> Value {
        match self {
            Self::Bool(v) => Value::Bool(*v),
            Self::Int(v) => Value::from(*v),
            Self::UInt(v) => Value::from(*v),
            Self::Float(v) => Number::from_f64(*v).map_or(Value::Null, Value::Number),
            Self::String(v) => Value::String(v.clone()),
            Self::Bytes(v) => Value::String(STANDARD.encode(v)),
            Self::List(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            Self::Unset => Value::Null,
        }
    }

    fn from_json(field: &FieldDescriptor, value: &Value) -> Option<Self> {
        if value.is_null() {
            return Some(Self::zero(field));
        }
        if field.repeated {
            let items = value.as_array()?;
            return items
                .iter()
                .map(|item| Self::scalar_from_json(&field.kind, item))
                .collect::<Option<Vec<_>>>()
                .map(Self::List);
        }
        Self::scalar_from_json(&field.kind, value)
    }

    fn scalar_from_json(kind: &FieldKind, value: &Value) -> Option<Self> {
        let parsed = match kind {
            FieldKind::Bool => Self::Bool(value.as_bool()?),
            FieldKind::Int => Self::Int(value.as_i64()?),
            FieldKind::UInt => Self::UInt(value.as_u64()?),
            FieldKind::Float => Self::Float(value.as_f64()?),
            FieldKind::String => Self::String(value.as_str()?.to_string()),
            FieldKind::Bytes => Self::Bytes(STANDARD.decode(value.as_str()?).ok()?),
            // nested dynamic messages are only ever zero-valued
            FieldKind::Message(_) => return value.is_null().then_some(Self::Unset),
        };
        Some(parsed)
    }
}

/// A message whose structure is only known at runtime.
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicMessage {
    schema: MessageSchema,
    fields: Vec<(String, FieldValue)>,
}

impl DynamicMessage {
    /// Builds an instance with every field at its zero value.
    pub fn zero(schema: &MessageSchema) -> Self {
        let fields = schema
            .fields
            .iter()
            .map(|field| (field.name.clone(), FieldValue::zero(field)))
            .collect();
        Self {
            schema: schema.clone(),
            fields,
        }
    }

    pub fn schema(&self) -> &MessageSchema {
        &self.schema
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    /// Encodes the field values with postcard.
    pub fn encode_payload(&self) -> ConfigResult<Vec<u8>> {
        postcard::to_allocvec(&self.fields)
            .map_err(|e| ConfigError::codec(&self.schema.full_name, e))
    }

    /// Decodes a payload produced by [`encode_payload`](Self::encode_payload).
    pub fn decode(schema: &MessageSchema, bytes: &[u8]) -> ConfigResult<Self> {
        let fields: Vec<(String, FieldValue)> = postcard::from_bytes(bytes)
            .map_err(|e| ConfigError::codec(&schema.full_name, e))?;
        if let Some((name, _)) = fields.iter().find(|(name, _)| schema.field(name).is_none()) {
            return Err(ConfigError::codec(
                &schema.full_name,
                format!("unknown field '{name}'"),
            ));
        }
        Ok(Self {
            schema: schema.clone(),
            fields,
        })
    }

    /// Field values as a JSON object, in schema order.
    pub fn to_json(&self) -> ConfigResult<Value> {
        let object: Map<String, Value> = self
            .fields
            .iter()
            .map(|(name, value)| (name.clone(), value.to_json()))
            .collect();
        Ok(Value::Object(object))
    }

    /// Parses a JSON object against `schema`; absent fields take zero values.
    pub fn from_json(schema: &MessageSchema, value: Value) -> ConfigResult<Self> {
        let object = match value {
            Value::Null => Map::new(),
            Value::Object(object) => object,
            _ => return Err(ConfigError::codec(&schema.full_name, "expected an object")),
        };
        if let Some(unknown) = object.keys().find(|key| schema.field(key).is_none()) {
            return Err(ConfigError::codec(
                &schema.full_name,
                format!("unknown field '{unknown}'"),
            ));
        }

        let mut message = Self::zero(schema);
        for (descriptor, (_, slot)) in schema.fields.iter().zip(message.fields.iter_mut()) {
            let Some(raw) = object.get(&descriptor.name) else {
                continue;
            };
            *slot = FieldValue::from_json(descriptor, raw).ok_or_else(|| {
                ConfigError::codec(
                    &schema.full_name,
                    format!("invalid value for field '{}'", descriptor.name),
                )
            })?;
        }
        Ok(message)
    }
}

impl ModuleConfig for DynamicMessage {
    fn type_name(&self) -> &str {
        &self.schema.full_name
    }

    fn encode(&self) -> ConfigResult<Vec<u8>> {
        self.encode_payload()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Resolves a marked extension name into a zero-valued message.
///
/// `name` may be given with or without the marker.
pub fn resolve_extension(
    resolver: Option<&dyn SchemaResolver>,
    name: &str,
) -> ConfigResult<DynamicMessage> {
    let full_name = extension_name(name).unwrap_or(name);
    resolver
        .and_then(|resolver| resolver.resolve(full_name))
        .map(|schema| DynamicMessage::zero(&schema))
        .ok_or_else(|| ConfigError::SchemaNotFound {
            name: full_name.to_string(),
        })
}
