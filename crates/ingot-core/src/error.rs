//! Error types for configuration assembly.
//!
//! Every failure aborts the assembly in progress. Nothing here is retried:
//! a malformed configuration stays malformed.

use std::fmt;

use thiserror::Error;

/// Errors that can occur while loading, building or encoding configurations.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Malformed document text or a structural mismatch with the schema.
    #[error("failed to parse configuration document: {reason}")]
    DocumentParse {
        /// Parser message.
        reason: String,
    },

    /// `(category, type)` is neither registered nor resolvable as an extension.
    #[error("unknown {category} type '{type_name}'{}", tag_note(.tag))]
    UnknownType {
        /// Registry category that was searched.
        category: String,
        /// The offending type name.
        type_name: String,
        /// Tag of the item that declared the type, if any.
        tag: Option<String>,
    },

    /// A required field is missing or holds an invalid value.
    #[error("invalid field '{field}' in {type_name}: {reason}")]
    FieldValidation {
        /// Field name as written in the document.
        field: String,
        /// Containing settings type.
        type_name: String,
        /// What is wrong with the value.
        reason: String,
    },

    /// An inner builder failed; `context` names the outer module.
    #[error("failed to build {context}{}", tag_note(.tag))]
    BuildDelegation {
        /// Module or stage that delegated the build.
        context: String,
        /// Tag of the failing item, if any.
        tag: Option<String>,
        /// The inner failure.
        #[source]
        source: Box<ConfigError>,
    },

    /// Extension lookup by fully-qualified schema name failed.
    #[error("message schema '{name}' not found")]
    SchemaNotFound {
        /// The fully-qualified name that was looked up.
        name: String,
    },

    /// Two tagged features share the same tag.
    #[error("duplicate {category} tag '{tag}'")]
    DuplicateTag {
        /// Category of the feature set.
        category: String,
        /// The repeated tag.
        tag: String,
    },

    /// An envelope names a type that no registered codec can decode.
    #[error("no decoder registered for message type '{type_name}'")]
    UnknownDecoder {
        /// The unresolvable type identifier.
        type_name: String,
    },

    /// An envelope was unpacked as the wrong message type.
    #[error("envelope holds '{found}', expected '{expected}'")]
    TypeMismatch {
        /// Requested type identifier.
        expected: String,
        /// Type identifier stored in the envelope.
        found: String,
    },

    /// Binary or text encoding of a message failed.
    #[error("failed to encode or decode '{type_name}': {reason}")]
    Codec {
        /// Type identifier of the message.
        type_name: String,
        /// Encoder message.
        reason: String,
    },

    /// Reading a configuration source failed.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
}

fn tag_note(tag: &Option<String>) -> String {
    match tag {
        Some(tag) => format!(" (tag '{tag}')"),
        None => String::new(),
    }
}

impl ConfigError {
    /// Creates a document parse error.
    pub fn parse(reason: impl fmt::Display) -> Self {
        Self::DocumentParse {
            reason: reason.to_string(),
        }
    }

    /// Creates an unknown type error without a tag.
    pub fn unknown_type(category: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self::UnknownType {
            category: category.into(),
            type_name: type_name.into(),
            tag: None,
        }
    }

    /// Creates a field validation error.
    pub fn validation(
        field: impl Into<String>,
        type_name: impl Into<String>,
        reason: impl fmt::Display,
    ) -> Self {
        Self::FieldValidation {
            field: field.into(),
            type_name: type_name.into(),
            reason: reason.to_string(),
        }
    }

    /// Creates a validation error for a required field left empty.
    pub fn missing_field(field: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self::validation(field, type_name, "must not be empty")
    }

    /// Wraps `source` with the context of the module that delegated to it.
    pub fn delegation(context: impl Into<String>, tag: Option<String>, source: ConfigError) -> Self {
        Self::BuildDelegation {
            context: context.into(),
            tag,
            source: Box::new(source),
        }
    }

    /// Creates a codec error.
    pub fn codec(type_name: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self::Codec {
            type_name: type_name.into(),
            reason: reason.to_string(),
        }
    }

    /// Attaches an item tag to an [`UnknownType`](Self::UnknownType) error.
    ///
    /// Other variants are returned unchanged.
    pub fn with_tag(self, tag: impl Into<String>) -> Self {
        match self {
            Self::UnknownType {
                category,
                type_name,
                ..
            } => Self::UnknownType {
                category,
                type_name,
                tag: Some(tag.into()),
            },
            other => other,
        }
    }

    /// Returns the innermost error of a delegation chain.
    pub fn root_cause(&self) -> &ConfigError {
        let mut current = self;
        while let Self::BuildDelegation { source, .. } = current {
            current = source;
        }
        current
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::parse(err)
    }
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
