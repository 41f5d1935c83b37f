//! # Ingot Core
//!
//! The configuration-assembly engine: turns loosely typed configuration
//! documents into an ordered set of canonical module configurations.
//!
//! ## Building blocks
//!
//! - **Type registry**: `(category, type name) → builder factory`, filled at
//!   link time ([`TypeRegistry`], [`BUILDER_REGISTRY`])
//! - **Heterogeneous loader**: default-type substitution, settings parsing
//!   and build delegation ([`BuildContext::load_heterogeneous`])
//! - **Envelopes**: type identifier plus canonical payload ([`TypedEnvelope`])
//! - **Tagged features**: ordered `{type, tag, settings}` arrays
//!   ([`BuildContext::load_tagged_features`], [`TaggedFeatures`])
//! - **Descriptor fallback**: `#`-marked names resolved through a
//!   [`SchemaResolver`] into a zero-valued [`DynamicMessage`]
//! - **Codecs**: payload ↔ typed JSON per type identifier ([`CodecRegistry`])
//!
//! ## Data flow
//!
//! ```text
//! ┌──────────┐   ┌────────────┐   ┌─────────┐   ┌──────────────┐
//! │ document │──▶│  registry  │──▶│ builder │──▶│ TypedEnvelope│──▶ RootAssembly
//! └──────────┘   │  lookup    │   └─────────┘   └──────────────┘
//!                └────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use ingot_core::{BuildContext, TypeRegistry};
//!
//! let types = TypeRegistry::collect_all();
//! let ctx = BuildContext::new(&types);
//! let log = ctx.load_envelope("service", "log", "", &serde_json::json!({}))?;
//! ```

pub mod assembly;
pub mod builder;
pub mod codec;
pub mod descriptor;
pub mod envelope;
pub mod error;
pub mod loader;
pub mod message;
pub mod registry;
pub mod tagged;
pub mod text;

pub use assembly::{InboundHandlerConfig, OutboundHandlerConfig, RootAssembly};
pub use builder::{Buildable, Builder, builder_factory};
pub use codec::{CodecRegistry, MESSAGE_CODECS, MessageCodec};
pub use descriptor::{
    DynamicMessage, EXTENSION_MARKER, FieldDescriptor, FieldKind, FieldValue, MessageSchema,
    SchemaRegistry, SchemaResolver,
};
pub use envelope::TypedEnvelope;
pub use error::{ConfigError, ConfigResult};
pub use loader::BuildContext;
pub use message::{Message, ModuleConfig};
pub use registry::{
    BUILDER_REGISTRY, BuilderFactory, BuilderRegistration, CATEGORY_REGISTRY,
    CategoryRegistration, NameMatching, TypeRegistry,
};
pub use tagged::{FeatureItem, TaggedFeatures};
pub use text::TextFormat;

// Used by code generated in `ingot-macros`.
pub use linkme;
