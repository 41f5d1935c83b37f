//! # Ingot
//!
//! Versioned configuration assembly for a modular proxy runtime.
//!
//! ## Overview
//!
//! A loosely typed v4 or v5 document goes in; an ordered [`RootAssembly`]
//! of typed module envelopes comes out. Every builder and every message
//! registers itself at link time, so linking this crate is enough to make
//! the whole catalogue available.
//!
//! ```text
//! ┌──────────────┐   ┌────────────┐   ┌──────────────┐   ┌──────────────┐
//! │ DocumentLoad │──▶│  assemble  │──▶│ RootAssembly │──▶│ binary / text│
//! │ json/toml/yml│   │  v4 | v5   │   │ app, in, out │   │   encodings  │
//! └──────────────┘   └────────────┘   └──────────────┘   └──────────────┘
//! ```
//!
//! - **Core**: type registry, heterogeneous loader, envelopes, codecs
//! - **Model**: canonical messages consumed by the runtime
//! - **Conf**: settings builders and the two root schemas
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ingot::prelude::*;
//!
//! fn main() -> ConfigResult<()> {
//!     let types = TypeRegistry::collect_all();
//!     let document = DocumentLoader::new().file("config.json").load()?;
//!     let assembly = assemble(&document, SchemaVersion::Auto, &BuildContext::new(&types))?;
//!
//!     let bytes = assembly.encode()?;
//!     let text = dump(&assembly, TextFormat::Expanded, &CodecRegistry::collect_all())?;
//!     println!("{} bytes\n{text}", bytes.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Extending
//!
//! Out-of-tree builders use `#[register_builder]` and messages use
//! `#[derive(Message)]`; both expand to paths under `ingot_core`, so such
//! crates depend on `ingot-core` directly.
//!
//! ## Features
//!
//! - `toml-config` *(default)*: TOML documents in the loader
//! - `yaml-config` *(default)*: YAML documents in the loader

pub use ingot_conf as conf;
pub use ingot_core as core;
pub use ingot_macros::{Message, register_builder};
pub use ingot_model as model;

pub use ingot_core::RootAssembly;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use ingot::prelude::*;
/// ```
pub mod prelude {
    // Assembly entry points
    pub use ingot_conf::{DocumentFormat, DocumentLoader, SchemaVersion, assemble};

    // Registries and build context
    pub use ingot_core::{BuildContext, CodecRegistry, SchemaRegistry, TypeRegistry};

    // Results and errors
    pub use ingot_core::{ConfigError, ConfigResult};

    // Output model
    pub use ingot_core::{Message, RootAssembly, TaggedFeatures, TypedEnvelope};

    // Text encodings
    pub use ingot_core::TextFormat;
    pub use ingot_core::text::{dump, load};
}
