//! Procedural macros for ingot.
//!
//! This crate provides:
//!
//! - `#[derive(Message)]` - Implements `Message` and registers the codec
//! - `#[register_builder(...)]` - Registers a settings type with the type registry
//!
//! Both expand to `linkme` distributed slice entries in `ingot-core`, so a
//! type becomes known to `TypeRegistry::collect_all()` and
//! `CodecRegistry::collect_all()` just by being linked in.

mod message;
mod register;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Implements `ingot_core::Message` and registers the type's codec.
///
/// # Attributes
///
/// - `#[message(name = "...")]` - Fully-qualified type identifier (required)
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Message)]
/// #[message(name = "ingot.app.dispatcher.Config")]
/// pub struct Config {}
/// ```
#[proc_macro_derive(Message, attributes(message))]
pub fn derive_message(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match message::derive_message(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

/// Registers a `Buildable` settings type under `(category, name)`.
///
/// The item is left unchanged. It must implement `Buildable`,
/// `Deserialize` and `Default`. Stack the attribute to register aliases.
///
/// # Example
///
/// ```rust,ignore
/// #[register_builder(category = "outbound", name = "freedom")]
/// #[derive(Debug, Default, Deserialize)]
/// pub struct FreedomSettings { /* ... */ }
/// ```
#[proc_macro_attribute]
pub fn register_builder(attr: TokenStream, item: TokenStream) -> TokenStream {
    register::register_builder(attr, item)
}
