//! Canonical configuration messages.
//!
//! Every message here derives `Message`, so its type identifier is known to
//! `CodecRegistry::collect_all()` once this crate is linked.
//!
//! - [`app`]: runtime feature modules (log, dispatcher, router, dns, ...)
//! - [`proxy`]: inbound and outbound protocol settings
//! - [`transport`]: stream, transport and security settings
//! - [`common`]: shared network and protocol records

pub mod app;
pub mod common;
pub mod proxy;
pub mod transport;
