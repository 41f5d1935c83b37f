//! # Ingot Conf
//!
//! Settings builders for every module and the two root document schemas.
//!
//! Builders register themselves into the link-time registry of
//! `ingot-core` under these categories:
//!
//! | Category      | Examples                                     |
//! |---------------|----------------------------------------------|
//! | `service`     | `log`, `router`, `dns`, `policy`, `api`, ... |
//! | `inbound`     | `vmess`, `dokodemo-door`                     |
//! | `outbound`    | `freedom`, `blackhole`, `dns`, `vmess`       |
//! | `transport`   | `tcp`, `websocket`, `http`                   |
//! | `security`    | `tls`                                        |
//! | `observer`    | `default`, `burst`                           |
//! | `grpcservice` | `StatsService`, ... (case-insensitive)       |
//!
//! ## Example
//!
//! ```rust,ignore
//! use ingot_conf::{DocumentLoader, SchemaVersion, assemble};
//! use ingot_core::{BuildContext, TypeRegistry};
//!
//! let types = TypeRegistry::collect_all();
//! let document = DocumentLoader::new().file("config.json").load()?;
//! let assembly = assemble(&document, SchemaVersion::Auto, &BuildContext::new(&types))?;
//! ```

pub mod assemble;
pub mod category;
pub mod cfgcommon;
pub mod handler;
pub mod loader;
pub mod proxy;
pub mod synthetic;
pub mod transport;
pub mod v4;
pub mod v5;

pub use assemble::{SchemaVersion, assemble};
pub use loader::{DocumentFormat, DocumentLoader};
pub use synthetic::log::default_log_config;
