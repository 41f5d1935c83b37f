//! Builders of the app modules.
//!
//! Shared by the v4 root (as fields) and the v5 root (as named services).

pub mod api;
pub mod dns;
pub mod log;
pub mod mux;
pub mod observatory;
pub mod policy;
pub mod reverse;
pub mod router;
pub mod stats;
