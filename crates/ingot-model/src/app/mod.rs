pub mod commander;
pub mod dispatcher;
pub mod dns;
pub mod log;
pub mod observatory;
pub mod policy;
pub mod proxyman;
pub mod reverse;
pub mod router;
pub mod stats;
