//! Proxy protocol builders, registered under the `inbound` and `outbound`
//! categories by protocol name.

pub mod blackhole;
pub mod dns;
pub mod dokodemo;
pub mod freedom;
pub mod vmess;
