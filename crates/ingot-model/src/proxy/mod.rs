pub mod blackhole;
pub mod dns;
pub mod dokodemo;
pub mod freedom;
pub mod vmess;
