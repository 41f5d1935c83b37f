pub mod net;
pub mod protocol;

pub use net::{Address, Cidr, Endpoint, Network, PortRange};
pub use protocol::{SecurityConfig, SecurityType, ServerEndpoint, User};
