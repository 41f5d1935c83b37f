//! Registry categories used by the builders of this crate.

use ingot_core::linkme::distributed_slice;
use ingot_core::{CATEGORY_REGISTRY, CategoryRegistration, NameMatching};

/// App modules and named v5 services.
pub const SERVICE: &str = "service";
/// Inbound proxy protocols.
pub const INBOUND: &str = "inbound";
/// Outbound proxy protocols.
pub const OUTBOUND: &str = "outbound";
/// v5 transport protocols.
pub const TRANSPORT: &str = "transport";
/// v5 security protocols.
pub const SECURITY: &str = "security";
/// Members of a multi-observatory.
pub const OBSERVER: &str = "observer";
/// Management API services. Matched case-insensitively.
pub const GRPC_SERVICE: &str = "grpcservice";

#[distributed_slice(CATEGORY_REGISTRY)]
#[linkme(crate = ingot_core::linkme)]
static GRPC_SERVICE_CATEGORY: CategoryRegistration = CategoryRegistration {
    category: GRPC_SERVICE,
    matching: NameMatching::CaseInsensitive,
};
