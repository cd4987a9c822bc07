//! Capability traits for containers that understand service names natively.
//!
//! Registration capability is queried on the collection, resolution
//! capabilities on the resolver. When a capability is absent the
//! [`NamedServices`](crate::NamedServices) facade falls back to compound type keys.

use crate::error::DiResult;
use crate::key::ServiceType;
use crate::named::NamedServiceDescriptor;
use crate::registration::AnyArc;

/// A service collection that can store named descriptors as-is.
pub trait SupportsNamedRegistration {
    /// Stores a named descriptor. Names are matched case-insensitively.
    fn add_named(&mut self, descriptor: NamedServiceDescriptor);
}

/// A resolver that can look up services by `(service type, name)`.
pub trait SupportsNamedResolution: Send + Sync {
    /// The last service registered under `(service_type, service_name)`, or
    /// `None` when there is no such registration.
    fn get_named_service(&self, service_type: &ServiceType, service_name: &str) -> DiResult<Option<AnyArc>>;

    /// Every service registered under `(service_type, service_name)`, in
    /// registration order.
    fn get_named_services(&self, service_type: &ServiceType, service_name: &str) -> DiResult<Vec<AnyArc>>;
}

/// A resolver with its own failing named lookup.
///
/// Used in preference to [`SupportsNamedResolution`] for required resolution
/// so the container's own error reaches the caller.
pub trait SupportsRequiredNamedResolution: Send + Sync {
    fn get_required_named_service(&self, service_type: &ServiceType, service_name: &str) -> DiResult<AnyArc>;
}
