//! Registration surface the named facade writes through.

use crate::descriptors::ServiceDescriptor;
use crate::key::ServiceType;
use crate::traits::SupportsNamedRegistration;

/// Minimal mutable view of a service collection.
///
/// [`ServiceCollection`](crate::ServiceCollection) implements it; other
/// collections can too, and the [`NamedServices`](crate::NamedServices)
/// facade works against any of them.
pub trait RegistrarCore {
    /// Appends a descriptor. Later descriptors for the same service type win
    /// single resolution; all of them take part in enumeration.
    fn add_descriptor(&mut self, descriptor: ServiceDescriptor);

    /// Whether any descriptor is registered for `service_type`.
    fn contains(&self, service_type: &ServiceType) -> bool;

    /// Appends `descriptor` only when nothing is registered for its service
    /// type yet. Returns whether it was added.
    fn try_add_descriptor(&mut self, descriptor: ServiceDescriptor) -> bool {
        if self.contains(descriptor.service_type()) {
            false
        } else {
            self.add_descriptor(descriptor);
            true
        }
    }

    /// Native named registration support, if this collection has it.
    fn named_registration(&mut self) -> Option<&mut dyn SupportsNamedRegistration> {
        None
    }
}
