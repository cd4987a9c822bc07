//! Named service descriptors.

use std::fmt;

use crate::descriptors::{validate, Factory, ImplementationSource, ImplementationType, Instance, ServiceDescriptor};
use crate::error::{DiError, DiResult};
use crate::key::ServiceType;
use crate::lifetime::Lifetime;
use crate::traits::{Implements, Injectable};

/// A [`ServiceDescriptor`] registered under a service name.
///
/// Construction validates, in order: the service type (must be a real Rust
/// type), the service name (must be non-empty), and the implementation source
/// (must be bound to the same service type). The first failure is reported as
/// [`DiError::InvalidArgument`] naming that parameter.
///
/// # Examples
///
/// ```rust
/// use named_di::{DiError, ImplementationType, Lifetime, NamedServiceDescriptor, ServiceType};
/// # use named_di::{DiResult, Injectable, ResolverContext};
/// # struct Mailer;
/// # impl Injectable for Mailer {
/// #     fn activate(_: &ResolverContext<'_>) -> DiResult<Self> { Ok(Mailer) }
/// # }
///
/// let descriptor = NamedServiceDescriptor::transient(
///     ServiceType::of::<Mailer>(),
///     "smtp",
///     ImplementationType::of_self::<Mailer>(),
/// )
/// .unwrap();
/// assert_eq!(descriptor.lifetime(), Lifetime::Transient);
/// assert_eq!(descriptor.service_name(), "smtp");
///
/// let err = NamedServiceDescriptor::transient(
///     ServiceType::of::<Mailer>(),
///     "",
///     ImplementationType::of_self::<Mailer>(),
/// )
/// .unwrap_err();
/// assert!(matches!(err, DiError::InvalidArgument("service_name")));
/// ```
#[derive(Debug, Clone)]
pub struct NamedServiceDescriptor {
    descriptor: ServiceDescriptor,
    service_name: String,
}

impl NamedServiceDescriptor {
    pub fn new(
        service_type: ServiceType,
        service_name: &str,
        lifetime: Lifetime,
        source: ImplementationSource,
    ) -> DiResult<Self> {
        if !service_type.is_native() {
            return Err(DiError::InvalidArgument("service_type"));
        }
        if service_name.is_empty() {
            return Err(DiError::InvalidArgument("service_name"));
        }
        validate(&service_type, &source)?;

        Ok(Self {
            descriptor: ServiceDescriptor::from_parts(service_type, lifetime, source),
            service_name: service_name.to_string(),
        })
    }

    pub fn with_type(
        service_type: ServiceType,
        service_name: &str,
        implementation: ImplementationType,
        lifetime: Lifetime,
    ) -> DiResult<Self> {
        Self::new(service_type, service_name, lifetime, ImplementationSource::Type(implementation))
    }

    pub fn with_factory(
        service_type: ServiceType,
        service_name: &str,
        factory: Factory,
        lifetime: Lifetime,
    ) -> DiResult<Self> {
        Self::new(service_type, service_name, lifetime, ImplementationSource::Factory(factory))
    }

    /// Instances are always singletons.
    pub fn with_instance(service_type: ServiceType, service_name: &str, instance: Instance) -> DiResult<Self> {
        Self::new(service_type, service_name, Lifetime::Singleton, ImplementationSource::Instance(instance))
    }

    pub fn transient(service_type: ServiceType, service_name: &str, implementation: ImplementationType) -> DiResult<Self> {
        Self::with_type(service_type, service_name, implementation, Lifetime::Transient)
    }

    pub fn scoped(service_type: ServiceType, service_name: &str, implementation: ImplementationType) -> DiResult<Self> {
        Self::with_type(service_type, service_name, implementation, Lifetime::Scoped)
    }

    pub fn singleton(service_type: ServiceType, service_name: &str, implementation: ImplementationType) -> DiResult<Self> {
        Self::with_type(service_type, service_name, implementation, Lifetime::Singleton)
    }

    pub fn transient_factory(service_type: ServiceType, service_name: &str, factory: Factory) -> DiResult<Self> {
        Self::with_factory(service_type, service_name, factory, Lifetime::Transient)
    }

    pub fn scoped_factory(service_type: ServiceType, service_name: &str, factory: Factory) -> DiResult<Self> {
        Self::with_factory(service_type, service_name, factory, Lifetime::Scoped)
    }

    pub fn singleton_factory(service_type: ServiceType, service_name: &str, factory: Factory) -> DiResult<Self> {
        Self::with_factory(service_type, service_name, factory, Lifetime::Singleton)
    }

    pub fn singleton_instance(service_type: ServiceType, service_name: &str, instance: Instance) -> DiResult<Self> {
        Self::with_instance(service_type, service_name, instance)
    }

    /// `I` registered as `S` under `service_name`.
    pub fn describe_as<S, I>(service_name: &str, lifetime: Lifetime) -> DiResult<Self>
    where
        S: ?Sized + Send + Sync + 'static,
        I: Injectable + Implements<S>,
    {
        Self::with_type(ServiceType::of::<S>(), service_name, ImplementationType::of::<S, I>(), lifetime)
    }

    /// Re-wraps an existing descriptor's source and lifetime under `service_name`.
    ///
    /// ```rust
    /// use named_di::{Lifetime, NamedServiceDescriptor, ServiceDescriptor};
    /// # use named_di::{DiResult, Injectable, ResolverContext};
    /// # struct Cache;
    /// # impl Injectable for Cache {
    /// #     fn activate(_: &ResolverContext<'_>) -> DiResult<Self> { Ok(Cache) }
    /// # }
    ///
    /// let plain = ServiceDescriptor::describe::<Cache, Cache>(Lifetime::Scoped);
    /// let named = NamedServiceDescriptor::from_existing(&plain, "hot").unwrap();
    /// assert_eq!(named.lifetime(), Lifetime::Scoped);
    /// assert_eq!(named.implementation_type(), plain.implementation_type());
    /// ```
    pub fn from_existing(descriptor: &ServiceDescriptor, service_name: &str) -> DiResult<Self> {
        Self::new(
            descriptor.service_type().clone(),
            service_name,
            descriptor.lifetime(),
            descriptor.source().clone(),
        )
    }

    pub fn service_type(&self) -> &ServiceType {
        self.descriptor.service_type()
    }

    /// The name as given at registration (lookups ignore case).
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    pub fn lifetime(&self) -> Lifetime {
        self.descriptor.lifetime()
    }

    pub fn source(&self) -> &ImplementationSource {
        self.descriptor.source()
    }

    /// Implementation type, factory return type, or instance runtime type.
    pub fn implementation_type(&self) -> &ServiceType {
        self.descriptor.implementation_type()
    }

    /// The unnamed part of this descriptor.
    pub fn as_descriptor(&self) -> &ServiceDescriptor {
        &self.descriptor
    }

    pub(crate) fn into_descriptor(self) -> ServiceDescriptor {
        self.descriptor
    }
}

impl fmt::Display for NamedServiceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, ServiceName = {}", self.descriptor, self.service_name)
    }
}
