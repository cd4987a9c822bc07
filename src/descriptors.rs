//! Service descriptors: what is registered, for how long, and how it is built.

use std::fmt;
use std::sync::Arc;

use crate::error::{DiError, DiResult};
use crate::key::ServiceType;
use crate::lifetime::Lifetime;
use crate::provider::ResolverContext;
use crate::registration::{erase, AnyArc, Constructor};
use crate::traits::{Implements, Injectable};

/// An implementation type the container activates itself, bound to the
/// service type it was declared for.
#[derive(Clone)]
pub struct ImplementationType {
    service: ServiceType,
    implementation: ServiceType,
    activator: Constructor,
}

impl ImplementationType {
    /// `I` activated through [`Injectable`] and handed out as `S`.
    pub fn of<S, I>() -> Self
    where
        S: ?Sized + Send + Sync + 'static,
        I: Injectable + Implements<S>,
    {
        Self {
            service: ServiceType::of::<S>(),
            implementation: ServiceType::of::<I>(),
            activator: Arc::new(|resolver: &ResolverContext<'_>| -> DiResult<AnyArc> {
                let value = Arc::new(I::activate(resolver)?);
                Ok(erase::<S>(<I as Implements<S>>::upcast(value)))
            }),
        }
    }

    /// `T` handed out as itself.
    pub fn of_self<T: Injectable>() -> Self {
        Self::of::<T, T>()
    }

    /// The service type this implementation was declared for.
    pub fn service_type(&self) -> &ServiceType {
        &self.service
    }

    pub fn implementation_type(&self) -> &ServiceType {
        &self.implementation
    }
}

/// A factory closure, bound to the service type it produces and carrying its
/// declared return type.
#[derive(Clone)]
pub struct Factory {
    service: ServiceType,
    return_type: ServiceType,
    ctor: Constructor,
}

impl Factory {
    /// Factory producing `R`, handed out as `S`.
    ///
    /// ```rust
    /// use named_di::{Factory, ServiceType};
    ///
    /// let factory = Factory::new::<String, String, _>(|_| "built".to_string());
    /// assert_eq!(factory.return_type(), &ServiceType::of::<String>());
    /// ```
    pub fn new<S, R, F>(factory: F) -> Self
    where
        S: ?Sized + Send + Sync + 'static,
        R: Implements<S>,
        F: for<'a> Fn(&ResolverContext<'a>) -> R + Send + Sync + 'static,
    {
        Self::try_new::<S, R, _>(move |resolver| Ok(factory(resolver)))
    }

    /// Fallible factory producing `R`, handed out as `S`.
    pub fn try_new<S, R, F>(factory: F) -> Self
    where
        S: ?Sized + Send + Sync + 'static,
        R: Implements<S>,
        F: for<'a> Fn(&ResolverContext<'a>) -> DiResult<R> + Send + Sync + 'static,
    {
        Self {
            service: ServiceType::of::<S>(),
            return_type: ServiceType::of::<R>(),
            ctor: Arc::new(move |resolver: &ResolverContext<'_>| -> DiResult<AnyArc> {
                let value = Arc::new(factory(resolver)?);
                Ok(erase::<S>(<R as Implements<S>>::upcast(value)))
            }),
        }
    }

    /// A factory over an already erased constructor.
    pub(crate) fn erased(service: ServiceType, return_type: ServiceType, ctor: Constructor) -> Self {
        Self {
            service,
            return_type,
            ctor,
        }
    }

    pub fn service_type(&self) -> &ServiceType {
        &self.service
    }

    /// The type the factory is declared to return.
    pub fn return_type(&self) -> &ServiceType {
        &self.return_type
    }
}

/// A fixed, pre-built instance bound to a service type.
#[derive(Clone)]
pub struct Instance {
    service: ServiceType,
    runtime_type: ServiceType,
    value: AnyArc,
}

impl Instance {
    /// `value` handed out as `S`. Every resolution returns this same `Arc`.
    pub fn new<S, R>(value: Arc<R>) -> Self
    where
        S: ?Sized + Send + Sync + 'static,
        R: Implements<S>,
    {
        Self {
            service: ServiceType::of::<S>(),
            runtime_type: ServiceType::of::<R>(),
            value: erase::<S>(<R as Implements<S>>::upcast(value)),
        }
    }

    pub fn service_type(&self) -> &ServiceType {
        &self.service
    }

    /// The concrete type of the instance.
    pub fn runtime_type(&self) -> &ServiceType {
        &self.runtime_type
    }
}

/// The three ways a descriptor can produce its service.
#[derive(Clone)]
pub enum ImplementationSource {
    Type(ImplementationType),
    Factory(Factory),
    Instance(Instance),
}

impl ImplementationSource {
    /// The service type the implementation was bound to.
    pub fn service_type(&self) -> &ServiceType {
        match self {
            ImplementationSource::Type(t) => t.service_type(),
            ImplementationSource::Factory(f) => f.service_type(),
            ImplementationSource::Instance(i) => i.service_type(),
        }
    }

    /// The implementation type, the factory's declared return type, or the
    /// instance's runtime type.
    pub fn implementation_type(&self) -> &ServiceType {
        match self {
            ImplementationSource::Type(t) => t.implementation_type(),
            ImplementationSource::Factory(f) => f.return_type(),
            ImplementationSource::Instance(i) => i.runtime_type(),
        }
    }

    /// Argument name reported when this source does not fit its service type.
    pub(crate) fn parameter(&self) -> &'static str {
        match self {
            ImplementationSource::Type(_) => "implementation_type",
            ImplementationSource::Factory(_) => "implementation_factory",
            ImplementationSource::Instance(_) => "implementation_instance",
        }
    }

    pub(crate) fn constructor(&self) -> Constructor {
        match self {
            ImplementationSource::Type(t) => t.activator.clone(),
            ImplementationSource::Factory(f) => f.ctor.clone(),
            ImplementationSource::Instance(i) => {
                let value = i.value.clone();
                Arc::new(move |_: &ResolverContext<'_>| -> DiResult<AnyArc> { Ok(value.clone()) })
            }
        }
    }

    /// Produces one erased service value.
    pub(crate) fn create(&self, resolver: &ResolverContext<'_>) -> DiResult<AnyArc> {
        match self {
            ImplementationSource::Type(t) => (t.activator)(resolver),
            ImplementationSource::Factory(f) => (f.ctor)(resolver),
            ImplementationSource::Instance(i) => Ok(i.value.clone()),
        }
    }
}

impl fmt::Debug for ImplementationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            ImplementationSource::Type(_) => "Type",
            ImplementationSource::Factory(_) => "Factory",
            ImplementationSource::Instance(_) => "Instance",
        };
        f.debug_struct("ImplementationSource")
            .field("kind", &kind)
            .field("service_type", self.service_type())
            .field("implementation_type", self.implementation_type())
            .finish()
    }
}

/// Checks that `service_type` is a real type and that `source` was bound to it.
pub(crate) fn validate(service_type: &ServiceType, source: &ImplementationSource) -> DiResult<()> {
    if !service_type.is_native() {
        return Err(DiError::InvalidArgument("service_type"));
    }
    if source.service_type() != service_type {
        return Err(DiError::InvalidArgument(source.parameter()));
    }
    Ok(())
}

/// A single registration: service type, lifetime and implementation source.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use named_di::{DiError, Instance, Lifetime, ServiceDescriptor, ServiceType};
///
/// let descriptor = ServiceDescriptor::with_instance(
///     ServiceType::of::<String>(),
///     Instance::new::<String, String>(Arc::new("fixed".to_string())),
/// )
/// .unwrap();
/// assert_eq!(descriptor.lifetime(), Lifetime::Singleton);
///
/// // The instance must be bound to the same service type
/// let err = ServiceDescriptor::with_instance(
///     ServiceType::of::<u32>(),
///     Instance::new::<String, String>(Arc::new("fixed".to_string())),
/// )
/// .unwrap_err();
/// assert!(matches!(err, DiError::InvalidArgument("implementation_instance")));
/// ```
#[derive(Debug, Clone)]
pub struct ServiceDescriptor {
    service_type: ServiceType,
    lifetime: Lifetime,
    source: ImplementationSource,
}

impl ServiceDescriptor {
    pub fn with_type(service_type: ServiceType, implementation: ImplementationType, lifetime: Lifetime) -> DiResult<Self> {
        Self::new(service_type, lifetime, ImplementationSource::Type(implementation))
    }

    pub fn with_factory(service_type: ServiceType, factory: Factory, lifetime: Lifetime) -> DiResult<Self> {
        Self::new(service_type, lifetime, ImplementationSource::Factory(factory))
    }

    /// Instances are always singletons.
    pub fn with_instance(service_type: ServiceType, instance: Instance) -> DiResult<Self> {
        Self::new(service_type, Lifetime::Singleton, ImplementationSource::Instance(instance))
    }

    pub fn new(service_type: ServiceType, lifetime: Lifetime, source: ImplementationSource) -> DiResult<Self> {
        validate(&service_type, &source)?;
        Ok(Self::from_parts(service_type, lifetime, source))
    }

    /// Typed shortcut; the compiler has already checked `I` fits `S`.
    pub fn describe<S, I>(lifetime: Lifetime) -> Self
    where
        S: ?Sized + Send + Sync + 'static,
        I: Injectable + Implements<S>,
    {
        Self::from_parts(ServiceType::of::<S>(), lifetime, ImplementationSource::Type(ImplementationType::of::<S, I>()))
    }

    /// Builds a descriptor without validation. Used for compound keys, which
    /// are not native types.
    pub(crate) fn from_parts(service_type: ServiceType, lifetime: Lifetime, source: ImplementationSource) -> Self {
        Self {
            service_type,
            lifetime,
            source,
        }
    }

    pub fn service_type(&self) -> &ServiceType {
        &self.service_type
    }

    pub fn lifetime(&self) -> Lifetime {
        self.lifetime
    }

    pub fn source(&self) -> &ImplementationSource {
        &self.source
    }

    /// Implementation type, factory return type, or instance runtime type.
    pub fn implementation_type(&self) -> &ServiceType {
        self.source.implementation_type()
    }
}

impl fmt::Display for ServiceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Lifetime = {}, ServiceType = {}, ImplementationType = {}",
            self.lifetime,
            self.service_type,
            self.implementation_type()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{implements, ServiceCollection};

    trait Shape: Send + Sync {
        fn sides(&self) -> u32;
    }

    struct Square;
    impl Shape for Square {
        fn sides(&self) -> u32 {
            4
        }
    }
    impl Injectable for Square {
        fn activate(_: &ResolverContext<'_>) -> DiResult<Self> {
            Ok(Square)
        }
    }
    implements!(dyn Shape => [Square]);

    #[test]
    fn implementation_type_reports_both_types() {
        let t = ImplementationType::of::<dyn Shape, Square>();
        assert_eq!(t.service_type(), &ServiceType::of::<dyn Shape>());
        assert_eq!(t.implementation_type(), &ServiceType::of::<Square>());
    }

    #[test]
    fn derives_implementation_type_per_source() {
        let typed = ServiceDescriptor::describe::<dyn Shape, Square>(Lifetime::Transient);
        assert_eq!(typed.implementation_type(), &ServiceType::of::<Square>());

        let factory = ServiceDescriptor::with_factory(
            ServiceType::of::<dyn Shape>(),
            Factory::new::<dyn Shape, Square, _>(|_| Square),
            Lifetime::Scoped,
        )
        .unwrap();
        assert_eq!(factory.implementation_type(), &ServiceType::of::<Square>());

        let instance = ServiceDescriptor::with_instance(
            ServiceType::of::<dyn Shape>(),
            Instance::new::<dyn Shape, Square>(Arc::new(Square)),
        )
        .unwrap();
        assert_eq!(instance.implementation_type(), &ServiceType::of::<Square>());
    }

    #[test]
    fn rejects_sources_bound_to_other_services() {
        let err = ServiceDescriptor::with_type(
            ServiceType::of::<Square>(),
            ImplementationType::of::<dyn Shape, Square>(),
            Lifetime::Transient,
        )
        .unwrap_err();
        assert!(matches!(err, DiError::InvalidArgument("implementation_type")));

        let err = ServiceDescriptor::with_factory(
            ServiceType::of::<Square>(),
            Factory::new::<dyn Shape, Square, _>(|_| Square),
            Lifetime::Transient,
        )
        .unwrap_err();
        assert!(matches!(err, DiError::InvalidArgument("implementation_factory")));
    }

    #[test]
    fn rejects_synthesized_service_types() {
        let markers = crate::MarkerRegistry::new();
        let marker = ServiceType::Marker(markers.get_or_create("x").unwrap());
        let err = ServiceDescriptor::with_type(marker, ImplementationType::of_self::<Square>(), Lifetime::Transient)
            .unwrap_err();
        assert!(matches!(err, DiError::InvalidArgument("service_type")));
    }

    #[test]
    fn sources_create_through_the_container() {
        let provider = ServiceCollection::new().build();
        let ctx = ResolverContext::new(&provider, &provider, None);
        let source = ImplementationSource::Type(ImplementationType::of::<dyn Shape, Square>());
        let value = crate::downcast_service::<dyn Shape>(source.create(&ctx).unwrap()).unwrap();
        assert_eq!(value.sides(), 4);
    }

    #[test]
    fn display_lists_lifetime_and_types() {
        let descriptor = ServiceDescriptor::describe::<Square, Square>(Lifetime::Transient);
        let text = descriptor.to_string();
        assert!(text.starts_with("Lifetime = Transient, ServiceType = "));
        assert!(text.contains("Square"));
    }
}
