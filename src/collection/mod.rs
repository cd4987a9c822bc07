//! Service collection module for dependency injection.
//!
//! A [`ServiceCollection`] is an ordered list of descriptors. Nothing is
//! constructed until [`build`](ServiceCollection::build) freezes it into a
//! [`ServiceProvider`].

use std::sync::Arc;

use tracing::debug;

use crate::descriptors::{Factory, ImplementationSource, ImplementationType, Instance, ServiceDescriptor};
use crate::error::DiResult;
use crate::key::{Key, ServiceType};
use crate::lifetime::Lifetime;
use crate::named::NamedServiceDescriptor;
use crate::provider::{ResolverContext, ServiceProvider};
use crate::registration::{erase, AnyArc, Registration, Registry};
use crate::traits::{Implements, Injectable, RegistrarCore, SupportsNamedRegistration};

/// Container construction options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContainerOptions {
    /// Store named descriptors as-is and resolve them by `(type, name)`.
    ///
    /// When off, the collection and its provider only understand type keys
    /// and named services go through compound keys instead.
    pub native_naming: bool,
}

enum Entry {
    Unnamed(ServiceDescriptor),
    Named(NamedServiceDescriptor),
}

/// Ordered list of service registrations.
///
/// # Examples
///
/// ```rust
/// use named_di::{ServiceCollection, Resolver};
///
/// struct Config { name: String }
///
/// let mut services = ServiceCollection::new();
/// services.add_singleton(Config { name: "app".to_string() });
///
/// let provider = services.build();
/// assert_eq!(provider.get_required::<Config>().name, "app");
/// ```
#[derive(Default)]
pub struct ServiceCollection {
    entries: Vec<Entry>,
    options: ContainerOptions,
}

impl ServiceCollection {
    /// A plain collection: type keys only.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ContainerOptions) -> Self {
        Self {
            entries: Vec::new(),
            options,
        }
    }

    /// A collection that stores and resolves names natively.
    pub fn with_native_naming() -> Self {
        Self::with_options(ContainerOptions { native_naming: true })
    }

    pub fn options(&self) -> ContainerOptions {
        self.options
    }

    // ----- Concrete Type Registrations -----

    /// Registers `value` as a singleton of its own type.
    pub fn add_singleton<T: Send + Sync + 'static>(&mut self, value: T) -> &mut Self {
        self.add_singleton_as::<T, T>(Arc::new(value))
    }

    /// Registers an existing instance as the singleton for `S`.
    pub fn add_singleton_as<S, R>(&mut self, value: Arc<R>) -> &mut Self
    where
        S: ?Sized + Send + Sync + 'static,
        R: Implements<S>,
    {
        self.push(
            ServiceType::of::<S>(),
            Lifetime::Singleton,
            ImplementationSource::Instance(Instance::new::<S, R>(value)),
        )
    }

    pub fn add_singleton_factory<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: Send + Sync + 'static,
        F: for<'a> Fn(&ResolverContext<'a>) -> T + Send + Sync + 'static,
    {
        self.add_factory(Lifetime::Singleton, factory)
    }

    pub fn add_scoped_factory<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: Send + Sync + 'static,
        F: for<'a> Fn(&ResolverContext<'a>) -> T + Send + Sync + 'static,
    {
        self.add_factory(Lifetime::Scoped, factory)
    }

    pub fn add_transient_factory<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: Send + Sync + 'static,
        F: for<'a> Fn(&ResolverContext<'a>) -> T + Send + Sync + 'static,
    {
        self.add_factory(Lifetime::Transient, factory)
    }

    fn add_factory<T, F>(&mut self, lifetime: Lifetime, factory: F) -> &mut Self
    where
        T: Send + Sync + 'static,
        F: for<'a> Fn(&ResolverContext<'a>) -> T + Send + Sync + 'static,
    {
        self.push(
            ServiceType::of::<T>(),
            lifetime,
            ImplementationSource::Factory(Factory::new::<T, T, F>(factory)),
        )
    }

    // ----- Trait Registrations -----

    /// Registers a factory handing out an `Arc<S>` directly, typically a
    /// trait object. The implementation type is reported as `S`.
    pub fn add_trait_factory<S, F>(&mut self, lifetime: Lifetime, factory: F) -> &mut Self
    where
        S: ?Sized + Send + Sync + 'static,
        F: for<'a> Fn(&ResolverContext<'a>) -> Arc<S> + Send + Sync + 'static,
    {
        let service_type = ServiceType::of::<S>();
        let factory = Factory::erased(
            service_type.clone(),
            service_type.clone(),
            Arc::new(move |r: &ResolverContext<'_>| -> DiResult<AnyArc> { Ok(erase(factory(r))) }),
        );
        self.push(service_type, lifetime, ImplementationSource::Factory(factory))
    }

    // ----- Activated Registrations -----

    /// Registers `I`, built through [`Injectable`], as `S`.
    pub fn add_type<S, I>(&mut self, lifetime: Lifetime) -> &mut Self
    where
        S: ?Sized + Send + Sync + 'static,
        I: Injectable + Implements<S>,
    {
        self.push(
            ServiceType::of::<S>(),
            lifetime,
            ImplementationSource::Type(ImplementationType::of::<S, I>()),
        )
    }

    pub fn add_transient<S, I>(&mut self) -> &mut Self
    where
        S: ?Sized + Send + Sync + 'static,
        I: Injectable + Implements<S>,
    {
        self.add_type::<S, I>(Lifetime::Transient)
    }

    pub fn add_scoped<S, I>(&mut self) -> &mut Self
    where
        S: ?Sized + Send + Sync + 'static,
        I: Injectable + Implements<S>,
    {
        self.add_type::<S, I>(Lifetime::Scoped)
    }

    fn push(&mut self, service_type: ServiceType, lifetime: Lifetime, source: ImplementationSource) -> &mut Self {
        self.entries
            .push(Entry::Unnamed(ServiceDescriptor::from_parts(service_type, lifetime, source)));
        self
    }

    // ----- Introspection -----

    /// Unnamed descriptors in registration order.
    pub fn descriptors(&self) -> impl Iterator<Item = &ServiceDescriptor> {
        self.entries.iter().filter_map(|entry| match entry {
            Entry::Unnamed(descriptor) => Some(descriptor),
            Entry::Named(_) => None,
        })
    }

    /// Natively stored named descriptors in registration order.
    pub fn named_descriptors(&self) -> impl Iterator<Item = &NamedServiceDescriptor> {
        self.entries.iter().filter_map(|entry| match entry {
            Entry::Named(descriptor) => Some(descriptor),
            Entry::Unnamed(_) => None,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Freezes the registrations into a provider.
    pub fn build(self) -> ServiceProvider {
        let mut registry = Registry::new();
        let count = self.entries.len();

        for entry in self.entries {
            let (key, descriptor) = match entry {
                Entry::Unnamed(descriptor) => (Key::Type(descriptor.service_type().clone()), descriptor),
                Entry::Named(named) => {
                    let key = Key::named(named.service_type().clone(), named.service_name());
                    (key, named.into_descriptor())
                }
            };
            let registration = Registration::new(
                descriptor.lifetime(),
                descriptor.source().constructor(),
                descriptor.implementation_type().clone(),
            );
            registry.insert(key, registration);
        }

        debug!(registrations = count, native_naming = self.options.native_naming, "built service provider");
        ServiceProvider::new(registry, self.options)
    }
}

impl RegistrarCore for ServiceCollection {
    fn add_descriptor(&mut self, descriptor: ServiceDescriptor) {
        self.entries.push(Entry::Unnamed(descriptor));
    }

    fn contains(&self, service_type: &ServiceType) -> bool {
        self.descriptors().any(|d| d.service_type() == service_type)
    }

    fn named_registration(&mut self) -> Option<&mut dyn SupportsNamedRegistration> {
        if self.options.native_naming {
            Some(self)
        } else {
            None
        }
    }
}

impl SupportsNamedRegistration for ServiceCollection {
    /// Named descriptors added to a collection without native naming are
    /// kept but never resolved by name.
    fn add_named(&mut self, descriptor: NamedServiceDescriptor) {
        self.entries.push(Entry::Named(descriptor));
    }
}

impl std::fmt::Debug for ServiceCollection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceCollection")
            .field("entries", &self.entries.len())
            .field("options", &self.options)
            .finish()
    }
}
