//! Named service registration.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::descriptors::{Factory, ImplementationSource, ImplementationType, Instance, ServiceDescriptor};
use crate::error::DiResult;
use crate::key::ServiceType;
use crate::lifetime::Lifetime;
use crate::markers::MarkerRegistry;
use crate::provider::ResolverContext;
use crate::registration::{AnyArc, Constructor};
use crate::traits::{Implements, Injectable, RegistrarCore};

use super::instance::NamedInstance;
use super::{NamedServiceDescriptor, NamedServiceFactory, NamedServices};

impl NamedServices {
    /// Registers a named descriptor.
    ///
    /// Collections with native naming store it as-is. Otherwise the
    /// [`MarkerRegistry`] and [`NamedServiceFactory`] support services are
    /// added once, and the service is registered under `Named<S, marker(name)>`
    /// with its lifetime preserved.
    pub fn add<'c, C>(&self, collection: &'c mut C, descriptor: NamedServiceDescriptor) -> DiResult<&'c mut C>
    where
        C: RegistrarCore + ?Sized,
    {
        if let Some(native) = collection.named_registration() {
            trace!(service = %descriptor.service_type(), name = descriptor.service_name(), "registering named service natively");
            native.add_named(descriptor);
            return Ok(collection);
        }

        self.add_fallback(collection, descriptor)?;
        Ok(collection)
    }

    fn add_fallback<C>(&self, collection: &mut C, descriptor: NamedServiceDescriptor) -> DiResult<()>
    where
        C: RegistrarCore + ?Sized,
    {
        // Only fallible step, so nothing is registered on failure
        let key = self.keys.build_key(descriptor.service_type(), descriptor.service_name())?;
        self.add_named_service_factory(collection);

        trace!(service = %descriptor.service_type(), name = descriptor.service_name(), key = %key, "registering named service under compound key");

        let source = descriptor.source().clone();
        let implementation = source.implementation_type().clone();
        let ctor: Constructor = Arc::new(move |resolver: &ResolverContext<'_>| -> DiResult<AnyArc> {
            Ok(NamedInstance::wrap(source.create(resolver)?))
        });

        collection.add_descriptor(ServiceDescriptor::from_parts(
            key.clone(),
            descriptor.lifetime(),
            ImplementationSource::Factory(Factory::erased(key, implementation, ctor)),
        ));
        Ok(())
    }

    /// Adds the [`MarkerRegistry`] singleton and the transient
    /// [`NamedServiceFactory`] unless the collection already has them.
    pub fn add_named_service_factory<'c, C>(&self, collection: &'c mut C) -> &'c mut C
    where
        C: RegistrarCore + ?Sized,
    {
        let markers = collection.try_add_descriptor(ServiceDescriptor::from_parts(
            ServiceType::of::<MarkerRegistry>(),
            Lifetime::Singleton,
            ImplementationSource::Instance(Instance::new::<MarkerRegistry, MarkerRegistry>(self.markers().clone())),
        ));
        let factory = collection.try_add_descriptor(ServiceDescriptor::describe::<NamedServiceFactory, NamedServiceFactory>(
            Lifetime::Transient,
        ));

        if markers || factory {
            debug!(markers, factory, "installed named service support");
        }
        collection
    }

    // ----- Implementation Type Registrations -----

    pub fn add_transient<'c, C>(
        &self,
        collection: &'c mut C,
        service_type: ServiceType,
        service_name: &str,
        implementation: ImplementationType,
    ) -> DiResult<&'c mut C>
    where
        C: RegistrarCore + ?Sized,
    {
        let descriptor = NamedServiceDescriptor::transient(service_type, service_name, implementation)?;
        self.add(collection, descriptor)
    }

    pub fn add_scoped<'c, C>(
        &self,
        collection: &'c mut C,
        service_type: ServiceType,
        service_name: &str,
        implementation: ImplementationType,
    ) -> DiResult<&'c mut C>
    where
        C: RegistrarCore + ?Sized,
    {
        let descriptor = NamedServiceDescriptor::scoped(service_type, service_name, implementation)?;
        self.add(collection, descriptor)
    }

    pub fn add_singleton<'c, C>(
        &self,
        collection: &'c mut C,
        service_type: ServiceType,
        service_name: &str,
        implementation: ImplementationType,
    ) -> DiResult<&'c mut C>
    where
        C: RegistrarCore + ?Sized,
    {
        let descriptor = NamedServiceDescriptor::singleton(service_type, service_name, implementation)?;
        self.add(collection, descriptor)
    }

    pub fn add_transient_as<'c, S, I, C>(&self, collection: &'c mut C, service_name: &str) -> DiResult<&'c mut C>
    where
        S: ?Sized + Send + Sync + 'static,
        I: Injectable + Implements<S>,
        C: RegistrarCore + ?Sized,
    {
        self.add_transient(collection, ServiceType::of::<S>(), service_name, ImplementationType::of::<S, I>())
    }

    pub fn add_scoped_as<'c, S, I, C>(&self, collection: &'c mut C, service_name: &str) -> DiResult<&'c mut C>
    where
        S: ?Sized + Send + Sync + 'static,
        I: Injectable + Implements<S>,
        C: RegistrarCore + ?Sized,
    {
        self.add_scoped(collection, ServiceType::of::<S>(), service_name, ImplementationType::of::<S, I>())
    }

    pub fn add_singleton_as<'c, S, I, C>(&self, collection: &'c mut C, service_name: &str) -> DiResult<&'c mut C>
    where
        S: ?Sized + Send + Sync + 'static,
        I: Injectable + Implements<S>,
        C: RegistrarCore + ?Sized,
    {
        self.add_singleton(collection, ServiceType::of::<S>(), service_name, ImplementationType::of::<S, I>())
    }

    /// `T` registered as itself.
    pub fn add_transient_self<'c, T, C>(&self, collection: &'c mut C, service_name: &str) -> DiResult<&'c mut C>
    where
        T: Injectable,
        C: RegistrarCore + ?Sized,
    {
        self.add_transient_as::<T, T, C>(collection, service_name)
    }

    pub fn add_scoped_self<'c, T, C>(&self, collection: &'c mut C, service_name: &str) -> DiResult<&'c mut C>
    where
        T: Injectable,
        C: RegistrarCore + ?Sized,
    {
        self.add_scoped_as::<T, T, C>(collection, service_name)
    }

    pub fn add_singleton_self<'c, T, C>(&self, collection: &'c mut C, service_name: &str) -> DiResult<&'c mut C>
    where
        T: Injectable,
        C: RegistrarCore + ?Sized,
    {
        self.add_singleton_as::<T, T, C>(collection, service_name)
    }

    // ----- Factory Registrations -----

    pub fn add_transient_factory<'c, C>(
        &self,
        collection: &'c mut C,
        service_type: ServiceType,
        service_name: &str,
        factory: Factory,
    ) -> DiResult<&'c mut C>
    where
        C: RegistrarCore + ?Sized,
    {
        let descriptor = NamedServiceDescriptor::transient_factory(service_type, service_name, factory)?;
        self.add(collection, descriptor)
    }

    pub fn add_scoped_factory<'c, C>(
        &self,
        collection: &'c mut C,
        service_type: ServiceType,
        service_name: &str,
        factory: Factory,
    ) -> DiResult<&'c mut C>
    where
        C: RegistrarCore + ?Sized,
    {
        let descriptor = NamedServiceDescriptor::scoped_factory(service_type, service_name, factory)?;
        self.add(collection, descriptor)
    }

    pub fn add_singleton_factory<'c, C>(
        &self,
        collection: &'c mut C,
        service_type: ServiceType,
        service_name: &str,
        factory: Factory,
    ) -> DiResult<&'c mut C>
    where
        C: RegistrarCore + ?Sized,
    {
        let descriptor = NamedServiceDescriptor::singleton_factory(service_type, service_name, factory)?;
        self.add(collection, descriptor)
    }

    pub fn add_transient_factory_as<'c, S, R, F, C>(
        &self,
        collection: &'c mut C,
        service_name: &str,
        factory: F,
    ) -> DiResult<&'c mut C>
    where
        S: ?Sized + Send + Sync + 'static,
        R: Implements<S>,
        F: for<'a> Fn(&ResolverContext<'a>) -> R + Send + Sync + 'static,
        C: RegistrarCore + ?Sized,
    {
        self.add_transient_factory(collection, ServiceType::of::<S>(), service_name, Factory::new::<S, R, F>(factory))
    }

    pub fn add_scoped_factory_as<'c, S, R, F, C>(
        &self,
        collection: &'c mut C,
        service_name: &str,
        factory: F,
    ) -> DiResult<&'c mut C>
    where
        S: ?Sized + Send + Sync + 'static,
        R: Implements<S>,
        F: for<'a> Fn(&ResolverContext<'a>) -> R + Send + Sync + 'static,
        C: RegistrarCore + ?Sized,
    {
        self.add_scoped_factory(collection, ServiceType::of::<S>(), service_name, Factory::new::<S, R, F>(factory))
    }

    pub fn add_singleton_factory_as<'c, S, R, F, C>(
        &self,
        collection: &'c mut C,
        service_name: &str,
        factory: F,
    ) -> DiResult<&'c mut C>
    where
        S: ?Sized + Send + Sync + 'static,
        R: Implements<S>,
        F: for<'a> Fn(&ResolverContext<'a>) -> R + Send + Sync + 'static,
        C: RegistrarCore + ?Sized,
    {
        self.add_singleton_factory(collection, ServiceType::of::<S>(), service_name, Factory::new::<S, R, F>(factory))
    }

    // ----- Instance Registrations -----

    /// Registers a fixed instance; every resolution returns that same `Arc`.
    pub fn add_singleton_instance<'c, C>(
        &self,
        collection: &'c mut C,
        service_type: ServiceType,
        service_name: &str,
        instance: Instance,
    ) -> DiResult<&'c mut C>
    where
        C: RegistrarCore + ?Sized,
    {
        let descriptor = NamedServiceDescriptor::singleton_instance(service_type, service_name, instance)?;
        self.add(collection, descriptor)
    }

    pub fn add_singleton_instance_as<'c, S, R, C>(
        &self,
        collection: &'c mut C,
        service_name: &str,
        instance: Arc<R>,
    ) -> DiResult<&'c mut C>
    where
        S: ?Sized + Send + Sync + 'static,
        R: Implements<S>,
        C: RegistrarCore + ?Sized,
    {
        self.add_singleton_instance(collection, ServiceType::of::<S>(), service_name, Instance::new::<S, R>(instance))
    }
}
