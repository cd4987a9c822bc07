//! Injectable helper for resolving named services from inside the container.

use std::sync::Arc;

use tracing::debug;

use crate::error::{DiError, DiResult};
use crate::key::ServiceType;
use crate::lookup::NamedKeyBuilder;
use crate::markers::MarkerRegistry;
use crate::provider::{ResolverContext, Scope, ServiceProvider, WeakScope, WeakServiceProvider};
use crate::registration::{downcast_service, AnyArc};
use crate::traits::{
    Injectable, Resolver, ResolverCore, SupportsNamedResolution, SupportsRequiredNamedResolution,
};

use super::resolution::{fallback_get, fallback_get_required, fallback_get_sequence, validate_request};

enum Strategy {
    Native,
    Fallback(NamedKeyBuilder),
}

/// What the factory resolves through. Both are weak: the factory may be
/// cached by the very provider or scope it points at.
enum Target {
    Root(WeakServiceProvider),
    Scope(WeakScope),
}

/// Resolves named services against the provider or scope it was created for.
///
/// Registered as a transient whenever a named service is added to a
/// collection without native naming, so services can take it as a dependency
/// instead of the facade. Each instance is bound to whoever asked for it: a
/// service built inside a scope gets a factory that sees that scope's scoped
/// services, while singletons and root lookups get one bound to the root
/// provider. Whether to go native or through compound keys is decided once,
/// when it is created.
///
/// # Examples
///
/// ```rust
/// use named_di::{NamedServiceFactory, NamedServices, Resolver, ServiceCollection};
///
/// let named = NamedServices::shared();
/// let mut services = ServiceCollection::new();
/// named
///     .add_singleton_factory_as::<String, String, _, _>(&mut services, "motd", |_| "hi".to_string())
///     .unwrap();
///
/// let provider = services.build();
/// let factory = provider.get_required::<NamedServiceFactory>();
/// assert_eq!(*factory.get_required_named::<String>("MOTD").unwrap(), "hi");
/// assert!(factory.get_named::<String>("other").unwrap().is_none());
/// ```
pub struct NamedServiceFactory {
    target: Target,
    strategy: Strategy,
}

impl NamedServiceFactory {
    /// A factory resolving through the root provider.
    pub fn new(provider: &ServiceProvider, markers: Arc<MarkerRegistry>) -> Self {
        Self::bind(Target::Root(provider.downgrade()), provider, markers)
    }

    /// A factory resolving through `scope`, scoped services included.
    pub fn for_scope(scope: &Scope, markers: Arc<MarkerRegistry>) -> Self {
        Self::bind(Target::Scope(scope.downgrade()), scope, markers)
    }

    fn bind(target: Target, resolver: &dyn ResolverCore, markers: Arc<MarkerRegistry>) -> Self {
        let strategy = if resolver.named_resolution().is_some() {
            Strategy::Native
        } else {
            Strategy::Fallback(NamedKeyBuilder::new(markers))
        };
        debug!(
            native = matches!(strategy, Strategy::Native),
            scoped = matches!(target, Target::Scope(_)),
            "created named service factory"
        );

        Self { target, strategy }
    }

    /// Whether lookups go straight to the provider's native naming support.
    pub fn is_native(&self) -> bool {
        matches!(self.strategy, Strategy::Native)
    }

    /// Whether lookups go through a scope rather than the root provider.
    pub fn is_scoped(&self) -> bool {
        matches!(self.target, Target::Scope(_))
    }

    fn with_resolver<T>(&self, f: impl FnOnce(&dyn ResolverCore) -> DiResult<T>) -> DiResult<T> {
        match &self.target {
            Target::Root(provider) => {
                let provider = provider
                    .upgrade()
                    .ok_or_else(|| DiError::InvalidState("service provider has been dropped".to_string()))?;
                f(&provider)
            }
            Target::Scope(scope) => {
                let scope = scope
                    .upgrade()
                    .ok_or_else(|| DiError::InvalidState("scope has been dropped".to_string()))?;
                f(&scope)
            }
        }
    }

    pub fn get_named_service(&self, service_type: &ServiceType, service_name: &str) -> DiResult<Option<AnyArc>> {
        validate_request(service_type, service_name)?;
        self.with_resolver(|resolver| match &self.strategy {
            Strategy::Native => native(resolver.named_resolution())?.get_named_service(service_type, service_name),
            Strategy::Fallback(keys) => fallback_get(resolver, keys, service_type, service_name),
        })
    }

    pub fn get_named_services(&self, service_type: &ServiceType, service_name: &str) -> DiResult<Vec<AnyArc>> {
        validate_request(service_type, service_name)?;
        self.with_resolver(|resolver| match &self.strategy {
            Strategy::Native => native(resolver.named_resolution())?.get_named_services(service_type, service_name),
            Strategy::Fallback(keys) => fallback_get_sequence(resolver, keys, service_type, service_name),
        })
    }

    pub fn get_required_named_service(&self, service_type: &ServiceType, service_name: &str) -> DiResult<AnyArc> {
        validate_request(service_type, service_name)?;
        self.with_resolver(|resolver| match &self.strategy {
            Strategy::Native => {
                native(resolver.required_named_resolution())?.get_required_named_service(service_type, service_name)
            }
            Strategy::Fallback(keys) => fallback_get_required(resolver, keys, service_type, service_name),
        })
    }

    pub fn get_named<T: ?Sized + Send + Sync + 'static>(&self, service_name: &str) -> DiResult<Option<Arc<T>>> {
        self.get_named_service(&ServiceType::of::<T>(), service_name)?
            .map(downcast_service::<T>)
            .transpose()
    }

    pub fn get_required_named<T: ?Sized + Send + Sync + 'static>(&self, service_name: &str) -> DiResult<Arc<T>> {
        self.get_required_named_service(&ServiceType::of::<T>(), service_name)
            .and_then(downcast_service::<T>)
    }

    pub fn get_all_named<T: ?Sized + Send + Sync + 'static>(&self, service_name: &str) -> DiResult<Vec<Arc<T>>> {
        self.get_named_services(&ServiceType::of::<T>(), service_name)?
            .into_iter()
            .map(downcast_service::<T>)
            .collect()
    }
}

// Only reached on the native strategy, which was picked because the capability exists
fn native<C: ?Sized>(capability: Option<&C>) -> DiResult<&C> {
    capability.ok_or_else(|| DiError::InvalidState("native named resolution is no longer available".to_string()))
}

impl Injectable for NamedServiceFactory {
    fn activate(resolver: &ResolverContext<'_>) -> DiResult<Self> {
        let markers = resolver.get::<MarkerRegistry>()?;
        Ok(match resolver.scope() {
            Some(scope) => Self::for_scope(scope, markers),
            None => Self::new(resolver.root_provider(), markers),
        })
    }
}

impl SupportsNamedResolution for NamedServiceFactory {
    fn get_named_service(&self, service_type: &ServiceType, service_name: &str) -> DiResult<Option<AnyArc>> {
        NamedServiceFactory::get_named_service(self, service_type, service_name)
    }

    fn get_named_services(&self, service_type: &ServiceType, service_name: &str) -> DiResult<Vec<AnyArc>> {
        NamedServiceFactory::get_named_services(self, service_type, service_name)
    }
}

impl SupportsRequiredNamedResolution for NamedServiceFactory {
    fn get_required_named_service(&self, service_type: &ServiceType, service_name: &str) -> DiResult<AnyArc> {
        NamedServiceFactory::get_required_named_service(self, service_type, service_name)
    }
}

impl std::fmt::Debug for NamedServiceFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NamedServiceFactory")
            .field("native", &self.is_native())
            .field("scoped", &self.is_scoped())
            .finish()
    }
}
