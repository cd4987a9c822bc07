//! Service provider module for dependency injection.
//!
//! The provider owns the frozen registrations and the singleton caches;
//! [`Scope`] adds per-scope caching on top of it.

use std::sync::{Arc, Weak};

use tracing::trace;

use crate::collection::ContainerOptions;
use crate::error::{DiError, DiResult};
use crate::internal::with_circular_catch;
use crate::key::{Key, ServiceType, TypeDefinition};
use crate::lifetime::Lifetime;
use crate::registration::{erase, AnyArc, Registration, Registry, ServiceSequence};
use crate::traits::{ResolverCore, SupportsNamedResolution, SupportsRequiredNamedResolution};

pub mod context;
pub mod scope;

pub use context::ResolverContext;
pub use scope::{Scope, WeakScope};

/// Root resolver built from a [`ServiceCollection`](crate::ServiceCollection).
///
/// Cheap to clone; clones share registrations and singleton instances.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use named_di::{Resolver, ServiceCollection};
///
/// let mut services = ServiceCollection::new();
/// services.add_singleton_factory::<String, _>(|_| "shared".to_string());
///
/// let provider = services.build();
/// let a = provider.get_required::<String>();
/// let b = provider.clone().get_required::<String>();
/// assert!(Arc::ptr_eq(&a, &b));
/// ```
#[derive(Clone)]
pub struct ServiceProvider {
    inner: Arc<ProviderInner>,
}

pub(crate) struct ProviderInner {
    registry: Registry,
    options: ContainerOptions,
}

/// Non-owning handle to a [`ServiceProvider`].
///
/// Services cached inside a provider hold this instead of the provider
/// itself, so the provider can still be dropped.
#[derive(Clone)]
pub struct WeakServiceProvider {
    inner: Weak<ProviderInner>,
}

impl WeakServiceProvider {
    /// The provider, if it is still alive.
    pub fn upgrade(&self) -> Option<ServiceProvider> {
        self.inner.upgrade().map(|inner| ServiceProvider { inner })
    }
}

impl ServiceProvider {
    pub(crate) fn new(mut registry: Registry, options: ContainerOptions) -> Self {
        registry.finalize();
        Self {
            inner: Arc::new(ProviderInner { registry, options }),
        }
    }

    /// Creates a scope. Scoped services resolved through it live as long as it does.
    pub fn create_scope(&self) -> Scope {
        Scope::new(self.clone(), self.inner.registry.scoped_count)
    }

    pub fn downgrade(&self) -> WeakServiceProvider {
        WeakServiceProvider {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Whether this provider resolves names natively.
    pub fn supports_named_services(&self) -> bool {
        self.inner.options.native_naming
    }

    /// Number of registrations, named ones included.
    pub fn len(&self) -> usize {
        self.inner.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Lists every registration with its lifetime and implementation type.
    #[cfg(feature = "diagnostics")]
    pub fn to_debug_string(&self) -> String {
        let mut lines: Vec<String> = self
            .inner
            .registry
            .iter()
            .map(|(key, reg)| format!("  {}: {} ({})\n", key, reg.lifetime, reg.implementation))
            .collect();
        lines.sort();

        let mut s = String::from("=== Service Provider Debug ===\n");
        for line in lines {
            s.push_str(&line);
        }
        s
    }

    #[cfg(test)]
    pub(crate) fn ptr_eq(&self, other: &ServiceProvider) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    #[inline]
    pub(crate) fn registry(&self) -> &Registry {
        &self.inner.registry
    }

    #[inline]
    fn resolve_singleton(&self, reg: &Registration) -> DiResult<AnyArc> {
        match &reg.single_runtime {
            Some(cell) => {
                if let Some(value) = cell.get() {
                    return Ok(value.clone());
                }
                // Singletons only ever see the root, never the requesting scope
                cell.get_or_try_init(|| (reg.ctor)(&ResolverContext::new(self, self, None)))
                    .cloned()
            }
            None => (reg.ctor)(&ResolverContext::new(self, self, None)),
        }
    }

    /// Resolves one registration on behalf of `resolver`. `scope` is `None`
    /// when resolving from the root.
    pub(crate) fn resolve_registration<R: ResolverCore>(
        &self,
        reg: &Registration,
        resolver: &R,
        scope: Option<&Scope>,
    ) -> DiResult<AnyArc> {
        match reg.lifetime {
            Lifetime::Singleton => self.resolve_singleton(reg),
            Lifetime::Transient => (reg.ctor)(&ResolverContext::new(resolver, self, scope)),
            Lifetime::Scoped => {
                let scope =
                    scope.ok_or(DiError::WrongLifetime("Cannot resolve scoped service from root provider"))?;
                let cell = reg
                    .scoped_slot
                    .and_then(|slot| scope.scoped_cell(slot))
                    .ok_or_else(|| DiError::InvalidState("scoped registration without a slot".to_string()))?;
                cell.get_or_try_init(|| (reg.ctor)(&ResolverContext::new(resolver, self, Some(scope))))
                    .cloned()
            }
        }
    }

    pub(crate) fn resolve_key<R: ResolverCore>(
        &self,
        key: &Key,
        resolver: &R,
        scope: Option<&Scope>,
    ) -> DiResult<AnyArc> {
        if let Some(reg) = self.registry().get(key) {
            trace!(key = %key, lifetime = %reg.lifetime, "resolving service");
            return self.resolve_registration(reg, resolver, scope);
        }

        // Many<T> is answered from T's registrations unless registered itself
        if let Some(element) = many_element(key) {
            let items = self.resolve_key_many(&Key::Type(element.clone()), resolver, scope)?;
            return Ok(erase(Arc::new(ServiceSequence(items))));
        }

        Err(not_found(key))
    }

    pub(crate) fn resolve_key_many<R: ResolverCore>(
        &self,
        key: &Key,
        resolver: &R,
        scope: Option<&Scope>,
    ) -> DiResult<Vec<AnyArc>> {
        let regs = self.registry().get_all(key);
        trace!(key = %key, count = regs.len(), "resolving all services");
        regs.iter()
            .map(|reg| self.resolve_registration(reg, resolver, scope))
            .collect()
    }

    pub(crate) fn is_key_registered(&self, key: &Key) -> bool {
        match many_element(key) {
            Some(_) => true,
            None => self.registry().contains_key(key),
        }
    }
}

fn many_element(key: &Key) -> Option<&ServiceType> {
    match key {
        Key::Type(service_type) if service_type.definition() == Some(TypeDefinition::Many) => {
            match service_type.arguments() {
                [element] => Some(element),
                _ => None,
            }
        }
        _ => None,
    }
}

fn not_found(key: &Key) -> DiError {
    match key {
        Key::Type(service_type) => DiError::not_found(service_type),
        Key::Named(service_type, name) => DiError::named_not_found(service_type, name),
    }
}

impl ResolverCore for ServiceProvider {
    fn resolve_any(&self, key: &Key) -> DiResult<AnyArc> {
        with_circular_catch(key.to_string(), || self.resolve_key(key, self, None))
    }

    fn resolve_many(&self, key: &Key) -> DiResult<Vec<AnyArc>> {
        with_circular_catch(key.to_string(), || self.resolve_key_many(key, self, None))
    }

    fn is_registered(&self, key: &Key) -> bool {
        self.is_key_registered(key)
    }

    fn named_resolution(&self) -> Option<&dyn SupportsNamedResolution> {
        if self.supports_named_services() {
            Some(self)
        } else {
            None
        }
    }

    fn required_named_resolution(&self) -> Option<&dyn SupportsRequiredNamedResolution> {
        if self.supports_named_services() {
            Some(self)
        } else {
            None
        }
    }
}

impl SupportsNamedResolution for ServiceProvider {
    fn get_named_service(&self, service_type: &ServiceType, service_name: &str) -> DiResult<Option<AnyArc>> {
        let key = Key::named(service_type.clone(), service_name);
        if !self.registry().contains_key(&key) {
            return Ok(None);
        }
        self.resolve_any(&key).map(Some)
    }

    fn get_named_services(&self, service_type: &ServiceType, service_name: &str) -> DiResult<Vec<AnyArc>> {
        self.resolve_many(&Key::named(service_type.clone(), service_name))
    }
}

impl SupportsRequiredNamedResolution for ServiceProvider {
    fn get_required_named_service(&self, service_type: &ServiceType, service_name: &str) -> DiResult<AnyArc> {
        let key = Key::named(service_type.clone(), service_name);
        if !self.registry().contains_key(&key) {
            return Err(DiError::named_not_found(service_type, service_name));
        }
        self.resolve_any(&key)
    }
}

impl std::fmt::Debug for ServiceProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceProvider")
            .field("registrations", &self.len())
            .field("native_naming", &self.supports_named_services())
            .finish()
    }
}
