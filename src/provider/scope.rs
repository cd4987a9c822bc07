//! Scoped service resolution.

use std::sync::{Arc, Weak};

use once_cell::sync::OnceCell;

use crate::error::{DiError, DiResult};
use crate::internal::with_circular_catch;
use crate::key::{Key, ServiceType};
use crate::registration::AnyArc;
use crate::traits::{ResolverCore, SupportsNamedResolution, SupportsRequiredNamedResolution};

use super::ServiceProvider;

/// Scoped service container.
///
/// - **Singleton**: resolved and cached in the root provider
/// - **Scoped**: resolved and cached in this scope
/// - **Transient**: created on every resolution
///
/// Named services follow the same rules. Clones share the scoped cache.
///
/// # Examples
///
/// ```rust
/// use named_di::{ServiceCollection, Resolver};
/// use std::sync::Arc;
///
/// struct DatabaseConnection(String);
///
/// let mut collection = ServiceCollection::new();
/// collection.add_scoped_factory::<DatabaseConnection, _>(|_| {
///     DatabaseConnection("connection-123".to_string())
/// });
///
/// let provider = collection.build();
/// let scope1 = provider.create_scope();
/// let scope2 = provider.create_scope();
///
/// let a = scope1.get_required::<DatabaseConnection>();
/// let b = scope1.get_required::<DatabaseConnection>();
/// let c = scope2.get_required::<DatabaseConnection>();
/// assert!(Arc::ptr_eq(&a, &b));
/// assert!(!Arc::ptr_eq(&a, &c));
/// ```
#[derive(Clone)]
pub struct Scope {
    inner: Arc<ScopeInner>,
}

struct ScopeInner {
    root: ServiceProvider,
    scoped_cells: Box<[OnceCell<AnyArc>]>,
}

/// Non-owning handle to a [`Scope`].
///
/// Scoped services hold this instead of the scope, since the scope's own
/// cache keeps them alive.
#[derive(Clone)]
pub struct WeakScope {
    inner: Weak<ScopeInner>,
}

impl WeakScope {
    /// The scope, if it is still alive.
    pub fn upgrade(&self) -> Option<Scope> {
        self.inner.upgrade().map(|inner| Scope { inner })
    }
}

impl Scope {
    pub(crate) fn new(root: ServiceProvider, scoped_count: usize) -> Self {
        let scoped_cells = (0..scoped_count).map(|_| OnceCell::new()).collect();
        Self {
            inner: Arc::new(ScopeInner { root, scoped_cells }),
        }
    }

    /// The provider this scope was created from.
    pub fn root(&self) -> &ServiceProvider {
        &self.inner.root
    }

    pub fn downgrade(&self) -> WeakScope {
        WeakScope {
            inner: Arc::downgrade(&self.inner),
        }
    }

    #[inline]
    pub(crate) fn scoped_cell(&self, slot: usize) -> Option<&OnceCell<AnyArc>> {
        self.inner.scoped_cells.get(slot)
    }
}

impl ResolverCore for Scope {
    fn resolve_any(&self, key: &Key) -> DiResult<AnyArc> {
        with_circular_catch(key.to_string(), || self.root().resolve_key(key, self, Some(self)))
    }

    fn resolve_many(&self, key: &Key) -> DiResult<Vec<AnyArc>> {
        with_circular_catch(key.to_string(), || self.root().resolve_key_many(key, self, Some(self)))
    }

    fn is_registered(&self, key: &Key) -> bool {
        self.root().is_key_registered(key)
    }

    fn named_resolution(&self) -> Option<&dyn SupportsNamedResolution> {
        if self.root().supports_named_services() {
            Some(self)
        } else {
            None
        }
    }

    fn required_named_resolution(&self) -> Option<&dyn SupportsRequiredNamedResolution> {
        if self.root().supports_named_services() {
            Some(self)
        } else {
            None
        }
    }
}

impl SupportsNamedResolution for Scope {
    fn get_named_service(&self, service_type: &ServiceType, service_name: &str) -> DiResult<Option<AnyArc>> {
        let key = Key::named(service_type.clone(), service_name);
        if !self.root().registry().contains_key(&key) {
            return Ok(None);
        }
        self.resolve_any(&key).map(Some)
    }

    fn get_named_services(&self, service_type: &ServiceType, service_name: &str) -> DiResult<Vec<AnyArc>> {
        self.resolve_many(&Key::named(service_type.clone(), service_name))
    }
}

impl SupportsRequiredNamedResolution for Scope {
    fn get_required_named_service(&self, service_type: &ServiceType, service_name: &str) -> DiResult<AnyArc> {
        let key = Key::named(service_type.clone(), service_name);
        if !self.root().registry().contains_key(&key) {
            return Err(DiError::named_not_found(service_type, service_name));
        }
        self.resolve_any(&key)
    }
}

impl std::fmt::Debug for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scope")
            .field("scoped_slots", &self.inner.scoped_cells.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use crate::traits::Resolver;
    use crate::ServiceCollection;

    #[test]
    fn singletons_are_shared_with_the_root() {
        let mut services = ServiceCollection::new();
        services.add_singleton_factory::<String, _>(|_| "root".to_string());
        let provider = services.build();

        let from_scope = provider.create_scope().get_required::<String>();
        assert!(Arc::ptr_eq(&from_scope, &provider.get_required::<String>()));
    }

    #[test]
    fn transients_are_never_cached() {
        let counter = Arc::new(AtomicUsize::new(0));
        let seen = counter.clone();
        let mut services = ServiceCollection::new();
        services.add_transient_factory::<usize, _>(move |_| seen.fetch_add(1, Ordering::SeqCst));
        let scope = services.build().create_scope();

        scope.get_required::<usize>();
        scope.get_required::<usize>();
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn singleton_factories_cannot_capture_scoped_services() {
        let mut services = ServiceCollection::new();
        services.add_scoped_factory::<u32, _>(|_| 5);
        services.add_singleton_factory::<String, _>(|r| match r.get::<u32>() {
            Ok(v) => v.to_string(),
            Err(e) => e.to_string(),
        });
        let scope = services.build().create_scope();
        assert!(scope.get_required::<String>().starts_with("Lifetime error"));
    }

    #[test]
    fn clones_share_the_scoped_cache() {
        let mut services = ServiceCollection::new();
        services.add_scoped_factory::<String, _>(|_| "per-scope".to_string());
        let scope = services.build().create_scope();
        let clone = scope.clone();
        assert!(Arc::ptr_eq(&scope.get_required::<String>(), &clone.get_required::<String>()));
    }

    #[test]
    fn weak_handle_does_not_keep_scope_alive() {
        let scope = ServiceCollection::new().build().create_scope();
        let weak = scope.downgrade();
        assert!(weak.upgrade().is_some());
        drop(scope);
        assert!(weak.upgrade().is_none());
    }
}
