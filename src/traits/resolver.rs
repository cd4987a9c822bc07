//! Resolver traits for service resolution.

use std::sync::Arc;

use crate::error::DiResult;
use crate::key::{Key, ServiceType};
use crate::registration::{downcast_service, AnyArc};
use crate::traits::{SupportsNamedResolution, SupportsRequiredNamedResolution};

/// Object-safe core of every resolver.
///
/// Implemented by [`ServiceProvider`](crate::ServiceProvider),
/// [`Scope`](crate::Scope) and [`ResolverContext`](crate::ResolverContext).
/// Values come back type-erased; use [`Resolver`] for typed access.
pub trait ResolverCore: Send + Sync {
    /// Resolves the last registration for `key`.
    fn resolve_any(&self, key: &Key) -> DiResult<AnyArc>;

    /// Resolves every registration for `key`, in registration order. An
    /// unknown key yields an empty list.
    fn resolve_many(&self, key: &Key) -> DiResult<Vec<AnyArc>>;

    /// Whether `key` can be resolved without a not-found error.
    fn is_registered(&self, key: &Key) -> bool;

    /// Native named lookup, if this resolver has it.
    fn named_resolution(&self) -> Option<&dyn SupportsNamedResolution> {
        None
    }

    /// Native required named lookup, if this resolver has it.
    fn required_named_resolution(&self) -> Option<&dyn SupportsRequiredNamedResolution> {
        None
    }
}

/// Typed resolution on top of [`ResolverCore`].
///
/// Works for concrete types and trait objects alike:
///
/// ```rust
/// use std::sync::Arc;
/// use named_di::{implements, Resolver, ServiceCollection};
///
/// trait Clock: Send + Sync { fn now(&self) -> u64; }
/// struct Fixed;
/// impl Clock for Fixed { fn now(&self) -> u64 { 42 } }
/// implements!(dyn Clock => [Fixed]);
///
/// let mut services = ServiceCollection::new();
/// services.add_singleton_as::<dyn Clock, _>(Arc::new(Fixed));
///
/// let provider = services.build();
/// assert_eq!(provider.get_required::<dyn Clock>().now(), 42);
/// assert!(provider.get::<String>().is_err());
/// ```
pub trait Resolver: ResolverCore {
    fn get<T: ?Sized + Send + Sync + 'static>(&self) -> DiResult<Arc<T>> {
        let any = self.resolve_any(&Key::Type(ServiceType::of::<T>()))?;
        downcast_service::<T>(any)
    }

    /// Like [`get`](Resolver::get), but `None` when `T` is not registered.
    fn try_get<T: ?Sized + Send + Sync + 'static>(&self) -> DiResult<Option<Arc<T>>> {
        let key = Key::Type(ServiceType::of::<T>());
        if !self.is_registered(&key) {
            return Ok(None);
        }
        self.resolve_any(&key).and_then(downcast_service::<T>).map(Some)
    }

    fn get_all<T: ?Sized + Send + Sync + 'static>(&self) -> DiResult<Vec<Arc<T>>> {
        self.resolve_many(&Key::Type(ServiceType::of::<T>()))?
            .into_iter()
            .map(downcast_service::<T>)
            .collect()
    }

    fn get_required<T: ?Sized + Send + Sync + 'static>(&self) -> Arc<T> {
        self.get::<T>()
            .unwrap_or_else(|e| panic!("Failed to resolve {}: {}", std::any::type_name::<T>(), e))
    }
}

impl<R: ResolverCore + ?Sized> Resolver for R {}
