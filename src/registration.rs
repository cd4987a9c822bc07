//! Service registration storage.

use std::any::Any;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::error::{DiError, DiResult};
use crate::key::{Key, ServiceType};
use crate::lifetime::Lifetime;
use crate::provider::ResolverContext;

/// Type-erased service value.
///
/// A service resolved as `S` is stored as an `Arc<S>` inside the erased
/// `Arc`, so trait objects and concrete types share one representation.
/// Use [`downcast_service`] to get the typed `Arc<S>` back.
pub type AnyArc = Arc<dyn Any + Send + Sync>;

pub(crate) type Constructor = Arc<dyn for<'a> Fn(&ResolverContext<'a>) -> DiResult<AnyArc> + Send + Sync>;

#[inline]
pub(crate) fn erase<S: ?Sized + Send + Sync + 'static>(service: Arc<S>) -> AnyArc {
    Arc::new(service)
}

/// Recovers the typed service from an erased value.
///
/// ```rust
/// use std::sync::Arc;
/// use named_di::{downcast_service, DiError, Resolver, ResolverCore, ServiceCollection, key_of_type};
///
/// let mut services = ServiceCollection::new();
/// services.add_singleton(7u32);
/// let provider = services.build();
///
/// let any = provider.resolve_any(&key_of_type::<u32>()).unwrap();
/// assert_eq!(*downcast_service::<u32>(any.clone()).unwrap(), 7);
/// assert!(matches!(downcast_service::<u64>(any), Err(DiError::TypeMismatch(_))));
/// ```
#[inline]
pub fn downcast_service<S: ?Sized + Send + Sync + 'static>(any: AnyArc) -> DiResult<Arc<S>> {
    any.downcast::<Arc<S>>()
        .map(|boxed| (*boxed).clone())
        .map_err(|_| DiError::TypeMismatch(std::any::type_name::<S>().to_string()))
}

/// Erased result of enumerating a `Many<T>` key.
pub(crate) struct ServiceSequence(pub(crate) Vec<AnyArc>);

pub(crate) struct Registration {
    pub(crate) lifetime: Lifetime,
    pub(crate) ctor: Constructor,
    #[cfg_attr(not(feature = "diagnostics"), allow(dead_code))]
    pub(crate) implementation: ServiceType,
    pub(crate) single_runtime: Option<OnceCell<AnyArc>>,
    pub(crate) scoped_slot: Option<usize>,
}

impl Registration {
    pub(crate) fn new(lifetime: Lifetime, ctor: Constructor, implementation: ServiceType) -> Self {
        let single_runtime = match lifetime {
            Lifetime::Singleton => Some(OnceCell::new()),
            _ => None,
        };

        Self {
            lifetime,
            ctor,
            implementation,
            single_runtime,
            scoped_slot: None,
        }
    }
}

#[cfg(feature = "ahash")]
type KeyMap<V> = std::collections::HashMap<Key, V, ahash::RandomState>;
#[cfg(not(feature = "ahash"))]
type KeyMap<V> = std::collections::HashMap<Key, V>;

/// Frozen registrations of a built provider, grouped by key in registration order.
pub(crate) struct Registry {
    entries: KeyMap<Vec<Registration>>,
    pub(crate) scoped_count: usize,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self {
            entries: KeyMap::default(),
            scoped_count: 0,
        }
    }

    pub(crate) fn insert(&mut self, key: Key, registration: Registration) {
        self.entries.entry(key).or_default().push(registration);
    }

    /// The registration that wins single resolution: the last one added.
    #[inline]
    pub(crate) fn get(&self, key: &Key) -> Option<&Registration> {
        self.entries.get(key).and_then(|regs| regs.last())
    }

    #[inline]
    pub(crate) fn get_all(&self, key: &Key) -> &[Registration] {
        self.entries.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    #[inline]
    pub(crate) fn contains_key(&self, key: &Key) -> bool {
        self.entries.contains_key(key)
    }

    #[cfg_attr(not(feature = "diagnostics"), allow(dead_code))]
    pub(crate) fn iter(&self) -> impl Iterator<Item = (&Key, &Registration)> {
        self.entries
            .iter()
            .flat_map(|(key, regs)| regs.iter().map(move |reg| (key, reg)))
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Assigns every scoped registration its own slot in a scope's cache.
    pub(crate) fn finalize(&mut self) {
        let mut next_scoped_slot = 0;
        for regs in self.entries.values_mut() {
            for reg in regs.iter_mut() {
                if reg.lifetime == Lifetime::Scoped {
                    reg.scoped_slot = Some(next_scoped_slot);
                    next_scoped_slot += 1;
                }
            }
        }
        self.scoped_count = next_scoped_slot;
    }
}
