//! Name marker synthesis.
//!
//! A type-keyed container cannot tell two registrations of the same service
//! type apart. [`MarkerRegistry`] hands out one opaque [`NameMarker`] per
//! distinct (case-insensitive) name, which is then combined with the service
//! type into a compound lookup key by [`NamedKeyBuilder`](crate::NamedKeyBuilder).

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use tracing::debug;

use crate::error::{DiError, DiResult};
use crate::key::fold_name;

static SHARED: Lazy<Arc<MarkerRegistry>> = Lazy::new(|| Arc::new(MarkerRegistry::new()));

/// Opaque token standing for one service name.
///
/// Markers cannot be constructed outside a [`MarkerRegistry`]. Equality is
/// identity: two markers are equal only if the same registry created them for
/// the same folded name.
#[derive(Clone)]
pub struct NameMarker {
    inner: Arc<MarkerInner>,
}

struct MarkerInner {
    id: u64,
    name: Box<str>,
}

impl NameMarker {
    /// The name as first seen by the registry (original casing).
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Registry-unique id.
    pub fn id(&self) -> u64 {
        self.inner.id
    }
}

impl PartialEq for NameMarker {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for NameMarker {}

impl Hash for NameMarker {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.id.hash(state);
    }
}

impl fmt::Debug for NameMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NameMarker")
            .field("id", &self.inner.id)
            .field("name", &self.inner.name)
            .finish()
    }
}

/// Memoizing source of [`NameMarker`]s.
///
/// Lookups are case-insensitive. Creation is insert-if-absent per name, so
/// concurrent first use from many threads still yields exactly one marker;
/// unrelated names live in different shards and do not contend.
///
/// Markers are never evicted. Containers keep compound keys built from them
/// for as long as they live.
///
/// # Examples
///
/// ```rust
/// use named_di::MarkerRegistry;
///
/// let markers = MarkerRegistry::new();
/// let a = markers.get_or_create("Primary").unwrap();
/// let b = markers.get_or_create("primary").unwrap();
/// let c = markers.get_or_create("secondary").unwrap();
///
/// assert_eq!(a, b);
/// assert_ne!(a, c);
/// assert_eq!(markers.len(), 2);
/// ```
pub struct MarkerRegistry {
    markers: DashMap<String, NameMarker>,
    next_id: AtomicU64,
}

impl MarkerRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            markers: DashMap::new(),
            next_id: AtomicU64::new(0),
        }
    }

    /// The process-wide registry.
    pub fn shared() -> Arc<MarkerRegistry> {
        SHARED.clone()
    }

    /// Returns the marker for `name`, synthesizing it on first use.
    pub fn get_or_create(&self, name: &str) -> DiResult<NameMarker> {
        if name.is_empty() {
            return Err(DiError::InvalidArgument("service_name"));
        }

        let folded = fold_name(name);
        if let Some(existing) = self.markers.get(&folded) {
            return Ok(existing.value().clone());
        }

        match self.markers.entry(folded) {
            Entry::Occupied(entry) => Ok(entry.get().clone()),
            Entry::Vacant(entry) => {
                let id = self.allocate_id(name)?;
                let marker = NameMarker {
                    inner: Arc::new(MarkerInner { id, name: name.into() }),
                };
                debug!(name, id, "synthesized name marker");
                Ok(entry.insert(marker).value().clone())
            }
        }
    }

    /// Returns the marker for `name` if one was already synthesized.
    pub fn get(&self, name: &str) -> Option<NameMarker> {
        self.markers.get(&fold_name(name)).map(|m| m.value().clone())
    }

    /// Number of markers synthesized so far.
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    fn allocate_id(&self, name: &str) -> DiResult<u64> {
        self.next_id
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |id| id.checked_add(1))
            .map_err(|_| DiError::InvalidState(format!("unable to create a name marker for '{}'", name)))
    }
}

impl Default for MarkerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MarkerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarkerRegistry")
            .field("markers", &self.markers.len())
            .finish()
    }
}
