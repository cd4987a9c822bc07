//! Service lifetime definitions.

use std::fmt;

/// Service lifetimes controlling instance caching behavior.
///
/// Lifetimes apply the same way to named and unnamed registrations: a named
/// singleton is one instance per `(service type, name)` registration.
///
/// # Examples
///
/// ```rust
/// use named_di::{ServiceCollection, Resolver};
/// use std::sync::Arc;
///
/// struct Database { url: String }
/// struct RequestModel { id: u32 }
///
/// let mut services = ServiceCollection::new();
/// services.add_singleton(Database { url: "postgres://localhost".to_string() });
/// services.add_scoped_factory::<RequestModel, _>(|_| RequestModel { id: 7 });
///
/// let provider = services.build();
///
/// // Singleton: same instance across scopes
/// let db1 = provider.get_required::<Database>();
/// let scope1 = provider.create_scope();
/// let db2 = scope1.get_required::<Database>();
/// assert!(Arc::ptr_eq(&db1, &db2));
///
/// // Scoped: same within a scope, different across scopes
/// let a = scope1.get_required::<RequestModel>();
/// let b = scope1.get_required::<RequestModel>();
/// let c = provider.create_scope().get_required::<RequestModel>();
/// assert!(Arc::ptr_eq(&a, &b));
/// assert!(!Arc::ptr_eq(&a, &c));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifetime {
    /// Single instance per root provider, cached forever
    Singleton,
    /// Single instance per scope, cached for the scope's lifetime
    Scoped,
    /// New instance per resolution, never cached
    Transient,
}

impl fmt::Display for Lifetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Lifetime::Singleton => "Singleton",
            Lifetime::Scoped => "Scoped",
            Lifetime::Transient => "Transient",
        };
        f.write_str(name)
    }
}
