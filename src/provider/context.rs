//! Resolver context handed to factories and activators.

use crate::error::DiResult;
use crate::key::Key;
use crate::registration::AnyArc;
use crate::traits::{ResolverCore, SupportsNamedResolution, SupportsRequiredNamedResolution};

use super::{Scope, ServiceProvider};

/// Context passed to factory functions for resolving dependencies.
///
/// Wraps the resolver that triggered construction (the root provider or a
/// scope) so factories stay independent of where they are resolved from.
/// Named lookups made through the context go through the same resolver.
///
/// # Examples
///
/// ```rust
/// use named_di::{ServiceCollection, Resolver};
/// use std::sync::Arc;
///
/// struct Database { url: String }
/// struct UserService { db: Arc<Database> }
///
/// let mut services = ServiceCollection::new();
/// services.add_singleton(Database { url: "postgres://localhost".to_string() });
/// services.add_transient_factory::<UserService, _>(|resolver| UserService {
///     db: resolver.get_required::<Database>(),
/// });
///
/// let provider = services.build();
/// assert_eq!(provider.get_required::<UserService>().db.url, "postgres://localhost");
/// ```
pub struct ResolverContext<'a> {
    resolver: &'a dyn ResolverCore,
    root: &'a ServiceProvider,
    scope: Option<&'a Scope>,
}

impl<'a> ResolverContext<'a> {
    pub(crate) fn new<T: ResolverCore>(resolver: &'a T, root: &'a ServiceProvider, scope: Option<&'a Scope>) -> Self {
        Self { resolver, root, scope }
    }

    /// The root provider owning the registrations being resolved.
    pub fn root_provider(&self) -> &'a ServiceProvider {
        self.root
    }

    /// The scope the resolution was requested from, or `None` for the root
    /// provider and for anything built on behalf of a singleton.
    pub fn scope(&self) -> Option<&'a Scope> {
        self.scope
    }
}

impl<'a> ResolverCore for ResolverContext<'a> {
    fn resolve_any(&self, key: &Key) -> DiResult<AnyArc> {
        self.resolver.resolve_any(key)
    }

    fn resolve_many(&self, key: &Key) -> DiResult<Vec<AnyArc>> {
        self.resolver.resolve_many(key)
    }

    fn is_registered(&self, key: &Key) -> bool {
        self.resolver.is_registered(key)
    }

    fn named_resolution(&self) -> Option<&dyn SupportsNamedResolution> {
        self.resolver.named_resolution()
    }

    fn required_named_resolution(&self) -> Option<&dyn SupportsRequiredNamedResolution> {
        self.resolver.required_named_resolution()
    }
}
