//! Compound lookup keys for named services.

use std::sync::Arc;

use crate::error::DiResult;
use crate::key::{ServiceType, TypeDefinition};
use crate::markers::MarkerRegistry;

/// Builds the compound keys under which named services are stored in a
/// container that only understands type keys.
///
/// `build_key(S, "name")` is `Named<S, marker("name")>`; the enumerable form
/// wraps it as `Many<Named<S, marker("name")>>`. Both are pure functions of the
/// registry state, so registration and resolution always agree on the key.
///
/// Registration synthesizes markers; lookups only ever use
/// [`find_key`](Self::find_key), so resolving unknown names leaves the
/// registry untouched.
///
/// ```rust
/// use std::sync::Arc;
/// use named_di::{MarkerRegistry, NamedKeyBuilder, ServiceType};
///
/// let keys = NamedKeyBuilder::new(Arc::new(MarkerRegistry::new()));
/// let a = keys.build_key(&ServiceType::of::<u32>(), "port").unwrap();
/// let b = keys.build_key(&ServiceType::of::<u32>(), "PORT").unwrap();
/// assert_eq!(a, b);
/// assert_ne!(a, keys.build_key(&ServiceType::of::<u64>(), "port").unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct NamedKeyBuilder {
    markers: Arc<MarkerRegistry>,
}

impl NamedKeyBuilder {
    pub fn new(markers: Arc<MarkerRegistry>) -> Self {
        Self { markers }
    }

    /// The marker registry backing this builder.
    pub fn markers(&self) -> &Arc<MarkerRegistry> {
        &self.markers
    }

    /// `Named<service_type, marker(name)>`.
    pub fn build_key(&self, service_type: &ServiceType, name: &str) -> DiResult<ServiceType> {
        let marker = self.markers.get_or_create(name)?;
        Ok(ServiceType::construct(
            TypeDefinition::Named,
            vec![service_type.clone(), ServiceType::Marker(marker)],
        ))
    }

    /// `Many<Named<service_type, marker(name)>>`.
    pub fn build_enumerable_key(&self, service_type: &ServiceType, name: &str) -> DiResult<ServiceType> {
        let key = self.build_key(service_type, name)?;
        Ok(ServiceType::construct(TypeDefinition::Many, vec![key]))
    }

    /// `Named<service_type, marker(name)>` if a marker for `name` already
    /// exists. `None` means nothing was ever registered under `name`.
    pub fn find_key(&self, service_type: &ServiceType, name: &str) -> Option<ServiceType> {
        let marker = self.markers.get(name)?;
        Some(ServiceType::construct(
            TypeDefinition::Named,
            vec![service_type.clone(), ServiceType::Marker(marker)],
        ))
    }

    /// `Many<Named<service_type, marker(name)>>` if a marker for `name` already exists.
    pub fn find_enumerable_key(&self, service_type: &ServiceType, name: &str) -> Option<ServiceType> {
        let key = self.find_key(service_type, name)?;
        Some(ServiceType::construct(TypeDefinition::Many, vec![key]))
    }
}
