//! Named services.
//!
//! Several implementations of one service type can be registered side by side
//! under different names, then resolved by `(service type, name)`. Names are
//! case-insensitive.
//!
//! Containers built with [`ContainerOptions::native_naming`](crate::ContainerOptions)
//! store names themselves. Any other container is driven through compound
//! type keys of the form `Named<S, marker(name)>`, so unnamed resolution of `S`
//! never sees a named registration.
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use named_di::{implements, NamedServices, ServiceCollection, Resolver};
//!
//! trait Greeter: Send + Sync {
//!     fn greet(&self) -> String;
//! }
//! struct English;
//! struct French;
//! impl Greeter for English { fn greet(&self) -> String { "hello".into() } }
//! impl Greeter for French { fn greet(&self) -> String { "bonjour".into() } }
//! implements!(dyn Greeter => [English, French]);
//!
//! let named = NamedServices::shared();
//! let mut services = ServiceCollection::new();
//! named.add_singleton_instance_as::<dyn Greeter, _, _>(&mut services, "en", Arc::new(English)).unwrap();
//! named.add_singleton_instance_as::<dyn Greeter, _, _>(&mut services, "fr", Arc::new(French)).unwrap();
//!
//! let provider = services.build();
//! let fr = named.get_required_named::<dyn Greeter, _>(&provider, "FR").unwrap();
//! assert_eq!(fr.greet(), "bonjour");
//! assert!(provider.get::<dyn Greeter>().is_err());
//! ```

use std::sync::Arc;

use crate::lookup::NamedKeyBuilder;
use crate::markers::MarkerRegistry;

mod descriptor;
mod factory;
mod instance;
mod registration;
mod resolution;

pub use descriptor::NamedServiceDescriptor;
pub use factory::NamedServiceFactory;

/// Registration and resolution of named services against any collection or
/// resolver.
///
/// Each operation checks the collection or resolver for native naming support
/// and otherwise falls back to compound keys built from its
/// [`MarkerRegistry`]. Register and resolve through facades sharing the same
/// registry; [`NamedServices::shared`] uses the process-wide one.
#[derive(Debug, Clone)]
pub struct NamedServices {
    keys: NamedKeyBuilder,
}

impl NamedServices {
    pub fn new(markers: Arc<MarkerRegistry>) -> Self {
        Self {
            keys: NamedKeyBuilder::new(markers),
        }
    }

    /// Facade over [`MarkerRegistry::shared`].
    pub fn shared() -> Self {
        Self::new(MarkerRegistry::shared())
    }

    pub fn keys(&self) -> &NamedKeyBuilder {
        &self.keys
    }

    pub fn markers(&self) -> &Arc<MarkerRegistry> {
        self.keys.markers()
    }
}

impl Default for NamedServices {
    fn default() -> Self {
        Self::shared()
    }
}
