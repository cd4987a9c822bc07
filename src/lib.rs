//! # named-di
//!
//! Named services for a type-keyed dependency injection container.
//!
//! ## Features
//!
//! - **Named registrations**: several implementations of one service type, told apart by name
//! - **Case-insensitive names**: `"Primary"` and `"primary"` are the same registration
//! - **Any container**: native naming where the container supports it, compound type keys elsewhere
//! - **Type-safe lifetimes**: Singleton, Scoped, and Transient, named or not
//! - **Trait objects**: `dyn Trait` services declared with [`implements!`]
//! - **Circular dependency detection**: detailed error paths instead of stack overflows
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use named_di::{implements, NamedServices, Resolver, ServiceCollection};
//!
//! trait Storage: Send + Sync {
//!     fn location(&self) -> String;
//! }
//!
//! struct Disk(String);
//! struct Memory;
//!
//! impl Storage for Disk {
//!     fn location(&self) -> String { self.0.clone() }
//! }
//! impl Storage for Memory {
//!     fn location(&self) -> String { "memory".into() }
//! }
//! implements!(dyn Storage => [Disk, Memory]);
//!
//! let named = NamedServices::shared();
//! let mut services = ServiceCollection::new();
//! named
//!     .add_singleton_factory_as::<dyn Storage, _, _, _>(&mut services, "disk", |_| Disk("/var/data".into()))
//!     .unwrap();
//! named
//!     .add_singleton_instance_as::<dyn Storage, _, _>(&mut services, "cache", Arc::new(Memory))
//!     .unwrap();
//!
//! let provider = services.build();
//! let disk = named.get_required_named::<dyn Storage, _>(&provider, "Disk").unwrap();
//! assert_eq!(disk.location(), "/var/data");
//!
//! // Named registrations never answer unnamed lookups
//! assert!(provider.get::<dyn Storage>().is_err());
//! ```
//!
//! ## Native Naming
//!
//! ```rust
//! use named_di::{NamedServices, ServiceCollection};
//!
//! let named = NamedServices::shared();
//! let mut services = ServiceCollection::with_native_naming();
//! named
//!     .add_transient_factory_as::<String, String, _, _>(&mut services, "greeting", |_| "hi".to_string())
//!     .unwrap();
//!
//! let provider = services.build();
//! assert!(provider.supports_named_services());
//! assert_eq!(
//!     named.get_all_named::<String, _>(&provider, "GREETING").unwrap().len(),
//!     1
//! );
//! ```

pub mod collection;
pub mod descriptors;
pub mod error;
pub mod key;
pub mod lifetime;
pub mod lookup;
pub mod markers;
pub mod named;
pub mod provider;
pub mod traits;

mod internal;
mod registration;

pub use collection::{ContainerOptions, ServiceCollection};
pub use descriptors::{Factory, ImplementationSource, ImplementationType, Instance, ServiceDescriptor};
pub use error::{DiError, DiResult};
pub use key::{key_of_type, Key, ServiceType, TypeDefinition};
pub use lifetime::Lifetime;
pub use lookup::NamedKeyBuilder;
pub use markers::{MarkerRegistry, NameMarker};
pub use named::{NamedServiceDescriptor, NamedServiceFactory, NamedServices};
pub use provider::{ResolverContext, Scope, ServiceProvider, WeakScope, WeakServiceProvider};
pub use registration::{downcast_service, AnyArc};
pub use traits::{
    Implements, Injectable, RegistrarCore, Resolver, ResolverCore, SupportsNamedRegistration,
    SupportsNamedResolution, SupportsRequiredNamedResolution,
};
