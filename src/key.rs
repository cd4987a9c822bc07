//! Service type identities and container keys.

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::markers::NameMarker;

/// Generic-style type definitions the container can construct at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeDefinition {
    /// `Named<TService, TMarker>`: a service type paired with a name marker.
    Named,
    /// `Many<T>`: every registration of `T`, in registration order.
    Many,
}

impl TypeDefinition {
    fn display_name(self) -> &'static str {
        match self {
            TypeDefinition::Named => "Named",
            TypeDefinition::Many => "Many",
        }
    }
}

/// Identity of a service type, the unit the container keys lookups by.
///
/// Native Rust types (including `dyn Trait`) are identified by their [`TypeId`].
/// Two more shapes exist so the container can be handed compound keys without
/// knowing anything about names:
///
/// - [`ServiceType::Marker`] wraps a synthesized [`NameMarker`];
/// - [`ServiceType::Constructed`] applies a [`TypeDefinition`] to type arguments,
///   the way `Named<dyn Greeter, marker("english")>` would read in source.
///
/// # Examples
///
/// ```rust
/// use named_di::ServiceType;
///
/// trait Greeter: Send + Sync {}
///
/// let a = ServiceType::of::<dyn Greeter>();
/// let b = ServiceType::of::<dyn Greeter>();
/// assert_eq!(a, b);
/// assert!(a.is_native());
/// assert_ne!(a, ServiceType::of::<String>());
/// ```
#[derive(Clone)]
pub enum ServiceType {
    /// A Rust type with its `type_name` kept for diagnostics.
    Native(TypeId, &'static str),
    /// A synthesized name marker.
    Marker(NameMarker),
    /// A generic-style type built from other service types.
    Constructed(TypeDefinition, Arc<[ServiceType]>),
}

impl ServiceType {
    /// Identity of `T`.
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        ServiceType::Native(TypeId::of::<T>(), std::any::type_name::<T>())
    }

    /// Builds `definition<arguments...>`.
    pub fn construct(definition: TypeDefinition, arguments: impl Into<Arc<[ServiceType]>>) -> Self {
        ServiceType::Constructed(definition, arguments.into())
    }

    /// Whether this is a real Rust type rather than a synthesized one.
    pub fn is_native(&self) -> bool {
        matches!(self, ServiceType::Native(..))
    }

    /// The `TypeId` of a native type.
    pub fn type_id(&self) -> Option<TypeId> {
        match self {
            ServiceType::Native(id, _) => Some(*id),
            _ => None,
        }
    }

    /// Type arguments of a constructed type, empty otherwise.
    pub fn arguments(&self) -> &[ServiceType] {
        match self {
            ServiceType::Constructed(_, args) => args,
            _ => &[],
        }
    }

    /// The definition of a constructed type.
    pub fn definition(&self) -> Option<TypeDefinition> {
        match self {
            ServiceType::Constructed(definition, _) => Some(*definition),
            _ => None,
        }
    }
}

impl PartialEq for ServiceType {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            // Names are diagnostics only
            (ServiceType::Native(a, _), ServiceType::Native(b, _)) => a == b,
            (ServiceType::Marker(a), ServiceType::Marker(b)) => a == b,
            (ServiceType::Constructed(da, aa), ServiceType::Constructed(db, ab)) => da == db && aa == ab,
            _ => false,
        }
    }
}

impl Eq for ServiceType {}

impl Hash for ServiceType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            ServiceType::Native(id, _) => {
                0u8.hash(state);
                id.hash(state);
            }
            ServiceType::Marker(marker) => {
                1u8.hash(state);
                marker.hash(state);
            }
            ServiceType::Constructed(definition, args) => {
                2u8.hash(state);
                definition.hash(state);
                args.hash(state);
            }
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceType::Native(_, name) => f.write_str(name),
            ServiceType::Marker(marker) => write!(f, "{:?}", marker.name()),
            ServiceType::Constructed(definition, args) => {
                write!(f, "{}<", definition.display_name())?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                f.write_str(">")
            }
        }
    }
}

impl fmt::Debug for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ServiceType({})", self)
    }
}

/// Key for registration storage and lookup.
///
/// `Type` is the only key a plain container understands. `Named` is used by
/// containers built with native naming support, where the name is stored
/// case-folded next to the service type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    /// Registration keyed by service type alone.
    Type(ServiceType),
    /// Registration keyed by service type and case-folded service name.
    Named(ServiceType, Arc<str>),
}

impl Key {
    /// Named key for `service_type`, folding `name` to its case-insensitive form.
    pub fn named(service_type: ServiceType, name: &str) -> Self {
        Key::Named(service_type, Arc::from(fold_name(name)))
    }

    /// The service type part of the key.
    pub fn service_type(&self) -> &ServiceType {
        match self {
            Key::Type(service_type) | Key::Named(service_type, _) => service_type,
        }
    }

    /// The service name for named keys, or `None` for unnamed ones.
    ///
    /// ```rust
    /// use named_di::{Key, ServiceType};
    ///
    /// let unnamed = Key::Type(ServiceType::of::<u32>());
    /// assert_eq!(unnamed.service_name(), None);
    ///
    /// let named = Key::named(ServiceType::of::<u32>(), "Database_Port");
    /// assert_eq!(named.service_name(), Some("database_port"));
    /// ```
    pub fn service_name(&self) -> Option<&str> {
        match self {
            Key::Type(_) => None,
            Key::Named(_, name) => Some(name),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Type(service_type) => write!(f, "{}", service_type),
            Key::Named(service_type, name) => write!(f, "{} ({:?})", service_type, name),
        }
    }
}

/// Case-insensitive form of a service name.
pub(crate) fn fold_name(name: &str) -> String {
    name.to_lowercase()
}

// Helper function for creating type keys
#[inline(always)]
pub fn key_of_type<T: ?Sized + 'static>() -> Key {
    Key::Type(ServiceType::of::<T>())
}
