//! Core traits for the dependency injection container.

mod activate;
mod named;
mod registrar;
mod resolver;

pub use activate::{Implements, Injectable};
pub use named::{SupportsNamedRegistration, SupportsNamedResolution, SupportsRequiredNamedResolution};
pub use registrar::RegistrarCore;
pub use resolver::{Resolver, ResolverCore};
