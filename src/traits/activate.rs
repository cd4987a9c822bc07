//! Activation traits: how implementation types are built and bound to services.

use std::sync::Arc;

use crate::error::DiResult;
use crate::provider::ResolverContext;

/// A type the container can construct on its own, pulling dependencies from
/// the resolver it is handed.
///
/// This is the activation path behind registrations made with an
/// [`ImplementationType`](crate::ImplementationType) rather than a factory or an instance.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use named_di::{DiResult, Injectable, Resolver, ResolverContext, ServiceCollection};
///
/// struct Config { url: String }
/// struct Repository { config: Arc<Config> }
///
/// impl Injectable for Repository {
///     fn activate(resolver: &ResolverContext<'_>) -> DiResult<Self> {
///         Ok(Repository { config: resolver.get::<Config>()? })
///     }
/// }
///
/// let mut services = ServiceCollection::new();
/// services.add_singleton(Config { url: "memory://".to_string() });
/// services.add_transient::<Repository, Repository>();
///
/// let provider = services.build();
/// assert_eq!(provider.get_required::<Repository>().config.url, "memory://");
/// ```
pub trait Injectable: Sized + Send + Sync + 'static {
    fn activate(resolver: &ResolverContext<'_>) -> DiResult<Self>;
}

/// Declares that `Self` can be handed out as the service `S`.
///
/// Every type implements itself. Trait-object services are declared with
/// [`implements!`](crate::implements).
///
/// This is what lets registrations check, at compile time, that an
/// implementation, factory return type or instance actually fits the service
/// type it is registered under.
pub trait Implements<S: ?Sized>: Send + Sync + 'static {
    fn upcast(self: Arc<Self>) -> Arc<S>;
}

impl<T: Send + Sync + 'static> Implements<T> for T {
    #[inline]
    fn upcast(self: Arc<Self>) -> Arc<T> {
        self
    }
}

/// Declares trait-object services implemented by concrete types.
///
/// ```rust
/// use named_di::{implements, Implements};
/// use std::sync::Arc;
///
/// trait Greeter: Send + Sync {
///     fn greet(&self) -> String;
/// }
///
/// struct English;
/// struct French;
///
/// impl Greeter for English {
///     fn greet(&self) -> String { "hello".into() }
/// }
/// impl Greeter for French {
///     fn greet(&self) -> String { "bonjour".into() }
/// }
///
/// implements!(dyn Greeter => [English, French]);
///
/// let greeter: Arc<dyn Greeter> = Arc::new(French).upcast();
/// assert_eq!(greeter.greet(), "bonjour");
/// ```
#[macro_export]
macro_rules! implements {
    ($service:ty => [$($implementation:ty),* $(,)?]) => {
        $(
            impl $crate::Implements<$service> for $implementation {
                #[inline]
                fn upcast(self: ::std::sync::Arc<Self>) -> ::std::sync::Arc<$service> {
                    self
                }
            }
        )*
    };
}
