//! Error types for named service registration and resolution.

use thiserror::Error;

/// Dependency injection errors.
///
/// # Examples
///
/// ```rust
/// use named_di::{DiError, ServiceCollection, Resolver};
///
/// let provider = ServiceCollection::new().build();
/// match provider.get::<String>() {
///     Err(DiError::NotFound { service, name: None }) => {
///         assert_eq!(service, "alloc::string::String");
///     }
///     _ => unreachable!(),
/// }
/// ```
///
/// ```rust
/// use named_di::DiError;
///
/// let missing = DiError::NotFound {
///     service: "app::Greeter".to_string(),
///     name: Some("english".to_string()),
/// };
/// assert_eq!(
///     missing.to_string(),
///     "No service of type 'app::Greeter' with the name 'english' was found."
/// );
/// ```
#[derive(Debug, Clone, Error)]
pub enum DiError {
    /// A required argument was missing, empty or malformed. Holds the parameter name.
    #[error("Invalid argument: {0}")]
    InvalidArgument(&'static str),
    /// No registration matched the request
    #[error("{}", not_found_message(.service, .name.as_deref()))]
    NotFound {
        service: String,
        name: Option<String>,
    },
    /// Type downcast failed
    #[error("Type mismatch for: {0}")]
    TypeMismatch(String),
    /// Circular dependency detected (includes path)
    #[error("Circular dependency: {}", .0.join(" -> "))]
    Circular(Vec<String>),
    /// Invalid lifetime resolution (e.g., scoped from root)
    #[error("Lifetime error: {0}")]
    WrongLifetime(&'static str),
    /// Maximum recursion depth exceeded
    #[error("Max depth {0} exceeded")]
    DepthExceeded(usize),
    /// An internal invariant was violated
    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl DiError {
    pub(crate) fn not_found(service: impl ToString) -> Self {
        DiError::NotFound {
            service: service.to_string(),
            name: None,
        }
    }

    pub(crate) fn named_not_found(service: impl ToString, name: &str) -> Self {
        DiError::NotFound {
            service: service.to_string(),
            name: Some(name.to_string()),
        }
    }

    /// Whether this is a [`DiError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, DiError::NotFound { .. })
    }
}

fn not_found_message(service: &str, name: Option<&str>) -> String {
    match name {
        Some(name) => format!("No service of type '{}' with the name '{}' was found.", service, name),
        None => format!("Service not found: {}", service),
    }
}

/// Result type for DI operations
pub type DiResult<T> = Result<T, DiError>;
