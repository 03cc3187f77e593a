//! Error types for the dependency injection container.

use std::fmt;

/// Dependency injection errors
///
/// Represents the error conditions that can occur during service
/// registration, resolution, scope management, or container operations.
///
/// Every variant renders a human-readable message naming the failing
/// service or condition; tests are allowed to assert on message
/// substrings (e.g. "not found", "Circular dependency detected",
/// "already registered").
///
/// # Examples
///
/// ```rust
/// use keyed_di::{Container, DiError};
///
/// let di = Container::default();
/// match di.resolve("database") {
///     Err(DiError::NotFound { name, .. }) => assert_eq!(name, "database"),
///     _ => unreachable!(),
/// }
/// ```
#[derive(Debug, Clone)]
pub enum DiError {
    /// Service not registered under the requested name
    NotFound {
        /// The name that failed to resolve
        name: String,
        /// A registered name that matches case-insensitively, if any
        suggestion: Option<String>,
    },
    /// Duplicate registration rejected under strict mode
    AlreadyRegistered(String),
    /// Circular dependency detected (includes the full cycle)
    Circular(Vec<String>),
    /// Malformed input to a public method
    InvalidArgument(String),
    /// A reserved/unsafe key was read off a dependency view
    DangerousAccess(String),
    /// A configured maximum was reached
    ResourceLimit {
        /// What ran out (services, scopes, hooks, ...)
        what: &'static str,
        /// The configured cap
        limit: usize,
    },
    /// Operating on a scope name that was never created
    ScopeNotFound(String),
    /// A decorator is missing, untyped, or broke its contract
    DecoratorContract(String),
    /// Typed downcast of a resolved instance failed
    TypeMismatch {
        /// Service whose instance had an unexpected type
        name: String,
        /// The type the caller asked for
        expected: &'static str,
    },
}

impl fmt::Display for DiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiError::NotFound { name, suggestion } => {
                write!(f, "Service '{}' not found", name)?;
                if let Some(s) = suggestion {
                    write!(f, ". Did you mean '{}'?", s)?;
                }
                Ok(())
            }
            DiError::AlreadyRegistered(name) => {
                write!(f, "Service '{}' is already registered", name)
            }
            DiError::Circular(cycle) => {
                write!(f, "Circular dependency detected: {}", cycle.join(" -> "))
            }
            DiError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            DiError::DangerousAccess(key) => {
                write!(f, "Dangerous property access: '{}'", key)
            }
            DiError::ResourceLimit { what, limit } => {
                write!(f, "Resource limit exceeded: {} (max {})", what, limit)
            }
            DiError::ScopeNotFound(name) => write!(f, "Scope '{}' not found", name),
            DiError::DecoratorContract(msg) => {
                write!(f, "Decorator contract violation: {}", msg)
            }
            DiError::TypeMismatch { name, expected } => {
                write!(f, "Type mismatch for service '{}': expected {}", name, expected)
            }
        }
    }
}

impl std::error::Error for DiError {}

/// Result type for DI operations
///
/// A convenience alias for `Result<T, DiError>` used throughout keyed-di.
pub type DiResult<T> = Result<T, DiError>;
