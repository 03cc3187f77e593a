//! The resolver capability shared by containers, scopes, and dependency views.

use std::sync::Arc;

use crate::error::DiResult;
use crate::registration::{downcast, AnyArc};

/// Read access to services by name.
///
/// Implemented by [`Container`](crate::Container),
/// [`Scope`](crate::Scope), and [`Deps`](crate::Deps). Factories take
/// the capability in constructor-argument position (as `&Deps`), so a
/// service only ever sees the keys it actually reads.
///
/// # Examples
///
/// ```rust
/// use keyed_di::{Container, DependencyResolver};
///
/// struct Greeter {
///     greeting: String,
/// }
///
/// let di = Container::default();
/// di.value("greeting", String::from("hello")).unwrap();
/// di.singleton("greeter", |deps| {
///     Ok(Greeter {
///         greeting: deps.get_as::<String>("greeting")?.as_ref().clone(),
///     })
/// })
/// .unwrap();
///
/// let greeter = di.resolve_as::<Greeter>("greeter").unwrap();
/// assert_eq!(greeter.greeting, "hello");
/// ```
pub trait DependencyResolver {
    /// Resolves the service registered under `key`.
    fn get(&self, key: &str) -> DiResult<AnyArc>;

    /// Resolves `key` and downcasts the instance to `T`.
    fn get_as<T: Send + Sync + 'static>(&self, key: &str) -> DiResult<Arc<T>>
    where
        Self: Sized,
    {
        downcast(self.get(key)?, key)
    }
}
