//! The dependency view handed to every factory.

use std::sync::Arc;

use crate::container::Container;
use crate::error::{DiError, DiResult};
use crate::registration::AnyArc;
use crate::traits::{DependencyResolver, Dispose};

/// Keys that could be used to reach into an object model's prototype
/// chain or constructor in the systems this container is ported against.
/// They are rejected before any registry lookup so the list stays
/// independent of what happens to be registered.
pub(crate) const DENYLIST: &[&str] = &[
    "constructor",
    "prototype",
    "__proto__",
    "__defineGetter__",
    "__defineSetter__",
    "__lookupGetter__",
    "__lookupSetter__",
];

/// Read-only keyed view over the container, passed as the sole argument
/// to every factory and decorator.
///
/// Reading a key resolves that service (recursively, depth-first, in the
/// order keys are accessed) within the scope the current resolution is
/// bound to. Reading a reserved key fails with
/// [`DiError::DangerousAccess`]; there is deliberately no way to write
/// through this view.
///
/// # Examples
///
/// ```rust
/// use keyed_di::{Container, DependencyResolver};
///
/// struct Api {
///     base_url: String,
/// }
///
/// let di = Container::default();
/// di.value("baseUrl", String::from("https://api.local")).unwrap();
/// di.singleton("api", |deps| {
///     Ok(Api {
///         base_url: deps.get_as::<String>("baseUrl")?.as_ref().clone(),
///     })
/// })
/// .unwrap();
///
/// let api = di.resolve_as::<Api>("api").unwrap();
/// assert_eq!(api.base_url, "https://api.local");
/// ```
pub struct Deps<'a> {
    container: &'a Container,
    scope: Option<&'a str>,
}

impl<'a> Deps<'a> {
    pub(crate) fn new(container: &'a Container, scope: Option<&'a str>) -> Self {
        Self { container, scope }
    }

    /// The scope this resolution is bound to, if any.
    pub fn scope_name(&self) -> Option<&str> {
        self.scope
    }

    /// All currently registered service names, sorted.
    ///
    /// Supports introspection and "resolve what exists" patterns without
    /// touching any instance.
    pub fn keys(&self) -> Vec<String> {
        self.container.service_names()
    }

    /// Registers a disposal hook on the current scope's bag (or the
    /// container's root bag when this resolution is unscoped).
    ///
    /// The usual pattern is to build the instance as an `Arc`, register
    /// a clone here, and return the `Arc` from a
    /// [`factory_arc`](crate::ServiceBuilder::factory_arc) factory.
    pub fn on_dispose<T: Dispose>(&self, service: Arc<T>) {
        self.container
            .push_disposer(self.scope, Box::new(move || service.dispose()));
    }
}

impl DependencyResolver for Deps<'_> {
    fn get(&self, key: &str) -> DiResult<AnyArc> {
        if DENYLIST.contains(&key) {
            return Err(DiError::DangerousAccess(key.to_string()));
        }
        self.container.resolve_in(key, self.scope)
    }
}
