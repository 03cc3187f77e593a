//! Named scopes for scoped-lifecycle services.

use std::collections::HashMap;
use std::sync::Arc;

use crate::container::Container;
use crate::error::DiResult;
use crate::internal::DisposeBag;
use crate::registration::{downcast, AnyArc};
use crate::traits::DependencyResolver;

/// Per-scope state owned by the container's scope registry.
#[derive(Default)]
pub(crate) struct ScopeState {
    pub(crate) instances: HashMap<String, AnyArc>,
    pub(crate) disposers: DisposeBag,
}

/// A named, disposable context in which scoped services get one instance
/// per scope.
///
/// `Scope` is a cheap handle (a container clone plus the scope name);
/// the instance cache lives in the container's scope registry, so
/// multiple handles to the same scope observe the same instances.
/// Disposing a scope runs its disposal hooks and empties its cache, but
/// leaves the scope registered for reuse.
///
/// # Examples
///
/// ```rust
/// use keyed_di::Container;
/// use std::sync::Arc;
///
/// struct RequestId(u32);
///
/// let di = Container::default();
/// di.scoped("requestId", |_| Ok(RequestId(7))).unwrap();
///
/// let a = di.create_scope("req-a").unwrap();
/// let b = di.create_scope("req-b").unwrap();
///
/// let id1 = a.resolve("requestId").unwrap();
/// let id2 = a.resolve("requestId").unwrap();
/// let id3 = b.resolve("requestId").unwrap();
///
/// assert!(Arc::ptr_eq(&id1, &id2)); // same scope, same instance
/// assert!(!Arc::ptr_eq(&id1, &id3)); // different scopes, different instances
/// ```
#[derive(Clone)]
pub struct Scope {
    container: Container,
    name: String,
}

impl std::fmt::Debug for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scope").field("name", &self.name).finish()
    }
}

impl Scope {
    pub(crate) fn new(container: Container, name: String) -> Self {
        Self { container, name }
    }

    /// The scope's unique name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resolves a service within this scope.
    pub fn resolve(&self, service: &str) -> DiResult<AnyArc> {
        self.container.resolve_in(service, Some(&self.name))
    }

    /// Resolves a service within this scope and downcasts it.
    pub fn resolve_as<T: Send + Sync + 'static>(&self, service: &str) -> DiResult<Arc<T>> {
        downcast(self.resolve(service)?, service)
    }

    /// The (name, instance) pairs currently cached in this scope,
    /// sorted by name.
    pub fn instances(&self) -> Vec<(String, AnyArc)> {
        self.container.scope_instances(&self.name)
    }

    /// Number of instances currently cached in this scope.
    pub fn instance_count(&self) -> usize {
        self.instances().len()
    }

    /// Runs every disposal hook registered in this scope (LIFO, panics
    /// contained), then clears the scope's instance cache.
    ///
    /// The scope stays registered and can be reused for new scoped
    /// resolutions; the prior instances are never returned again.
    pub fn dispose(&self) -> DiResult<()> {
        self.container.dispose_scope(&self.name)
    }
}

impl DependencyResolver for Scope {
    fn get(&self, key: &str) -> DiResult<AnyArc> {
        self.resolve(key)
    }
}
