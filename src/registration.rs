//! Service registration types.

use std::any::Any;
use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Serialize;

use crate::decoration::DecoratorSpec;
use crate::deps::Deps;
use crate::error::{DiError, DiResult};
use crate::lifecycle::Lifecycle;

/// Type-erased shared instance, the unit the container hands out.
pub type AnyArc = Arc<dyn Any + Send + Sync>;

/// Factory invoked with the dependency view as its sole argument.
pub(crate) type FactoryFn =
    Arc<dyn for<'a> Fn(&Deps<'a>) -> DiResult<AnyArc> + Send + Sync>;

/// Produces a deep copy of a registered value (transient value semantics).
pub(crate) type ClonerFn = Arc<dyn Fn() -> AnyArc + Send + Sync>;

/// What a registration executes (or returns) at instantiation time.
///
/// The kind is declared at registration time by the builder method used;
/// the container never inspects the implementation to guess.
pub(crate) enum Implementation {
    /// Invoked as `f(deps)`; the return value is the instance.
    Factory(FactoryFn),
    /// A pre-built value. `cloner` is present when the value type is
    /// `Clone` and backs deep-copy semantics for transient lifecycles;
    /// without it the original reference is returned uncopied.
    Value {
        value: AnyArc,
        cloner: Option<ClonerFn>,
    },
}

/// One service's registration record: implementation, lifecycle, tags,
/// and decorator list. Immutable once committed by the builder.
pub(crate) struct ServiceRegistration {
    pub(crate) name: String,
    pub(crate) implementation: Implementation,
    pub(crate) lifecycle: Lifecycle,
    pub(crate) tags: BTreeSet<String>,
    pub(crate) is_factory: bool,
    pub(crate) decorators: Vec<DecoratorSpec>,
}

impl ServiceRegistration {
    pub(crate) fn info(&self) -> ServiceInfo {
        ServiceInfo {
            name: self.name.clone(),
            lifecycle: self.lifecycle,
            tags: self.tags.iter().cloned().collect(),
            is_factory: self.is_factory,
        }
    }
}

/// Public registration metadata for introspection and tag discovery
///
/// Returned by discovery methods ([`Container::services_by_tags`]
/// and friends) and by [`Container::service_info`]. Holding a
/// `ServiceInfo` never forces instantiation.
///
/// [`Container::services_by_tags`]: crate::Container::services_by_tags
/// [`Container::service_info`]: crate::Container::service_info
///
/// # Examples
///
/// ```rust
/// use keyed_di::{Container, Lifecycle};
///
/// let di = Container::default();
/// di.register("mailer")
///     .factory(|_| Ok(String::from("smtp")))
///     .with_tag("outbound")
///     .as_singleton()
///     .unwrap();
///
/// let info = di.service_info("mailer").unwrap();
/// assert_eq!(info.lifecycle, Lifecycle::Singleton);
/// assert_eq!(info.tags, vec!["outbound"]);
/// assert!(info.is_factory);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceInfo {
    /// Unique service name, the only identity used for lookup
    pub name: String,
    /// Caching/sharing policy for instances
    pub lifecycle: Lifecycle,
    /// Tags carried for discovery, sorted and deduplicated
    pub tags: Vec<String>,
    /// Whether the implementation is invoked as a factory
    pub is_factory: bool,
}

/// Downcasts a resolved instance to a concrete type.
pub(crate) fn downcast<T: Send + Sync + 'static>(value: AnyArc, name: &str) -> DiResult<Arc<T>> {
    value.downcast::<T>().map_err(|_| DiError::TypeMismatch {
        name: name.to_string(),
        expected: std::any::type_name::<T>(),
    })
}
