//! Fluent registration builder.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::container::Container;
use crate::decoration::{Decorator, DecoratorSpec};
use crate::deps::Deps;
use crate::error::{DiError, DiResult};
use crate::lifecycle::Lifecycle;
use crate::registration::{AnyArc, ClonerFn, Implementation, ServiceRegistration};

/// Fluent configuration for one service, returned by
/// [`Container::register`].
///
/// Nothing is visible to lookup or discovery until a terminal lifecycle
/// method ([`as_singleton`](Self::as_singleton),
/// [`as_transient`](Self::as_transient), [`as_scoped`](Self::as_scoped),
/// [`as_value`](Self::as_value)) commits the registration; a builder
/// dropped without a terminal call is a no-op.
///
/// # Examples
///
/// ```rust
/// use keyed_di::{Container, DependencyResolver};
///
/// struct Repo {
///     dsn: String,
/// }
///
/// let di = Container::default();
/// di.value("dsn", String::from("postgres://localhost")).unwrap();
/// di.register("repo")
///     .factory(|deps| {
///         Ok(Repo {
///             dsn: deps.get_as::<String>("dsn")?.as_ref().clone(),
///         })
///     })
///     .with_tag("storage")
///     .as_singleton()
///     .unwrap();
///
/// assert!(di.has("repo"));
/// ```
#[must_use = "a registration is not committed until a terminal lifecycle method is called"]
pub struct ServiceBuilder<'c> {
    container: &'c Container,
    name: String,
    implementation: Option<Implementation>,
    is_factory: bool,
    tags: BTreeSet<String>,
    override_existing: bool,
    condition: Option<Box<dyn Fn(&Container) -> bool + 'c>>,
    decorators: Vec<DecoratorSpec>,
}

impl<'c> ServiceBuilder<'c> {
    pub(crate) fn new(container: &'c Container, name: String) -> Self {
        Self {
            container,
            name,
            implementation: None,
            is_factory: false,
            tags: BTreeSet::new(),
            override_existing: false,
            condition: None,
            decorators: Vec::new(),
        }
    }

    /// Sets a typed factory; the return value becomes the instance.
    pub fn factory<T, F>(mut self, f: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(&Deps<'_>) -> DiResult<T> + Send + Sync + 'static,
    {
        self.implementation = Some(Implementation::Factory(Arc::new(move |deps| {
            f(deps).map(|v| Arc::new(v) as AnyArc)
        })));
        self.is_factory = true;
        self
    }

    /// Sets a factory that already produces an `Arc`.
    ///
    /// Use this when the factory needs to keep a handle to the instance
    /// it returns, e.g. to register a disposer on it.
    pub fn factory_arc<T, F>(mut self, f: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(&Deps<'_>) -> DiResult<Arc<T>> + Send + Sync + 'static,
    {
        self.implementation = Some(Implementation::Factory(Arc::new(move |deps| {
            f(deps).map(|v| v as AnyArc)
        })));
        self.is_factory = true;
        self
    }

    /// Sets a plain value implementation.
    ///
    /// The `Clone` bound backs deep-copy semantics when the registration
    /// is committed as transient; other lifecycles hand back the same
    /// reference.
    pub fn value<T>(mut self, value: T) -> Self
    where
        T: Clone + Send + Sync + 'static,
    {
        let shared = Arc::new(value);
        let source = shared.clone();
        let cloner: ClonerFn = Arc::new(move || Arc::new((*source).clone()) as AnyArc);
        self.implementation = Some(Implementation::Value {
            value: shared as AnyArc,
            cloner: Some(cloner),
        });
        self.is_factory = false;
        self
    }

    /// Sets a pre-built shared value without a `Clone` bound.
    ///
    /// A transient registration of such a value returns the original
    /// reference uncopied, since no copy can be made.
    pub fn value_arc<T>(mut self, value: Arc<T>) -> Self
    where
        T: Send + Sync + 'static,
    {
        self.implementation = Some(Implementation::Value {
            value: value as AnyArc,
            cloner: None,
        });
        self.is_factory = false;
        self
    }

    /// Adds one discovery tag. Duplicates are collapsed.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    /// Adds several discovery tags.
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Guards the registration: if the predicate returns false at commit
    /// time, the commit is a successful no-op.
    pub fn when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Container) -> bool + 'c,
    {
        self.condition = Some(Box::new(predicate));
        self
    }

    /// Permits replacing an existing registration even under strict mode.
    /// Replacement purges any cached instances of the old registration.
    pub fn override_existing(mut self) -> Self {
        self.override_existing = true;
        self
    }

    /// Appends named decorator services, applied in order after
    /// construction. The names are looked up at resolution time.
    pub fn decorate_with<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.decorators
            .extend(names.into_iter().map(|n| DecoratorSpec::Named(n.into())));
        self
    }

    /// Appends an inline decorator function.
    pub fn decorate<F>(mut self, f: F) -> Self
    where
        F: Fn(AnyArc, &Deps<'_>) -> DiResult<AnyArc> + Send + Sync + 'static,
    {
        self.decorators
            .push(DecoratorSpec::Inline(Decorator::from_fn(f)));
        self
    }

    /// Commits as a singleton: one cached instance per container.
    pub fn as_singleton(self) -> DiResult<()> {
        self.commit(Lifecycle::Singleton)
    }

    /// Commits as transient: a fresh instance per resolution.
    pub fn as_transient(self) -> DiResult<()> {
        self.commit(Lifecycle::Transient)
    }

    /// Commits as scoped: one instance per (service, scope) pair.
    pub fn as_scoped(self) -> DiResult<()> {
        self.commit(Lifecycle::Scoped)
    }

    /// Commits as a value: the registered value itself, by reference.
    pub fn as_value(self) -> DiResult<()> {
        if !matches!(self.implementation, Some(Implementation::Value { .. })) {
            return Err(DiError::InvalidArgument(format!(
                "as_value for '{}' requires a value implementation",
                self.name
            )));
        }
        self.commit(Lifecycle::Value)
    }

    fn commit(self, lifecycle: Lifecycle) -> DiResult<()> {
        if self.name.is_empty() {
            return Err(DiError::InvalidArgument(
                "service name must not be empty".to_string(),
            ));
        }
        if self.tags.iter().any(|t| t.is_empty()) {
            return Err(DiError::InvalidArgument(format!(
                "empty tag on registration '{}'",
                self.name
            )));
        }
        let implementation = self.implementation.ok_or_else(|| {
            DiError::InvalidArgument(format!(
                "registration '{}' has no implementation; call factory(), value(), or value_arc()",
                self.name
            ))
        })?;

        if let Some(condition) = &self.condition {
            if !condition(self.container) {
                tracing::debug!(service = %self.name, "conditional registration skipped");
                return Ok(());
            }
        }

        self.container.install(
            ServiceRegistration {
                name: self.name,
                implementation,
                lifecycle,
                tags: self.tags,
                is_factory: self.is_factory,
                decorators: self.decorators,
            },
            self.override_existing,
        )
    }
}

/// Derives a service name from a type: the lowerCamelCase form of the
/// type's short name (`UserService` becomes `userService`).
///
/// Fails when the type has no usable name, e.g. closures.
pub(crate) fn infer_service_name<T: 'static>() -> DiResult<String> {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    let short = base.rsplit("::").next().unwrap_or(base);

    let mut chars = short.chars();
    let usable = match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            let mut name = first.to_ascii_lowercase().to_string();
            name.extend(chars);
            name.chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
                .then_some(name)
        }
        _ => None,
    };

    usable.ok_or_else(|| {
        DiError::InvalidArgument(format!("cannot infer a service name from type '{}'", full))
    })
}
