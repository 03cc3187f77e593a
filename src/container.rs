//! The container: registry, caches, scopes, hooks, and the resolution
//! engine.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, RwLock};

use serde::Serialize;

use crate::builder::{infer_service_name, ServiceBuilder};
use crate::decoration::{Decorate, Decorator, DecoratorSpec};
use crate::deps::Deps;
use crate::error::{DiError, DiResult};
use crate::hooks::{self, HookContext, HookEvent, Hooks};
use crate::internal::{DisposeBag, StackGuard};
use crate::lifecycle::Lifecycle;
use crate::options::ContainerOptions;
use crate::registration::{downcast, AnyArc, Implementation, ServiceInfo, ServiceRegistration};
use crate::scope::{Scope, ScopeState};
use crate::traits::DependencyResolver;

/// A name-keyed dependency injection container.
///
/// Owns the service registry, the singleton cache, the scope registry,
/// and the hook lists. `Container` is a cheap-clone handle (`Arc`
/// internally); clones share all state. Each container instance is
/// fully independent; there is no process-wide registry.
///
/// # Examples
///
/// ```rust
/// use keyed_di::{Container, DependencyResolver};
/// use std::sync::Arc;
///
/// #[derive(Clone)]
/// struct Config {
///     env: String,
/// }
///
/// struct Logger {
///     prefix: String,
/// }
///
/// let di = Container::default();
/// di.value("config", Config { env: "dev".into() }).unwrap();
/// di.singleton("logger", |deps| {
///     let config = deps.get_as::<Config>("config")?;
///     Ok(Logger {
///         prefix: format!("[{}]", config.env),
///     })
/// })
/// .unwrap();
///
/// let first = di.resolve_as::<Logger>("logger").unwrap();
/// let second = di.resolve_as::<Logger>("logger").unwrap();
/// assert!(Arc::ptr_eq(&first, &second));
/// assert_eq!(first.prefix, "[dev]");
/// ```
pub struct Container {
    inner: Arc<ContainerInner>,
}

struct ContainerInner {
    options: ContainerOptions,
    registry: RwLock<HashMap<String, Arc<ServiceRegistration>>>,
    singletons: Mutex<HashMap<String, AnyArc>>,
    scopes: Mutex<HashMap<String, ScopeState>>,
    hooks: Mutex<Hooks>,
    root_disposers: Mutex<DisposeBag>,
}

impl Container {
    /// Creates a container with the given options.
    pub fn new(options: ContainerOptions) -> Self {
        Self {
            inner: Arc::new(ContainerInner {
                options,
                registry: RwLock::new(HashMap::new()),
                singletons: Mutex::new(HashMap::new()),
                scopes: Mutex::new(HashMap::new()),
                hooks: Mutex::new(Hooks::default()),
                root_disposers: Mutex::new(DisposeBag::default()),
            }),
        }
    }

    /// The options this container was created with.
    pub fn options(&self) -> &ContainerOptions {
        &self.inner.options
    }

    // ----- registration -----

    /// Starts a registration under an explicit name.
    ///
    /// The registry is untouched until a terminal lifecycle method on
    /// the returned builder commits it.
    pub fn register(&self, name: impl Into<String>) -> ServiceBuilder<'_> {
        ServiceBuilder::new(self, name.into())
    }

    /// Starts a registration named after the type: the lowerCamelCase
    /// form of `T`'s short name (`UserService` becomes `"userService"`).
    ///
    /// Fails when no name can be inferred (e.g. closures).
    pub fn register_type<T: 'static>(&self) -> DiResult<ServiceBuilder<'_>> {
        Ok(self.register(infer_service_name::<T>()?))
    }

    /// Registers a plain value under `name` with value lifecycle:
    /// every resolve returns the exact registered reference.
    pub fn value<T>(&self, name: impl Into<String>, value: T) -> DiResult<()>
    where
        T: Clone + Send + Sync + 'static,
    {
        self.register(name).value(value).as_value()
    }

    /// Registers a pre-built shared value without a `Clone` bound.
    pub fn value_arc<T>(&self, name: impl Into<String>, value: Arc<T>) -> DiResult<()>
    where
        T: Send + Sync + 'static,
    {
        self.register(name).value_arc(value).as_value()
    }

    /// Registers a value named after its type (see
    /// [`register_type`](Self::register_type)).
    pub fn value_of<T>(&self, value: T) -> DiResult<()>
    where
        T: Clone + Send + Sync + 'static,
    {
        self.register_type::<T>()?.value(value).as_value()
    }

    /// Registers a transient factory: invoked afresh on every resolve.
    pub fn factory<T, F>(&self, name: impl Into<String>, f: F) -> DiResult<()>
    where
        T: Send + Sync + 'static,
        F: Fn(&Deps<'_>) -> DiResult<T> + Send + Sync + 'static,
    {
        self.register(name).factory(f).as_transient()
    }

    /// Registers a singleton factory.
    pub fn singleton<T, F>(&self, name: impl Into<String>, f: F) -> DiResult<()>
    where
        T: Send + Sync + 'static,
        F: Fn(&Deps<'_>) -> DiResult<T> + Send + Sync + 'static,
    {
        self.register(name).factory(f).as_singleton()
    }

    /// Registers a transient factory (alias of [`factory`](Self::factory)
    /// for symmetry with [`singleton`](Self::singleton)).
    pub fn transient<T, F>(&self, name: impl Into<String>, f: F) -> DiResult<()>
    where
        T: Send + Sync + 'static,
        F: Fn(&Deps<'_>) -> DiResult<T> + Send + Sync + 'static,
    {
        self.register(name).factory(f).as_transient()
    }

    /// Registers a scoped factory: one instance per scope it is
    /// resolved through.
    pub fn scoped<T, F>(&self, name: impl Into<String>, f: F) -> DiResult<()>
    where
        T: Send + Sync + 'static,
        F: Fn(&Deps<'_>) -> DiResult<T> + Send + Sync + 'static,
    {
        self.register(name).factory(f).as_scoped()
    }

    /// Registers a decorator service usable from
    /// [`decorate_with`](crate::ServiceBuilder::decorate_with).
    pub fn decorator(&self, name: impl Into<String>, decorate: impl Decorate) -> DiResult<()> {
        self.value(name, Decorator::new(decorate))
    }

    /// Installs a committed registration. Called by the builder.
    pub(crate) fn install(
        &self,
        registration: ServiceRegistration,
        override_existing: bool,
    ) -> DiResult<()> {
        let name = registration.name.clone();
        let replaced = {
            let mut registry = self.inner.registry.write().unwrap();
            let exists = registry.contains_key(&name);
            if exists {
                let allowed = override_existing
                    || self.inner.options.allow_overrides
                    || !self.inner.options.strict_mode;
                if !allowed {
                    return Err(DiError::AlreadyRegistered(name));
                }
            } else if registry.len() >= self.inner.options.max_services {
                return Err(DiError::ResourceLimit {
                    what: "registered services",
                    limit: self.inner.options.max_services,
                });
            }
            registry.insert(name.clone(), Arc::new(registration));
            exists
        };

        if replaced {
            // Stale instances from the old registration must never be
            // observed again.
            self.purge_cached(&name);
        }
        if self.inner.options.verbose {
            tracing::debug!(service = %name, replaced, "service registered");
        }
        Ok(())
    }

    // ----- resolution -----

    /// Resolves a service by name, outside any scope.
    pub fn resolve(&self, name: &str) -> DiResult<AnyArc> {
        self.resolve_in(name, None)
    }

    /// Resolves a service by name and downcasts the instance.
    pub fn resolve_as<T: Send + Sync + 'static>(&self, name: &str) -> DiResult<Arc<T>> {
        downcast(self.resolve(name)?, name)
    }

    /// Resolves several services in order; fails on the first error.
    pub fn resolve_all(&self, names: &[&str], scope: Option<&str>) -> DiResult<Vec<AnyArc>> {
        names.iter().map(|n| self.resolve_in(n, scope)).collect()
    }

    /// Returns a standalone resolver closure for one service.
    pub fn get_resolver(&self, name: &str) -> impl Fn() -> DiResult<AnyArc> + Send + Sync {
        let container = self.clone();
        let name = name.to_string();
        move || container.resolve(&name)
    }

    /// Resolves a service, optionally within a named scope.
    ///
    /// Cached singleton and scoped instances are returned directly,
    /// skipping the resolution stack and the creation hooks. Resolving
    /// a scoped service with no scope builds a fresh instance that is
    /// cached nowhere.
    pub fn resolve_in(&self, name: &str, scope: Option<&str>) -> DiResult<AnyArc> {
        if name.is_empty() {
            return Err(DiError::InvalidArgument(
                "service name must not be empty".to_string(),
            ));
        }

        self.fire_hooks(HookEvent::BeforeResolve, name, scope, None, None);

        let registration = {
            let registry = self.inner.registry.read().unwrap();
            match registry.get(name) {
                Some(reg) => reg.clone(),
                None => return Err(not_found(name, registry.keys())),
            }
        };

        if let Some(scope_name) = scope {
            let scopes = self.inner.scopes.lock().unwrap();
            let state = scopes
                .get(scope_name)
                .ok_or_else(|| DiError::ScopeNotFound(scope_name.to_string()))?;
            if let Some(cached) = state.instances.get(name) {
                return Ok(cached.clone());
            }
        }

        if registration.lifecycle == Lifecycle::Singleton {
            if let Some(cached) = self.inner.singletons.lock().unwrap().get(name) {
                return Ok(cached.clone());
            }
        }

        let guard = StackGuard::enter(name)?;
        let instance = self.create_instance(&registration, scope)?;

        match registration.lifecycle {
            Lifecycle::Singleton => {
                let mut cache = self.inner.singletons.lock().unwrap();
                if !cache.contains_key(name) && cache.len() >= self.inner.options.max_instances {
                    return Err(DiError::ResourceLimit {
                        what: "cached singleton instances",
                        limit: self.inner.options.max_instances,
                    });
                }
                cache.insert(name.to_string(), instance.clone());
            }
            Lifecycle::Scoped => {
                if let Some(scope_name) = scope {
                    let mut scopes = self.inner.scopes.lock().unwrap();
                    if let Some(state) = scopes.get_mut(scope_name) {
                        state.instances.insert(name.to_string(), instance.clone());
                    }
                }
            }
            Lifecycle::Transient | Lifecycle::Value => {}
        }
        drop(guard);

        self.fire_hooks(
            HookEvent::AfterResolve,
            name,
            scope,
            Some(registration.lifecycle),
            Some(&instance),
        );
        if self.inner.options.verbose {
            tracing::debug!(service = %name, scope = ?scope, lifecycle = %registration.lifecycle, "service resolved");
        }
        Ok(instance)
    }

    fn create_instance(
        &self,
        registration: &ServiceRegistration,
        scope: Option<&str>,
    ) -> DiResult<AnyArc> {
        self.fire_hooks(
            HookEvent::BeforeCreate,
            &registration.name,
            scope,
            Some(registration.lifecycle),
            None,
        );

        let deps = Deps::new(self, scope);
        let base = match &registration.implementation {
            Implementation::Factory(f) => f(&deps)?,
            Implementation::Value { value, cloner } => {
                match (registration.lifecycle, cloner) {
                    // Deep copy so mutations by one consumer never leak
                    // to another transient consumer.
                    (Lifecycle::Transient, Some(cloner)) => cloner(),
                    _ => value.clone(),
                }
            }
        };

        let instance = if registration.decorators.is_empty() {
            base
        } else {
            self.apply_decorators(registration, base, &deps)?
        };

        self.fire_hooks(
            HookEvent::AfterCreate,
            &registration.name,
            scope,
            Some(registration.lifecycle),
            Some(&instance),
        );
        Ok(instance)
    }

    fn apply_decorators(
        &self,
        registration: &ServiceRegistration,
        base: AnyArc,
        deps: &Deps<'_>,
    ) -> DiResult<AnyArc> {
        let mut current = base;
        for spec in &registration.decorators {
            let decorator = match spec {
                DecoratorSpec::Named(decorator_name) => {
                    let resolved = self
                        .resolve_in(decorator_name, deps.scope_name())
                        .map_err(|e| match e {
                            DiError::NotFound { .. } => DiError::DecoratorContract(format!(
                                "decorator '{}' for service '{}' is not registered",
                                decorator_name, registration.name
                            )),
                            other => other,
                        })?;
                    match resolved.downcast::<Decorator>() {
                        Ok(d) => (*d).clone(),
                        Err(_) => {
                            return Err(DiError::DecoratorContract(format!(
                                "service '{}' named as a decorator for '{}' has no decorate operation",
                                decorator_name, registration.name
                            )))
                        }
                    }
                }
                DecoratorSpec::Inline(d) => d.clone(),
            };

            let type_before = current.as_ref().type_id();
            let decorated = decorator.apply(current, deps)?;
            if decorated.as_ref().type_id() != type_before {
                return Err(DiError::DecoratorContract(format!(
                    "decorator '{}' for service '{}' returned a value of a different type",
                    spec.label(),
                    registration.name
                )));
            }
            current = decorated;
        }
        Ok(current)
    }

    // ----- introspection & mutation -----

    /// Whether a service is registered under `name`.
    pub fn has(&self, name: &str) -> bool {
        self.inner.registry.read().unwrap().contains_key(name)
    }

    /// All registered service names, sorted.
    pub fn service_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.inner.registry.read().unwrap().keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of registered services.
    pub fn len(&self) -> usize {
        self.inner.registry.read().unwrap().len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Registration metadata for one service, if registered.
    pub fn service_info(&self, name: &str) -> Option<ServiceInfo> {
        self.inner
            .registry
            .read()
            .unwrap()
            .get(name)
            .map(|reg| reg.info())
    }

    pub(crate) fn registrations(&self) -> Vec<Arc<ServiceRegistration>> {
        self.inner.registry.read().unwrap().values().cloned().collect()
    }

    /// Removes a registration and purges any cached instances of it.
    pub fn unregister(&self, name: &str) -> DiResult<()> {
        {
            let mut registry = self.inner.registry.write().unwrap();
            if registry.remove(name).is_none() {
                return Err(not_found(name, registry.keys()));
            }
        }
        self.purge_cached(name);
        if self.inner.options.verbose {
            tracing::debug!(service = %name, "service unregistered");
        }
        Ok(())
    }

    /// Removes every registration and every cached instance. Scopes stay
    /// registered but lose their instances; pending disposal hooks are
    /// dropped without running.
    pub fn clear(&self) {
        self.inner.registry.write().unwrap().clear();
        self.inner.singletons.lock().unwrap().clear();
        let mut scopes = self.inner.scopes.lock().unwrap();
        for state in scopes.values_mut() {
            *state = ScopeState::default();
        }
    }

    fn purge_cached(&self, name: &str) {
        self.inner.singletons.lock().unwrap().remove(name);
        let mut scopes = self.inner.scopes.lock().unwrap();
        for state in scopes.values_mut() {
            state.instances.remove(name);
        }
    }

    // ----- hooks -----

    /// Adds a hook callback for one event.
    ///
    /// Callbacks run synchronously in registration order; a panicking
    /// callback is caught and reported, never propagated.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use keyed_di::{Container, HookEvent};
    /// use std::sync::{Arc, Mutex};
    ///
    /// let di = Container::default();
    /// let seen = Arc::new(Mutex::new(Vec::new()));
    /// let sink = seen.clone();
    /// di.hook(HookEvent::AfterResolve, move |ctx| {
    ///     sink.lock().unwrap().push(ctx.service.clone());
    /// })
    /// .unwrap();
    ///
    /// di.singleton("clock", |_| Ok(0u64)).unwrap();
    /// di.resolve("clock").unwrap();
    /// assert_eq!(*seen.lock().unwrap(), vec!["clock"]);
    /// ```
    pub fn hook<F>(&self, event: HookEvent, callback: F) -> DiResult<()>
    where
        F: Fn(&HookContext) + Send + Sync + 'static,
    {
        let mut hooks = self.inner.hooks.lock().unwrap();
        let list = hooks.list_mut(event);
        if list.len() >= self.inner.options.max_hooks_per_event {
            return Err(DiError::ResourceLimit {
                what: "hooks per event",
                limit: self.inner.options.max_hooks_per_event,
            });
        }
        list.push(Arc::new(callback));
        Ok(())
    }

    /// Removes every callback for one event.
    pub fn clear_hooks(&self, event: HookEvent) {
        self.inner.hooks.lock().unwrap().list_mut(event).clear();
    }

    fn fire_hooks(
        &self,
        event: HookEvent,
        service: &str,
        scope: Option<&str>,
        lifecycle: Option<Lifecycle>,
        instance: Option<&AnyArc>,
    ) {
        let callbacks = {
            let hooks = self.inner.hooks.lock().unwrap();
            let list = hooks.list(event);
            if list.is_empty() {
                return;
            }
            list.to_vec()
        };
        let ctx = HookContext {
            event,
            service: service.to_string(),
            scope: scope.map(String::from),
            lifecycle,
            instance: instance.cloned(),
        };
        hooks::fire(&callbacks, &ctx);
    }

    // ----- scopes -----

    /// Creates a named scope. Fails if the name is already in use or the
    /// scope cap is reached.
    pub fn create_scope(&self, name: &str) -> DiResult<Scope> {
        if name.is_empty() {
            return Err(DiError::InvalidArgument(
                "scope name must not be empty".to_string(),
            ));
        }
        let mut scopes = self.inner.scopes.lock().unwrap();
        if scopes.contains_key(name) {
            return Err(DiError::InvalidArgument(format!(
                "scope '{}' already exists",
                name
            )));
        }
        if scopes.len() >= self.inner.options.max_scopes {
            return Err(DiError::ResourceLimit {
                what: "scopes",
                limit: self.inner.options.max_scopes,
            });
        }
        scopes.insert(name.to_string(), ScopeState::default());
        drop(scopes);
        if self.inner.options.verbose {
            tracing::debug!(scope = %name, "scope created");
        }
        Ok(Scope::new(self.clone(), name.to_string()))
    }

    /// Looks up an existing scope by name.
    pub fn scope(&self, name: &str) -> DiResult<Scope> {
        let scopes = self.inner.scopes.lock().unwrap();
        if !scopes.contains_key(name) {
            return Err(DiError::ScopeNotFound(name.to_string()));
        }
        Ok(Scope::new(self.clone(), name.to_string()))
    }

    pub(crate) fn scope_instances(&self, name: &str) -> Vec<(String, AnyArc)> {
        let scopes = self.inner.scopes.lock().unwrap();
        let mut instances: Vec<(String, AnyArc)> = scopes
            .get(name)
            .map(|state| {
                state
                    .instances
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect()
            })
            .unwrap_or_default();
        instances.sort_by(|a, b| a.0.cmp(&b.0));
        instances
    }

    pub(crate) fn dispose_scope(&self, name: &str) -> DiResult<()> {
        let mut state = {
            let mut scopes = self.inner.scopes.lock().unwrap();
            match scopes.get_mut(name) {
                // Take the state out so disposers run without the scope
                // registry locked; the entry stays for reuse.
                Some(state) => std::mem::take(state),
                None => return Err(DiError::ScopeNotFound(name.to_string())),
            }
        };
        state.disposers.run_reverse();
        drop(state.instances);
        if self.inner.options.verbose {
            tracing::debug!(scope = %name, "scope disposed");
        }
        Ok(())
    }

    pub(crate) fn push_disposer(&self, scope: Option<&str>, f: Box<dyn FnOnce() + Send>) {
        match scope {
            Some(scope_name) => {
                let mut scopes = self.inner.scopes.lock().unwrap();
                match scopes.get_mut(scope_name) {
                    Some(state) => state.disposers.push(f),
                    None => {
                        tracing::warn!(scope = %scope_name, "disposer registered on unknown scope; attaching to root");
                        drop(scopes);
                        self.inner.root_disposers.lock().unwrap().push(f);
                    }
                }
            }
            None => self.inner.root_disposers.lock().unwrap().push(f),
        }
    }

    /// Runs every root-level disposal hook (registered from unscoped
    /// factories) in LIFO order.
    pub fn dispose_all(&self) {
        let mut bag = {
            let mut root = self.inner.root_disposers.lock().unwrap();
            std::mem::take(&mut *root)
        };
        bag.run_reverse();
    }

    // ----- export -----

    /// JSON snapshot of the registry: services with lifecycles and tags,
    /// plus the tag index. Intended for debugging and documentation.
    pub fn export_graph_json(&self) -> DiResult<String> {
        let mut services: Vec<ServiceInfo> = self
            .registrations()
            .into_iter()
            .map(|reg| reg.info())
            .collect();
        services.sort_by(|a, b| a.name.cmp(&b.name));
        let export = GraphExport {
            services,
            tags: self.services_by_tag(),
        };
        serde_json::to_string_pretty(&export)
            .map_err(|e| DiError::InvalidArgument(format!("graph export failed: {}", e)))
    }
}

#[derive(Serialize)]
struct GraphExport {
    services: Vec<ServiceInfo>,
    tags: BTreeMap<String, Vec<String>>,
}

fn not_found<'k>(name: &str, keys: impl Iterator<Item = &'k String>) -> DiError {
    let suggestion = keys
        .filter(|k| k.as_str() != name)
        .find(|k| k.eq_ignore_ascii_case(name))
        .cloned();
    DiError::NotFound {
        name: name.to_string(),
        suggestion,
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new(ContainerOptions::default())
    }
}

impl Clone for Container {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl Drop for Container {
    fn drop(&mut self) {
        if Arc::strong_count(&self.inner) == 1 {
            if let Ok(bag) = self.inner.root_disposers.try_lock() {
                if !bag.is_empty() {
                    tracing::warn!(
                        "container dropped with undisposed root disposers; call dispose_all() first"
                    );
                }
            }
        }
    }
}

impl DependencyResolver for Container {
    fn get(&self, key: &str) -> DiResult<AnyArc> {
        self.resolve(key)
    }
}
