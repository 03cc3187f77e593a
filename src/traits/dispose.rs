//! Disposal trait for resource cleanup.

/// Trait for services that need structured teardown (flushing caches,
/// closing connections). Register an instance with
/// [`Deps::on_dispose`](crate::Deps::on_dispose) inside its factory;
/// the hook runs when the owning scope is disposed (or, for unscoped
/// registrations, when [`Container::dispose_all`](crate::Container::dispose_all)
/// is called). Hooks run in LIFO order.
///
/// # Examples
///
/// ```rust
/// use keyed_di::{Container, Dispose};
/// use std::sync::Arc;
///
/// struct Connection {
///     url: String,
/// }
///
/// impl Dispose for Connection {
///     fn dispose(&self) {
///         println!("closing {}", self.url);
///     }
/// }
///
/// let di = Container::default();
/// di.register("connection")
///     .factory_arc(|deps| {
///         let conn = Arc::new(Connection { url: "db://local".into() });
///         deps.on_dispose(conn.clone());
///         Ok(conn)
///     })
///     .as_scoped()
///     .unwrap();
///
/// let scope = di.create_scope("request").unwrap();
/// let _conn = scope.resolve("connection").unwrap();
/// scope.dispose().unwrap(); // prints "closing db://local"
/// ```
pub trait Dispose: Send + Sync + 'static {
    /// Perform synchronous cleanup of resources.
    fn dispose(&self);
}
