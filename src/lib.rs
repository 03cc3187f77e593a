//! # keyed-di
//!
//! Name-keyed dependency injection for Rust: a registry mapping service
//! names to factories or values, with recursive resolution that builds a
//! requested service and its transitive dependencies, handing each
//! factory a single keyed dependency view.
//!
//! ## Features
//!
//! - **Lifecycles**: singleton, transient, scoped, and value
//! - **Dependency view**: factories read dependencies by name through a
//!   read-only capability object, depth-first and lazily
//! - **Circular dependency detection**: fails fast with the full cycle
//! - **Scopes**: named, disposable contexts with one instance per scope
//! - **Tag discovery**: find services by tag sets (AND/OR) without
//!   instantiating them
//! - **Hooks**: observe resolve/create events; observer failures never
//!   break resolution
//! - **Decorators**: ordered, contract-checked wrappers applied after
//!   construction
//!
//! ## Quick Start
//!
//! ```rust
//! use keyed_di::{Container, DependencyResolver};
//! use std::sync::Arc;
//!
//! #[derive(Clone)]
//! struct Config {
//!     env: String,
//! }
//!
//! struct Logger {
//!     prefix: String,
//! }
//!
//! let di = Container::default();
//!
//! di.value("config", Config { env: "dev".into() }).unwrap();
//! di.singleton("logger", |deps| {
//!     let config = deps.get_as::<Config>("config")?;
//!     Ok(Logger {
//!         prefix: format!("[{}]", config.env),
//!     })
//! })
//! .unwrap();
//!
//! let a = di.resolve_as::<Logger>("logger").unwrap();
//! let b = di.resolve_as::<Logger>("logger").unwrap();
//! assert!(Arc::ptr_eq(&a, &b)); // singletons are cached
//! assert_eq!(a.prefix, "[dev]");
//! ```
//!
//! ## Scoped Services
//!
//! ```rust
//! use keyed_di::Container;
//! use std::sync::Arc;
//!
//! struct RequestContext {
//!     id: u32,
//! }
//!
//! let di = Container::default();
//! di.scoped("requestContext", |_| Ok(RequestContext { id: 1 })).unwrap();
//!
//! let req_a = di.create_scope("request-a").unwrap();
//! let req_b = di.create_scope("request-b").unwrap();
//!
//! let ctx1 = req_a.resolve("requestContext").unwrap();
//! let ctx2 = req_a.resolve("requestContext").unwrap();
//! let ctx3 = req_b.resolve("requestContext").unwrap();
//!
//! assert!(Arc::ptr_eq(&ctx1, &ctx2)); // one instance per scope
//! assert!(!Arc::ptr_eq(&ctx1, &ctx3)); // scopes are independent
//!
//! req_a.dispose().unwrap();
//! assert_eq!(req_a.instance_count(), 0);
//! ```
//!
//! ## Errors
//!
//! All failures surface synchronously as [`DiError`] with messages
//! designed for diagnosis: a missing service names itself (and a
//! case-insensitive near-match when one exists), a circular dependency
//! enumerates its cycle.
//!
//! ```rust
//! use keyed_di::{Container, DependencyResolver, DiError};
//!
//! let di = Container::default();
//! di.singleton("a", |deps| deps.get("b")).unwrap();
//! di.singleton("b", |deps| deps.get("a")).unwrap();
//!
//! match di.resolve("a") {
//!     Err(DiError::Circular(cycle)) => assert_eq!(cycle, vec!["a", "b", "a"]),
//!     _ => unreachable!(),
//! }
//! ```

mod builder;
mod container;
mod decoration;
mod deps;
mod error;
mod hooks;
mod internal;
mod lifecycle;
mod options;
mod registration;
mod scope;
mod tags;
pub mod traits;

pub use builder::ServiceBuilder;
pub use container::Container;
pub use decoration::{Decorate, Decorator};
pub use deps::Deps;
pub use error::{DiError, DiResult};
pub use hooks::{HookContext, HookEvent};
pub use lifecycle::Lifecycle;
pub use options::ContainerOptions;
pub use registration::{AnyArc, ServiceInfo};
pub use scope::Scope;
pub use tags::TagMode;
pub use traits::{DependencyResolver, Dispose};
