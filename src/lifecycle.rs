//! Service lifecycle definitions.

use serde::Serialize;
use std::fmt;

/// Service lifecycles controlling instance caching behavior
///
/// Defines how service instances are created, cached, and shared within
/// the container. Each lifecycle has different caching characteristics.
///
/// # Lifecycle Characteristics
///
/// - **Singleton**: One instance per container, cached on first resolve
/// - **Scoped**: One instance per (service, scope) pair
/// - **Transient**: Fresh instance per resolution, never cached
/// - **Value**: The registered value itself, always the same reference
///
/// # Examples
///
/// ```rust
/// use keyed_di::{Container, Lifecycle};
/// use std::sync::Arc;
///
/// struct Ticket(u32);
///
/// let di = Container::default();
/// di.singleton("shared", |_| Ok(Ticket(1))).unwrap();
/// di.transient("fresh", |_| Ok(Ticket(2))).unwrap();
///
/// let a = di.resolve("shared").unwrap();
/// let b = di.resolve("shared").unwrap();
/// assert!(Arc::ptr_eq(&a, &b)); // Singleton: same instance
///
/// let c = di.resolve("fresh").unwrap();
/// let d = di.resolve("fresh").unwrap();
/// assert!(!Arc::ptr_eq(&c, &d)); // Transient: always different
///
/// assert_eq!(di.service_info("shared").unwrap().lifecycle, Lifecycle::Singleton);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Lifecycle {
    /// Single instance per container, cached forever
    ///
    /// Singleton services are created once when first resolved and then
    /// cached in the container. The same instance is shared across all
    /// callers and all scopes. Best for expensive-to-create services
    /// that hold state for the whole application lifetime.
    Singleton,
    /// New instance per resolution, never cached
    ///
    /// Transient services create a fresh instance every time they are
    /// requested, even within the same scope. A transient *value*
    /// registration is deep-copied per resolution instead, so mutations
    /// by one consumer never leak to another.
    Transient,
    /// Single instance per scope, cached for the scope lifetime
    ///
    /// Scoped services are created once per named scope when first
    /// resolved through that scope. Resolving a scoped service with no
    /// scope still succeeds but the instance is not cached anywhere.
    Scoped,
    /// The registered value itself, returned by reference
    ///
    /// Value registrations hand back the exact value that was registered,
    /// with no construction and no copying.
    Value,
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Lifecycle::Singleton => "singleton",
            Lifecycle::Transient => "transient",
            Lifecycle::Scoped => "scoped",
            Lifecycle::Value => "value",
        };
        f.write_str(s)
    }
}
