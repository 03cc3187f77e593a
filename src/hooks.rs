//! Lifecycle hooks for observing resolution and creation events.

use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use crate::lifecycle::Lifecycle;
use crate::registration::AnyArc;

/// The four observation points in the resolution pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookEvent {
    /// Fired at the top of every resolve call, before lookup.
    BeforeResolve,
    /// Fired after a freshly built instance is cached and about to be
    /// returned. Cache hits skip this event.
    AfterResolve,
    /// Fired just before an implementation is invoked.
    BeforeCreate,
    /// Fired after construction and decoration.
    AfterCreate,
}

impl fmt::Display for HookEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HookEvent::BeforeResolve => "beforeResolve",
            HookEvent::AfterResolve => "afterResolve",
            HookEvent::BeforeCreate => "beforeCreate",
            HookEvent::AfterCreate => "afterCreate",
        };
        f.write_str(s)
    }
}

/// Payload passed to every hook callback.
#[derive(Clone)]
pub struct HookContext {
    /// Which observation point fired.
    pub event: HookEvent,
    /// The service being resolved or created.
    pub service: String,
    /// The scope the resolution is bound to, if any.
    pub scope: Option<String>,
    /// The registration's lifecycle, once known (`BeforeResolve` fires
    /// before lookup, so it carries `None`).
    pub lifecycle: Option<Lifecycle>,
    /// The built instance, present on `AfterCreate` and `AfterResolve`.
    pub instance: Option<AnyArc>,
}

impl fmt::Debug for HookContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookContext")
            .field("event", &self.event)
            .field("service", &self.service)
            .field("scope", &self.scope)
            .field("lifecycle", &self.lifecycle)
            .field("instance", &self.instance.as_ref().map(|_| "..."))
            .finish()
    }
}

pub(crate) type HookFn = Arc<dyn Fn(&HookContext) + Send + Sync>;

/// Ordered callback lists, one per event.
#[derive(Default)]
pub(crate) struct Hooks {
    before_resolve: Vec<HookFn>,
    after_resolve: Vec<HookFn>,
    before_create: Vec<HookFn>,
    after_create: Vec<HookFn>,
}

impl Hooks {
    pub(crate) fn list(&self, event: HookEvent) -> &[HookFn] {
        match event {
            HookEvent::BeforeResolve => &self.before_resolve,
            HookEvent::AfterResolve => &self.after_resolve,
            HookEvent::BeforeCreate => &self.before_create,
            HookEvent::AfterCreate => &self.after_create,
        }
    }

    pub(crate) fn list_mut(&mut self, event: HookEvent) -> &mut Vec<HookFn> {
        match event {
            HookEvent::BeforeResolve => &mut self.before_resolve,
            HookEvent::AfterResolve => &mut self.after_resolve,
            HookEvent::BeforeCreate => &mut self.before_create,
            HookEvent::AfterCreate => &mut self.after_create,
        }
    }
}

/// Invokes callbacks in registration order. A panicking callback is
/// caught and reported so a misbehaving observer can never break
/// resolution.
pub(crate) fn fire(callbacks: &[HookFn], ctx: &HookContext) {
    for cb in callbacks {
        if catch_unwind(AssertUnwindSafe(|| cb(ctx))).is_err() {
            tracing::warn!(
                event = %ctx.event,
                service = %ctx.service,
                "hook callback panicked; continuing"
            );
        }
    }
}
