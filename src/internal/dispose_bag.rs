//! Internal disposal bag for managing cleanup hooks.

use std::panic::{catch_unwind, AssertUnwindSafe};

/// Container for disposal hooks with LIFO execution order.
///
/// A panicking disposer is caught and reported; disposal of the
/// remaining hooks continues.
#[derive(Default)]
pub(crate) struct DisposeBag {
    hooks: Vec<Box<dyn FnOnce() + Send>>,
}

impl DisposeBag {
    /// Add a disposal hook.
    pub(crate) fn push(&mut self, f: Box<dyn FnOnce() + Send>) {
        self.hooks.push(f);
    }

    /// Execute all hooks in reverse order (LIFO).
    pub(crate) fn run_reverse(&mut self) {
        while let Some(f) = self.hooks.pop() {
            if catch_unwind(AssertUnwindSafe(f)).is_err() {
                tracing::warn!("disposer panicked; continuing disposal");
            }
        }
    }

    /// Check if the bag is empty (no disposers registered).
    pub(crate) fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}
