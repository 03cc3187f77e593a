//! Circular dependency detection infrastructure.

use std::cell::RefCell;

use crate::error::{DiError, DiResult};

const MAX_DEPTH: usize = 256;

// Thread-local stack of in-flight service names. Exists only while a
// top-level resolve call tree is running; independent threads never
// share detection state.
thread_local! {
    static RESOLUTION_STACK: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
}

/// RAII guard for the thread-local resolution stack.
///
/// Detection happens before pushing: if `name` is already in flight,
/// `enter` fails with [`DiError::Circular`] carrying the cycle from the
/// first occurrence of the repeated name through the current name,
/// e.g. `["a", "b", "a"]`.
pub(crate) struct StackGuard {
    _private: (),
}

impl StackGuard {
    pub(crate) fn enter(name: &str) -> DiResult<Self> {
        RESOLUTION_STACK.with(|cell| {
            let mut stack = cell.borrow_mut();

            if let Some(pos) = stack.iter().position(|n| n == name) {
                let mut cycle: Vec<String> = stack[pos..].to_vec();
                cycle.push(name.to_string());
                return Err(DiError::Circular(cycle));
            }

            if stack.len() >= MAX_DEPTH {
                return Err(DiError::ResourceLimit {
                    what: "resolution depth",
                    limit: MAX_DEPTH,
                });
            }

            stack.push(name.to_string());
            Ok(())
        })?;

        Ok(StackGuard { _private: () })
    }
}

impl Drop for StackGuard {
    fn drop(&mut self) {
        RESOLUTION_STACK.with(|cell| {
            let mut stack = cell.borrow_mut();
            stack.pop();
            if stack.is_empty() {
                // Drop the backing allocation so unrelated resolution
                // trees start from a clean slate.
                *stack = Vec::new();
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_repeat_and_reports_cycle() {
        let _a = StackGuard::enter("a").unwrap();
        let _b = StackGuard::enter("b").unwrap();
        match StackGuard::enter("a") {
            Err(DiError::Circular(cycle)) => assert_eq!(cycle, vec!["a", "b", "a"]),
            other => panic!("expected Circular, got {:?}", other.err()),
        }
    }

    #[test]
    fn stack_unwinds_on_drop() {
        {
            let _a = StackGuard::enter("svc").unwrap();
        }
        // Same name is fine once the previous frame is gone.
        let _again = StackGuard::enter("svc").unwrap();
    }
}
