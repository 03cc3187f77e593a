//! Internal implementation details not exposed in the public API.

mod dispose_bag;
mod stack;

pub(crate) use dispose_bag::DisposeBag;
pub(crate) use stack::StackGuard;
