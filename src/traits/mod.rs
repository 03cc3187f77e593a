//! Public traits for resolution and disposal.

mod dispose;
mod resolver;

pub use dispose::Dispose;
pub use resolver::DependencyResolver;
