//! Decorator composition applied on top of instantiation.
//!
//! A registration may declare an ordered list of decorators, each
//! wrapping the previous result after the base instance is built. Named
//! decorators are themselves services resolved at decoration time; a
//! missing name or a service that does not resolve to a [`Decorator`]
//! is a terminal error at resolution time, not at registration time.

use std::sync::Arc;

use crate::deps::Deps;
use crate::error::DiResult;
use crate::registration::AnyArc;

/// A composable wrapper applied to a built instance.
///
/// Contract, enforced per application by the container: the returned
/// instance must have the same concrete type as the input. That is the
/// typed analog of "preserve the public interface": a decorator that
/// swaps the type out from under consumers would break every downcast
/// they perform.
///
/// # Examples
///
/// ```rust
/// use keyed_di::{Container, Decorate, Deps, DiError, AnyArc, DiResult};
/// use std::sync::Arc;
///
/// struct Banner(String);
///
/// struct Shout;
///
/// impl Decorate for Shout {
///     fn decorate(&self, instance: AnyArc, _deps: &Deps<'_>) -> DiResult<AnyArc> {
///         let banner = instance
///             .downcast::<Banner>()
///             .map_err(|_| DiError::InvalidArgument("expected a Banner".into()))?;
///         Ok(Arc::new(Banner(banner.0.to_uppercase())))
///     }
/// }
///
/// let di = Container::default();
/// di.decorator("shout", Shout).unwrap();
/// di.register("banner")
///     .factory(|_| Ok(Banner("hello".into())))
///     .decorate_with(["shout"])
///     .as_singleton()
///     .unwrap();
///
/// let banner = di.resolve_as::<Banner>("banner").unwrap();
/// assert_eq!(banner.0, "HELLO");
/// ```
pub trait Decorate: Send + Sync + 'static {
    /// Wraps (or adjusts) the instance, returning the decorated result.
    fn decorate(&self, instance: AnyArc, deps: &Deps<'_>) -> DiResult<AnyArc>;
}

/// Concrete, cloneable carrier for a decorator implementation.
///
/// A *named* decorator service must resolve to an instance of this type;
/// [`Container::decorator`](crate::Container::decorator) registers one.
#[derive(Clone)]
pub struct Decorator {
    inner: Arc<dyn Decorate>,
}

impl Decorator {
    /// Wraps a [`Decorate`] implementation.
    pub fn new(decorate: impl Decorate) -> Self {
        Self {
            inner: Arc::new(decorate),
        }
    }

    /// Wraps a plain function with the decorator signature.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(AnyArc, &Deps<'_>) -> DiResult<AnyArc> + Send + Sync + 'static,
    {
        Self::new(FnDecorator(f))
    }

    pub(crate) fn apply(&self, instance: AnyArc, deps: &Deps<'_>) -> DiResult<AnyArc> {
        self.inner.decorate(instance, deps)
    }
}

struct FnDecorator<F>(F);

impl<F> Decorate for FnDecorator<F>
where
    F: Fn(AnyArc, &Deps<'_>) -> DiResult<AnyArc> + Send + Sync + 'static,
{
    fn decorate(&self, instance: AnyArc, deps: &Deps<'_>) -> DiResult<AnyArc> {
        (self.0)(instance, deps)
    }
}

/// A decorator reference held by a registration: either the name of a
/// decorator service (looked up per instantiation) or an inline one.
pub(crate) enum DecoratorSpec {
    Named(String),
    Inline(Decorator),
}

impl DecoratorSpec {
    /// Short label for diagnostics.
    pub(crate) fn label(&self) -> &str {
        match self {
            DecoratorSpec::Named(name) => name,
            DecoratorSpec::Inline(_) => "<inline>",
        }
    }
}
