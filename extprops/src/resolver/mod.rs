//! Property sources.
//!
//! A [`Resolver`] maps a property name to an optional raw string. An absent
//! value is not an error at this level; callers decide whether absence is
//! fatal.

mod caching;
mod env;
mod layered;
mod map;

use std::fmt;
use std::sync::Arc;

use tracing::trace;

pub use caching::CachingResolver;
pub use env::EnvResolver;
pub use layered::FigmentResolver;
pub use map::MapResolver;

use crate::error::ResolveError;

/// A name to value lookup.
///
/// Implementations must be safe to share across threads and must not
/// require side effects from callers.
pub trait Resolver: Send + Sync {
    /// Look up `name`.
    ///
    /// # Errors
    ///
    /// Returns a [`ResolveError`] when the underlying source fails. A missing
    /// property is `Ok(None)`.
    fn resolve(&self, name: &str) -> Result<Option<String>, ResolveError>;
}

/// Adapts a closure into a [`Resolver`].
///
/// # Examples
///
/// ```
/// use extprops::resolver::{FnResolver, Resolver};
///
/// let resolver = FnResolver::new(|name: &str| (name == "greeting").then(|| "hello".to_owned()));
/// assert_eq!(resolver.resolve("greeting")?, Some("hello".to_owned()));
/// assert_eq!(resolver.resolve("other")?, None);
/// # Ok::<(), extprops::ResolveError>(())
/// ```
#[derive(Clone)]
pub struct FnResolver<F>(F);

impl<F> FnResolver<F>
where
    F: Fn(&str) -> Option<String> + Send + Sync,
{
    /// Wrap `lookup`.
    pub const fn new(lookup: F) -> Self {
        Self(lookup)
    }
}

impl<F> Resolver for FnResolver<F>
where
    F: Fn(&str) -> Option<String> + Send + Sync,
{
    fn resolve(&self, name: &str) -> Result<Option<String>, ResolveError> {
        Ok((self.0)(name))
    }
}

impl<F> fmt::Debug for FnResolver<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnResolver").finish_non_exhaustive()
    }
}

/// Ordered set of resolvers where the first present value wins.
#[derive(Clone, Default)]
pub struct ResolverChain {
    resolvers: Vec<Arc<dyn Resolver>>,
}

impl ResolverChain {
    /// An empty chain that resolves nothing.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            resolvers: Vec::new(),
        }
    }

    /// Append `resolver`; earlier resolvers take precedence.
    #[must_use]
    pub fn with(mut self, resolver: impl Resolver + 'static) -> Self {
        self.resolvers.push(Arc::new(resolver));
        self
    }

    /// Append an already shared resolver.
    pub fn push(&mut self, resolver: Arc<dyn Resolver>) {
        self.resolvers.push(resolver);
    }

    /// Number of resolvers in the chain.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.resolvers.len()
    }

    /// Whether the chain has no resolvers.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }
}

impl Resolver for ResolverChain {
    fn resolve(&self, name: &str) -> Result<Option<String>, ResolveError> {
        for (index, resolver) in self.resolvers.iter().enumerate() {
            if let Some(value) = resolver.resolve(name)? {
                trace!(property = name, resolver = index, "property resolved");
                return Ok(Some(value));
            }
        }
        Ok(None)
    }
}

impl fmt::Debug for ResolverChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolverChain")
            .field("resolvers", &self.resolvers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests;
