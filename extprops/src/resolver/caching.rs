//! Resolver decorator that memoises present values.

use std::fmt;
use std::sync::Arc;

use tracing::trace;

use super::Resolver;
use crate::cache::CacheStrategy;
use crate::error::ResolveError;

/// Caches values resolved by the decorated resolver.
///
/// Only present values are cached; a miss is asked of the decorated resolver
/// again on the next lookup.
pub struct CachingResolver<R> {
    decorated: R,
    cache: Arc<dyn CacheStrategy<String, String>>,
}

impl<R> CachingResolver<R> {
    /// Decorate `decorated`, storing values in `cache`.
    #[must_use]
    pub const fn new(decorated: R, cache: Arc<dyn CacheStrategy<String, String>>) -> Self {
        Self { decorated, cache }
    }

    /// The cache backing this resolver.
    #[must_use]
    pub const fn cache(&self) -> &Arc<dyn CacheStrategy<String, String>> {
        &self.cache
    }
}

impl<R: Resolver> Resolver for CachingResolver<R> {
    fn resolve(&self, name: &str) -> Result<Option<String>, ResolveError> {
        let key = name.to_owned();
        if let Some(cached) = self.cache.get(&key) {
            trace!(property = name, "resolver cache hit");
            return Ok(Some(cached));
        }
        let resolved = self.decorated.resolve(name)?;
        if let Some(value) = &resolved {
            self.cache.cache(key, value.clone());
        }
        Ok(resolved)
    }
}

impl<R: fmt::Debug> fmt::Debug for CachingResolver<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachingResolver")
            .field("decorated", &self.decorated)
            .finish_non_exhaustive()
    }
}
