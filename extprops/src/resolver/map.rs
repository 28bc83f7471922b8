//! In-memory property source.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use uncased::{Uncased, UncasedStr};

use super::Resolver;
use crate::error::ResolveError;

type Fallback = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

#[derive(Clone)]
enum Entries {
    Exact(HashMap<String, String>),
    IgnoreCase(HashMap<Uncased<'static>, String>),
}

/// Resolves properties from a map captured at construction.
///
/// Names missing from the map are passed to an optional fallback, which
/// lets sources such as the process environment pick up values added after
/// the resolver was built.
///
/// # Examples
///
/// ```
/// use extprops::resolver::{MapResolver, Resolver};
///
/// let resolver = MapResolver::from_iter([("App.Name", "demo")]).ignore_case();
/// assert_eq!(resolver.resolve("app.name")?, Some("demo".to_owned()));
/// # Ok::<(), extprops::ResolveError>(())
/// ```
#[derive(Clone)]
pub struct MapResolver {
    entries: Entries,
    fallback: Option<Fallback>,
}

impl MapResolver {
    /// Resolve from `map` using exact name matches.
    #[must_use]
    pub const fn new(map: HashMap<String, String>) -> Self {
        Self {
            entries: Entries::Exact(map),
            fallback: None,
        }
    }

    /// Match names without regard to ASCII case.
    #[must_use]
    pub fn ignore_case(self) -> Self {
        let entries = match self.entries {
            Entries::Exact(map) => Entries::IgnoreCase(
                map.into_iter().map(|(k, v)| (Uncased::from(k), v)).collect(),
            ),
            already @ Entries::IgnoreCase(_) => already,
        };
        Self {
            entries,
            fallback: self.fallback,
        }
    }

    /// Consult `fallback` for names the map does not contain.
    #[must_use]
    pub fn with_fallback<F>(mut self, fallback: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.fallback = Some(Arc::new(fallback));
        self
    }

    fn lookup(&self, name: &str) -> Option<&String> {
        match &self.entries {
            Entries::Exact(map) => map.get(name),
            Entries::IgnoreCase(map) => map.get(UncasedStr::new(name)),
        }
    }
}

impl<K, V> FromIterator<(K, V)> for MapResolver
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::new(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl Resolver for MapResolver {
    fn resolve(&self, name: &str) -> Result<Option<String>, ResolveError> {
        if let Some(value) = self.lookup(name) {
            return Ok(Some(value.clone()));
        }
        Ok(self.fallback.as_ref().and_then(|fallback| fallback(name)))
    }
}

impl fmt::Debug for MapResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (mode, len) = match &self.entries {
            Entries::Exact(map) => ("exact", map.len()),
            Entries::IgnoreCase(map) => ("ignore-case", map.len()),
        };
        f.debug_struct("MapResolver")
            .field("mode", &mode)
            .field("entries", &len)
            .field("fallback", &self.fallback.is_some())
            .finish()
    }
}
