//! Prefix/suffix scanning expander with re-scan after each substitution.

use std::fmt;
use std::iter;
use std::sync::Arc;

use tracing::trace;

use super::{DEFAULT_MAX_DEPTH, DEFAULT_PREFIX, DEFAULT_SUFFIX, VariableExpander, lookup};
use crate::error::ExpansionError;
use crate::resolver::Resolver;

/// Expands `${name}` references, re-scanning from the start after every
/// substitution so resolved values may themselves contain references.
///
/// Scanning stops, leaving the remaining text untouched, at the first prefix
/// that has no suffix after it or that is immediately followed by the suffix.
/// Text substituted for a reference sits one nesting level below the
/// reference it replaced. A reference found at the nesting cap raises
/// [`ExpansionError::DepthExceeded`], so self-referential values fail while
/// any number of side-by-side references expand.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use extprops::expansion::{SimpleVariableExpander, VariableExpander};
/// use extprops::resolver::MapResolver;
///
/// let resolver = MapResolver::from_iter([("env", "prod"), ("host", "db.${env}.local")]);
/// let expander = SimpleVariableExpander::new(Arc::new(resolver));
/// assert_eq!(expander.expand("jdbc://${host}:5432")?, "jdbc://db.prod.local:5432");
/// assert_eq!(expander.expand("cost: ${}")?, "cost: ${}");
/// # Ok::<(), extprops::ExpansionError>(())
/// ```
#[derive(Clone)]
pub struct SimpleVariableExpander {
    resolver: Arc<dyn Resolver>,
    prefix: String,
    suffix: String,
    max_depth: usize,
}

impl SimpleVariableExpander {
    /// Expander using the default `${` and `}` markers.
    #[must_use]
    pub fn new(resolver: Arc<dyn Resolver>) -> Self {
        Self {
            resolver,
            prefix: DEFAULT_PREFIX.to_owned(),
            suffix: DEFAULT_SUFFIX.to_owned(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Expander using custom markers.
    ///
    /// # Errors
    ///
    /// Returns [`ExpansionError::InvalidMarkers`] when either marker is empty.
    pub fn with_markers(
        resolver: Arc<dyn Resolver>,
        prefix: impl Into<String>,
        suffix: impl Into<String>,
    ) -> Result<Self, ExpansionError> {
        let prefix_marker = prefix.into();
        let suffix_marker = suffix.into();
        if prefix_marker.is_empty() {
            return Err(ExpansionError::InvalidMarkers { marker: "prefix" });
        }
        if suffix_marker.is_empty() {
            return Err(ExpansionError::InvalidMarkers { marker: "suffix" });
        }
        Ok(Self {
            prefix: prefix_marker,
            suffix: suffix_marker,
            ..Self::new(resolver)
        })
    }

    /// Cap how deeply substituted values may nest further references.
    #[must_use]
    pub const fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Locate the next well-formed reference as `(start, name_range_end)`.
    fn next_reference(&self, buffer: &str) -> Option<(usize, usize)> {
        let start = buffer.find(&self.prefix)?;
        let name_start = start + self.prefix.len();
        let offset = buffer.get(name_start..)?.find(&self.suffix)?;
        if offset == 0 {
            return None;
        }
        Some((start, name_start + offset))
    }
}

impl VariableExpander for SimpleVariableExpander {
    fn expand(&self, source: &str) -> Result<String, ExpansionError> {
        let mut buffer = source.to_owned();
        // Nesting level of each byte of `buffer`.
        let mut levels = vec![0_usize; buffer.len()];
        while let Some((start, name_end)) = self.next_reference(&buffer) {
            let end = name_end + self.suffix.len();
            let level = levels
                .get(start..end)
                .and_then(|span| span.iter().copied().max())
                .unwrap_or_default();
            if level >= self.max_depth {
                return Err(ExpansionError::DepthExceeded {
                    source_text: source.to_owned(),
                    limit: self.max_depth,
                });
            }
            let name = buffer
                .get(start + self.prefix.len()..name_end)
                .unwrap_or_default()
                .to_owned();
            let value = lookup(self.resolver.as_ref(), &name, source)?;
            trace!(variable = %name, level, "expanding variable");
            buffer.replace_range(start..end, &value);
            let tail = levels.split_off(end.min(levels.len()));
            levels.truncate(start);
            levels.extend(iter::repeat_n(level + 1, value.len()));
            levels.extend(tail);
        }
        Ok(buffer)
    }
}

impl fmt::Debug for SimpleVariableExpander {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimpleVariableExpander")
            .field("prefix", &self.prefix)
            .field("suffix", &self.suffix)
            .field("max_depth", &self.max_depth)
            .finish_non_exhaustive()
    }
}
