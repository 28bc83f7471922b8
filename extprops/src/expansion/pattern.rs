//! Single-pass regex expander.

use std::fmt;
use std::sync::Arc;

use regex::Regex;
use tracing::trace;

use super::{VariableExpander, compile_placeholder, lookup};
use crate::error::ExpansionError;
use crate::resolver::Resolver;

/// Default variable pattern, matching `${name}`.
pub const DEFAULT_PATTERN: &str = r"\$\{(.*?)\}";

/// Expands variables matched by a regex in a single left-to-right pass.
///
/// Unlike [`super::SimpleVariableExpander`], substituted values are not
/// scanned again, and a match whose name group is empty (such as `${}`) is an
/// error.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use extprops::expansion::{PatternVariableExpander, VariableExpander};
/// use extprops::resolver::MapResolver;
///
/// let resolver = Arc::new(MapResolver::from_iter([("user", "ada"), ("raw", "${user}")]));
/// let expander = PatternVariableExpander::with_pattern(resolver, r"#\[(.+?)\]")?;
/// assert_eq!(expander.expand("hi #[user], #[raw]")?, "hi ada, ${user}");
/// # Ok::<(), extprops::ExpansionError>(())
/// ```
#[derive(Clone)]
pub struct PatternVariableExpander {
    resolver: Arc<dyn Resolver>,
    pattern: Regex,
}

impl PatternVariableExpander {
    /// Expander matching `${name}`.
    ///
    /// # Errors
    ///
    /// Never fails for the built-in pattern; the signature mirrors
    /// [`Self::with_pattern`].
    pub fn new(resolver: Arc<dyn Resolver>) -> Result<Self, ExpansionError> {
        Self::with_pattern(resolver, DEFAULT_PATTERN)
    }

    /// Expander matching `pattern`, whose first capture group is the name.
    ///
    /// # Errors
    ///
    /// Returns [`ExpansionError::InvalidPattern`] when the pattern is
    /// rejected by [`compile_placeholder`].
    pub fn with_pattern(
        resolver: Arc<dyn Resolver>,
        pattern: &str,
    ) -> Result<Self, ExpansionError> {
        Ok(Self {
            resolver,
            pattern: compile_placeholder(pattern)?,
        })
    }
}

impl VariableExpander for PatternVariableExpander {
    fn expand(&self, source: &str) -> Result<String, ExpansionError> {
        let mut output = String::with_capacity(source.len());
        let mut cursor = 0;
        for captures in self.pattern.captures_iter(source) {
            let (Some(whole), name) = (captures.get(0), captures.get(1)) else {
                continue;
            };
            let name = name.map(|m| m.as_str()).filter(|n| !n.is_empty()).ok_or_else(|| {
                ExpansionError::EmptyVariableName {
                    pattern: self.pattern.as_str().to_owned(),
                    source_text: source.to_owned(),
                }
            })?;
            let value = lookup(self.resolver.as_ref(), name, source)?;
            trace!(variable = name, "expanding variable");
            output.push_str(source.get(cursor..whole.start()).unwrap_or_default());
            output.push_str(&value);
            cursor = whole.end();
        }
        output.push_str(source.get(cursor..).unwrap_or_default());
        Ok(output)
    }
}

impl fmt::Debug for PatternVariableExpander {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatternVariableExpander")
            .field("pattern", &self.pattern.as_str())
            .finish_non_exhaustive()
    }
}
