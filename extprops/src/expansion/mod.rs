//! Variable expansion.
//!
//! Expanders replace `${name}` style references with values looked up
//! through a [`Resolver`]. Malformed references (an unterminated prefix or an
//! empty name) are left untouched; a reference whose name cannot be resolved
//! is an error.

mod pattern;
mod placeholder;
mod simple;

pub use pattern::PatternVariableExpander;
pub use placeholder::compile_placeholder;
pub use simple::SimpleVariableExpander;

use crate::error::ExpansionError;
use crate::resolver::Resolver;

/// Default variable prefix marker.
pub const DEFAULT_PREFIX: &str = "${";
/// Default variable suffix marker.
pub const DEFAULT_SUFFIX: &str = "}";
/// Default cap on how deeply substituted values may nest references.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Rewrites variable references in a string.
pub trait VariableExpander: Send + Sync {
    /// Expand every variable reference in `source`.
    ///
    /// # Errors
    ///
    /// Returns an [`ExpansionError`] when a referenced variable cannot be
    /// resolved or the resolver fails.
    fn expand(&self, source: &str) -> Result<String, ExpansionError>;
}

/// Expander that returns its input unchanged.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpVariableExpander;

impl VariableExpander for NoOpVariableExpander {
    fn expand(&self, source: &str) -> Result<String, ExpansionError> {
        Ok(source.to_owned())
    }
}

fn lookup(resolver: &dyn Resolver, name: &str, source: &str) -> Result<String, ExpansionError> {
    match resolver.resolve(name) {
        Ok(Some(value)) => Ok(value),
        Ok(None) => Err(ExpansionError::UnresolvedVariable {
            name: name.to_owned(),
            source_text: source.to_owned(),
        }),
        Err(err) => Err(ExpansionError::Resolver {
            source_text: source.to_owned(),
            source: err,
        }),
    }
}

#[cfg(test)]
mod tests;
