//! Error types produced while resolving, expanding, and converting
//! properties.

mod aggregate;
mod constructors;
mod conversions;
mod types;

use std::sync::Arc;

pub use aggregate::AggregatedErrors;
pub use types::{ConversionError, ExpansionError, ProcessingError, PropsError, ResolveError};

/// Result alias used across the public API.
///
/// Errors are shared behind an [`Arc`] so cached or aggregated failures can be
/// handed to several callers without cloning the underlying error.
pub type PropsResult<T> = Result<T, Arc<PropsError>>;

#[cfg(test)]
mod tests;
