//! Several `PropsError` values reported as one.

use std::error::Error;
use std::fmt;
use std::slice;
use std::sync::Arc;

use super::PropsError;

/// Failures gathered while eagerly loading a [`crate::PropertyView`].
///
/// Renders as a numbered list, one failure per line.
///
/// ```
/// use extprops::PropsError;
///
/// let err = PropsError::try_aggregate([
///     PropsError::unresolved("db.url"),
///     PropsError::configuration("delimiter", "must not be empty"),
/// ]);
/// let Some(PropsError::Aggregate(all)) = err else { panic!("expected an aggregate") };
/// assert_eq!(all.len(), 2);
/// assert!(all.to_string().starts_with("1: "));
/// ```
#[derive(Debug, Default)]
pub struct AggregatedErrors {
    failures: Vec<Arc<PropsError>>,
}

impl AggregatedErrors {
    /// Wrap `failures` in reporting order.
    #[must_use]
    pub const fn new(failures: Vec<Arc<PropsError>>) -> Self {
        Self { failures }
    }

    /// Borrow each failure in order.
    pub fn iter(&self) -> impl Iterator<Item = &PropsError> {
        self.failures.iter().map(Arc::as_ref)
    }

    /// How many failures were gathered.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.failures.len()
    }

    /// Whether nothing was gathered.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }
}

impl fmt::Display for AggregatedErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut separator = "";
        for (n, failure) in (1..).zip(&self.failures) {
            write!(f, "{separator}{n}: {failure}")?;
            separator = "\n";
        }
        Ok(())
    }
}

impl Error for AggregatedErrors {}

impl<'a> IntoIterator for &'a AggregatedErrors {
    type Item = &'a Arc<PropsError>;
    type IntoIter = slice::Iter<'a, Arc<PropsError>>;

    fn into_iter(self) -> Self::IntoIter {
        self.failures.iter()
    }
}

impl IntoIterator for AggregatedErrors {
    type Item = Arc<PropsError>;
    type IntoIter = std::vec::IntoIter<Arc<PropsError>>;

    fn into_iter(self) -> Self::IntoIter {
        self.failures.into_iter()
    }
}
