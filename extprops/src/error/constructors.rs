//! Constructors and aggregation helpers for `PropsError`.

use std::sync::Arc;

use figment::Error as FigmentError;

use super::{AggregatedErrors, ConversionError, PropsError};

impl PropsError {
    /// Tries to build a [`PropsError`] from an iterator of errors.
    ///
    /// Returns `None` when no errors are supplied, the inner error when a
    /// single uniquely owned [`Arc`] is supplied, and [`Self::Aggregate`]
    /// otherwise.
    #[must_use]
    pub fn try_aggregate<I, E>(errors: I) -> Option<Self>
    where
        I: IntoIterator<Item = E>,
        E: Into<Arc<Self>>,
    {
        let mut arcs: Vec<Arc<Self>> = errors.into_iter().map(Into::into).collect();
        if arcs.is_empty() {
            return None;
        }
        Some(if arcs.len() == 1 {
            let last = arcs.pop()?;
            match Arc::try_unwrap(last) {
                Ok(err) => err,
                Err(shared) => Self::Aggregate(Box::new(AggregatedErrors::new(vec![shared]))),
            }
        } else {
            Self::Aggregate(Box::new(AggregatedErrors::new(arcs)))
        })
    }

    /// Attach the property name to a conversion failure.
    ///
    /// # Examples
    ///
    /// ```
    /// use extprops::{ConversionError, PropsError};
    /// let e = PropsError::conversion(
    ///     "app.mode",
    ///     ConversionError::InvalidChar { value: "ab".into() },
    /// );
    /// assert!(e.to_string().contains("property 'app.mode'"));
    /// ```
    #[must_use]
    pub fn conversion(property: impl Into<String>, source: ConversionError) -> Self {
        Self::Conversion {
            property: Some(property.into()),
            source,
        }
    }

    /// Construct an [`PropsError::UnresolvedProperty`] for `name`.
    #[must_use]
    pub fn unresolved(name: impl Into<String>) -> Self {
        Self::UnresolvedProperty { name: name.into() }
    }

    /// Construct a [`PropsError::Configuration`] failure.
    #[must_use]
    pub fn configuration(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Configuration {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Construct a gathering error from a [`figment::Error`].
    ///
    /// # Examples
    ///
    /// ```
    /// use extprops::PropsError;
    /// let e = PropsError::gathering(figment::Error::from("boom"));
    /// assert!(matches!(e, PropsError::Gathering(_)));
    /// ```
    #[must_use]
    pub fn gathering(source: FigmentError) -> Self {
        Self::Gathering(Box::new(source))
    }

    /// The conversion failure behind this error, if any.
    #[must_use]
    pub const fn as_conversion(&self) -> Option<&ConversionError> {
        match self {
            Self::Conversion { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl ConversionError {
    /// Mismatch between an extracted value and the requested Rust type.
    #[must_use]
    pub fn mismatch(expected: crate::TypeDescriptor, found: &crate::Value) -> Self {
        Self::ValueMismatch {
            expected,
            found: found.kind(),
        }
    }
}
