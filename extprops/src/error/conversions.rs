//! Conversions between stage errors and `PropsError`.

use figment::Error as FigmentError;

use super::{ConversionError, PropsError};

/// A conversion failure raised outside any named property.
impl From<ConversionError> for PropsError {
    fn from(source: ConversionError) -> Self {
        Self::Conversion {
            property: None,
            source,
        }
    }
}

impl From<FigmentError> for PropsError {
    fn from(e: FigmentError) -> Self {
        Self::Gathering(e.into())
    }
}

impl From<PropsError> for FigmentError {
    /// Allow using `?` in tests that return `figment::Error`.
    fn from(e: PropsError) -> Self {
        match e {
            PropsError::Gathering(fe) => *fe,
            other => Self::from(other.to_string()),
        }
    }
}
