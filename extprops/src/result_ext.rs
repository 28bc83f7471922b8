//! Extensions for mapping errors to `PropsResult` concisely.
//!
//! These helpers replace repeated `.map_err(|e| Arc::new(e.into()))` calls
//! when lifting stage errors into the crate's `PropsResult<T>` alias
//! (`Result<T, Arc<PropsError>>`).
//!
//! # Examples
//!
//! ```
//! use extprops::{PropsResult, PropsResultExt, RawType, TypeDescriptor, Value};
//! use extprops::conversion::RootConverter;
//!
//! fn port(raw: &str) -> PropsResult<Value> {
//!     // ConversionError implements Into<PropsError>
//!     RootConverter::with_defaults()
//!         .convert_str(raw, &TypeDescriptor::of(RawType::U16))
//!         .into_props()
//! }
//!
//! assert!(port("8080").is_ok());
//! assert!(port("http").is_err());
//! ```

use std::sync::Arc;

use crate::{PropsError, PropsResult};

/// Generic extension for mapping any `Result<T, E>` with `E: Into<PropsError>`
/// into a `PropsResult<T>`.
pub trait PropsResultExt<T, E> {
    /// Convert `Result<T, E>` into `PropsResult<T>` using `Into<PropsError>`.
    ///
    /// # Errors
    ///
    /// Propagates the original error after conversion into `Arc<PropsError>`.
    fn into_props(self) -> PropsResult<T>;
}

impl<T, E> PropsResultExt<T, E> for Result<T, E>
where
    E: Into<PropsError>,
{
    fn into_props(self) -> PropsResult<T> {
        self.map_err(|e| Arc::new(e.into()))
    }
}

/// Convert shared errors into `figment::Error` for callers that already
/// report through Figment.
pub trait IntoFigmentError {
    /// Convert into a `figment::Error`, preserving the message text.
    fn into_figment(self) -> figment::Error;
}

impl IntoFigmentError for Arc<PropsError> {
    fn into_figment(self) -> figment::Error {
        figment::Error::from(self.to_string())
    }
}
