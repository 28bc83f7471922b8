//! Transformations applied to resolved values before conversion.

use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use tracing::trace;

use crate::error::ProcessingError;

/// A named transformation of a resolved property value.
///
/// Processors run in registration order between resolution and conversion,
/// each receiving the previous processor's output.
pub trait Processor: Send + Sync {
    /// Name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Transform `value`, which was resolved for `property`.
    ///
    /// # Errors
    ///
    /// Returns a [`ProcessingError`] naming the processor and property when
    /// the value cannot be transformed.
    fn process(&self, property: &str, value: &str) -> Result<String, ProcessingError>;
}

/// Alphabet accepted by [`Base64Decode`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Alphabet {
    /// RFC 4648 standard alphabet with padding.
    #[default]
    Standard,
    /// RFC 4648 URL and filename safe alphabet with padding.
    UrlSafe,
}

/// Decodes base64 text into a UTF-8 string.
///
/// # Examples
///
/// ```
/// use extprops::processing::{Base64Decode, Processor};
///
/// let decoded = Base64Decode::standard().process("db.password", "aHVudGVyMg==")?;
/// assert_eq!(decoded, "hunter2");
/// # Ok::<(), extprops::ProcessingError>(())
/// ```
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct Base64Decode {
    alphabet: Alphabet,
}

impl Base64Decode {
    /// Decoder for the standard alphabet.
    #[must_use]
    pub const fn standard() -> Self {
        Self {
            alphabet: Alphabet::Standard,
        }
    }

    /// Decoder for the URL-safe alphabet.
    #[must_use]
    pub const fn url_safe() -> Self {
        Self {
            alphabet: Alphabet::UrlSafe,
        }
    }

    /// Alphabet this decoder accepts.
    #[must_use]
    pub const fn alphabet(&self) -> Alphabet {
        self.alphabet
    }
}

impl Processor for Base64Decode {
    fn name(&self) -> &'static str {
        "base64-decode"
    }

    fn process(&self, property: &str, value: &str) -> Result<String, ProcessingError> {
        let bytes = match self.alphabet {
            Alphabet::Standard => STANDARD.decode(value),
            Alphabet::UrlSafe => URL_SAFE.decode(value),
        }
        .map_err(|e| ProcessingError::new(self.name(), property, e))?;
        trace!(property, bytes = bytes.len(), "decoded base64 value");
        String::from_utf8(bytes).map_err(|e| ProcessingError::new(self.name(), property, e))
    }
}

impl fmt::Debug for Base64Decode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Base64Decode").field(&self.alphabet).finish()
    }
}
