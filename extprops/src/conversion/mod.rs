//! Chain-of-responsibility conversion of raw strings into typed values.
//!
//! A [`RootConverter`] holds an ordered list of [`Converter`]s and hands each
//! request to the first one whose [`Converter::can_convert_to`] accepts the
//! target's raw type. Container converters recurse into the root converter
//! for their element types through [`ConversionContext::convert_nested`].

pub mod converters;
mod root;

use std::borrow::Cow;

pub use root::RootConverter;

use crate::error::ConversionError;
use crate::types::{RawType, TypeDescriptor};
use crate::value::Value;

/// Default delimiter for array, list, set, and map values.
pub const DEFAULT_DELIMITER: &str = ",";

/// Outcome of a single converter.
///
/// [`ConversionResult::Skipped`] means the converter does not handle the
/// target; it is never a stand-in for a converted null, which is
/// `Converted(Value::Null)`.
#[derive(Clone, Debug, PartialEq)]
pub enum ConversionResult {
    /// The converter produced a value.
    Converted(Value),
    /// The converter declined the target.
    Skipped,
}

impl ConversionResult {
    /// The converted value, if any.
    #[must_use]
    pub fn into_value(self) -> Option<Value> {
        match self {
            Self::Converted(value) => Some(value),
            Self::Skipped => None,
        }
    }

    /// Whether the converter declined the target.
    #[must_use]
    pub const fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped)
    }
}

impl From<Value> for ConversionResult {
    fn from(value: Value) -> Self {
        Self::Converted(value)
    }
}

/// Per call-site conversion options.
///
/// # Examples
///
/// ```
/// use extprops::conversion::ConvertOptions;
///
/// let options = ConvertOptions::default().delimiter(";").strip_empty(true);
/// assert_eq!(options.delimiter_str(), ";");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConvertOptions {
    delimiter: Cow<'static, str>,
    strip_empty: bool,
    date_format: Option<String>,
}

impl ConvertOptions {
    /// Options with the `,` delimiter, empty tokens kept, and ISO-8601
    /// date/time parsing.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            delimiter: Cow::Borrowed(DEFAULT_DELIMITER),
            strip_empty: false,
            date_format: None,
        }
    }

    /// Split container values on `delimiter`.
    ///
    /// An empty delimiter falls back to the default.
    #[must_use]
    pub fn delimiter(mut self, delimiter: impl Into<Cow<'static, str>>) -> Self {
        let candidate = delimiter.into();
        if !candidate.is_empty() {
            self.delimiter = candidate;
        }
        self
    }

    /// Drop empty tokens when splitting container values.
    #[must_use]
    pub const fn strip_empty(mut self, strip: bool) -> Self {
        self.strip_empty = strip;
        self
    }

    /// Parse date/time values with a chrono `strftime` pattern.
    #[must_use]
    pub fn date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = Some(format.into());
        self
    }

    /// Delimiter in effect.
    #[must_use]
    pub fn delimiter_str(&self) -> &str {
        &self.delimiter
    }

    /// Whether empty tokens are dropped.
    #[must_use]
    pub const fn strips_empty(&self) -> bool {
        self.strip_empty
    }

    /// Custom date/time pattern, if any.
    #[must_use]
    pub fn date_format_str(&self) -> Option<&str> {
        self.date_format.as_deref()
    }
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self::new()
    }
}

static DEFAULT_OPTIONS: ConvertOptions = ConvertOptions::new();

/// A single conversion request travelling down the converter chain.
#[derive(Clone, Copy, Debug)]
pub struct ConversionContext<'a> {
    root: &'a RootConverter,
    value: &'a str,
    target: &'a TypeDescriptor,
    options: &'a ConvertOptions,
    property: Option<&'a str>,
}

impl<'a> ConversionContext<'a> {
    /// Request converting `value` into `target` using default options.
    #[must_use]
    pub fn new(root: &'a RootConverter, value: &'a str, target: &'a TypeDescriptor) -> Self {
        Self {
            root,
            value,
            target,
            options: &DEFAULT_OPTIONS,
            property: None,
        }
    }

    /// Use `options` for this request and every nested one.
    #[must_use]
    pub const fn with_options(mut self, options: &'a ConvertOptions) -> Self {
        self.options = options;
        self
    }

    /// Record the property being converted, for diagnostics.
    #[must_use]
    pub const fn for_property(mut self, property: &'a str) -> Self {
        self.property = Some(property);
        self
    }

    /// A request for a nested value sharing this request's root, options,
    /// and property.
    #[must_use]
    pub const fn with<'b>(&self, value: &'b str, target: &'b TypeDescriptor) -> ConversionContext<'b>
    where
        'a: 'b,
    {
        ConversionContext {
            root: self.root,
            value,
            target,
            options: self.options,
            property: self.property,
        }
    }

    /// Converter chain to recurse into.
    #[must_use]
    pub const fn root(&self) -> &'a RootConverter {
        self.root
    }

    /// Raw value to convert. May be empty.
    #[must_use]
    pub const fn value(&self) -> &'a str {
        self.value
    }

    /// Target type.
    #[must_use]
    pub const fn target(&self) -> &'a TypeDescriptor {
        self.target
    }

    /// Raw type of the target.
    #[must_use]
    pub const fn raw_type(&self) -> &'a RawType {
        self.target.raw_type()
    }

    /// Options in effect.
    #[must_use]
    pub const fn options(&self) -> &'a ConvertOptions {
        self.options
    }

    /// Property being converted, when known.
    #[must_use]
    pub const fn property(&self) -> Option<&'a str> {
        self.property
    }

    /// Convert `value` into `target` through the root converter.
    ///
    /// # Errors
    ///
    /// Propagates any [`ConversionError`] raised by the selected converter.
    pub fn convert_nested(&self, value: &str, target: &TypeDescriptor) -> Result<Value, ConversionError> {
        self.root.convert_to_value(&self.with(value, target))
    }
}

/// Converts raw strings into one family of target types.
///
/// A converter that accepts a raw type commits to it: returning
/// [`ConversionResult::Skipped`] after accepting is reported by the
/// [`RootConverter`] as [`ConversionError::SkippedAfterAccept`].
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use extprops::conversion::{ConversionContext, ConversionResult, Converter, RootConverter};
/// use extprops::{ConversionError, RawType, TypeDescriptor, Value};
///
/// struct Endpoint;
///
/// impl Converter for Endpoint {
///     fn name(&self) -> &'static str {
///         "endpoint"
///     }
///
///     fn can_convert_to(&self, raw: &RawType) -> bool {
///         matches!(raw, RawType::Named(name) if name == "Endpoint")
///     }
///
///     fn convert(&self, ctx: &ConversionContext<'_>) -> Result<ConversionResult, ConversionError> {
///         let (host, port) = ctx.value().split_once(':').unwrap_or((ctx.value(), "80"));
///         let port = ctx.convert_nested(port, &TypeDescriptor::of(RawType::U16))?;
///         Ok(Value::List(vec![Value::from(host), port]).into())
///     }
/// }
///
/// let mut converters: Vec<Arc<dyn Converter>> = vec![Arc::new(Endpoint)];
/// converters.extend(extprops::conversion::converters::defaults());
/// let root = RootConverter::new(converters)?;
/// let value = root.convert_str("db:5432", &TypeDescriptor::named("Endpoint"))?;
/// assert_eq!(value, Value::List(vec![Value::from("db"), Value::UInt(5432)]));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait Converter: Send + Sync {
    /// Name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Whether this converter handles targets of `raw` type.
    fn can_convert_to(&self, raw: &RawType) -> bool;

    /// Convert the request's value into its target.
    ///
    /// # Errors
    ///
    /// Returns a [`ConversionError`] when the value is invalid for the
    /// target or a nested conversion fails.
    fn convert(&self, ctx: &ConversionContext<'_>) -> Result<ConversionResult, ConversionError>;
}

/// Split a container value into tokens per the request's options.
///
/// An empty value yields no tokens.
pub(crate) fn split_tokens<'v>(ctx: &ConversionContext<'_>, value: &'v str) -> Vec<&'v str> {
    if value.is_empty() {
        return Vec::new();
    }
    let options = ctx.options();
    value
        .split(options.delimiter_str())
        .filter(|token| !(options.strips_empty() && token.is_empty()))
        .collect()
}
