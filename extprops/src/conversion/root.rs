//! The dispatching converter.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use super::{ConversionContext, ConversionResult, ConvertOptions, Converter, converters};
use crate::error::{ConversionError, PropsError, PropsResult};
use crate::types::{RawType, TypeDescriptor};
use crate::value::Value;

/// Routes each request to the first registered converter accepting its
/// target, and serves as the recursion entry point for nested conversions.
///
/// The chain is fixed at construction and safe to share between threads.
///
/// # Examples
///
/// ```
/// use extprops::conversion::RootConverter;
/// use extprops::{RawType, TypeDescriptor, Value};
///
/// let root = RootConverter::with_defaults();
/// let ports = TypeDescriptor::list(TypeDescriptor::of(RawType::U16));
/// assert_eq!(
///     root.convert_str("80,443", &ports)?,
///     Value::List(vec![Value::UInt(80), Value::UInt(443)]),
/// );
/// # Ok::<(), extprops::ConversionError>(())
/// ```
#[derive(Clone)]
pub struct RootConverter {
    converters: Arc<[Arc<dyn Converter>]>,
}

impl RootConverter {
    /// Build a chain from `converters`, tried in iteration order.
    ///
    /// # Errors
    ///
    /// Returns [`PropsError::Configuration`] when no converter accepts
    /// `String`, since the chain must always be able to fall back to the raw
    /// text.
    pub fn new(converters: impl IntoIterator<Item = Arc<dyn Converter>>) -> PropsResult<Self> {
        let chain: Arc<[Arc<dyn Converter>]> = converters.into_iter().collect();
        if !chain
            .iter()
            .any(|converter| converter.can_convert_to(&RawType::String))
        {
            return Err(Arc::new(PropsError::configuration(
                "converters",
                "no registered converter accepts String",
            )));
        }
        Ok(Self { converters: chain })
    }

    /// The built-in converter chain.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            converters: converters::defaults().into_iter().collect(),
        }
    }

    /// Names of the registered converters in dispatch order.
    pub fn converter_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.converters.iter().map(|converter| converter.name())
    }

    /// Convert `value` into `target` with default options.
    ///
    /// # Errors
    ///
    /// See [`RootConverter::convert_to_value`].
    pub fn convert_str(&self, value: &str, target: &TypeDescriptor) -> Result<Value, ConversionError> {
        self.convert_to_value(&ConversionContext::new(self, value, target))
    }

    /// Convert `value` into `target` with the given options.
    ///
    /// # Errors
    ///
    /// See [`RootConverter::convert_to_value`].
    pub fn convert_with(
        &self,
        value: &str,
        target: &TypeDescriptor,
        options: &ConvertOptions,
    ) -> Result<Value, ConversionError> {
        self.convert_to_value(&ConversionContext::new(self, value, target).with_options(options))
    }

    /// Dispatch `ctx` and unwrap the converted value.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError::UnsupportedTypeVariable`] for unbound
    /// targets, [`ConversionError::NoApplicableConverter`] when nothing
    /// accepts the target, [`ConversionError::SkippedAfterAccept`] when the
    /// accepting converter declines, and any error the converter raises.
    pub fn convert_to_value(&self, ctx: &ConversionContext<'_>) -> Result<Value, ConversionError> {
        ctx.target().ensure_resolved()?;
        let raw = ctx.raw_type();
        let Some(converter) = self
            .converters
            .iter()
            .find(|converter| converter.can_convert_to(raw))
        else {
            return Err(ConversionError::NoApplicableConverter {
                target: ctx.target().clone(),
            });
        };
        debug!(
            converter = converter.name(),
            target = %ctx.target(),
            property = ctx.property(),
            "converting value"
        );
        match converter.convert(ctx)? {
            ConversionResult::Converted(value) => Ok(value),
            ConversionResult::Skipped => Err(ConversionError::SkippedAfterAccept {
                converter: converter.name(),
                target: ctx.target().clone(),
            }),
        }
    }
}

impl Converter for RootConverter {
    fn name(&self) -> &'static str {
        "root"
    }

    fn can_convert_to(&self, raw: &RawType) -> bool {
        self.converters
            .iter()
            .any(|converter| converter.can_convert_to(raw))
    }

    fn convert(&self, ctx: &ConversionContext<'_>) -> Result<ConversionResult, ConversionError> {
        self.convert_to_value(ctx).map(ConversionResult::Converted)
    }
}

impl Default for RootConverter {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl fmt::Debug for RootConverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.converter_names()).finish()
    }
}
