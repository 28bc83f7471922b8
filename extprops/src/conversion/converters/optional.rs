use crate::conversion::{ConversionContext, ConversionResult, Converter};
use crate::error::ConversionError;
use crate::types::RawType;
use crate::value::Value;

/// Wraps the converted inner value in [`Value::Optional`].
///
/// Empty text is an empty optional. Text destined for an untyped, `Object`,
/// or wildcard inner type is kept as a string. A converted
/// [`Value::Null`] also becomes an empty optional.
#[derive(Clone, Copy, Debug, Default)]
pub struct OptionalConverter;

impl Converter for OptionalConverter {
    fn name(&self) -> &'static str {
        "optional"
    }

    fn can_convert_to(&self, raw: &RawType) -> bool {
        matches!(raw, RawType::Optional)
    }

    fn convert(&self, ctx: &ConversionContext<'_>) -> Result<ConversionResult, ConversionError> {
        let inner = ctx.target().element_type()?;
        if ctx.value().is_empty() {
            return Ok(Value::Optional(None).into());
        }
        let converted = if inner.raw_type().is_textual() {
            Value::from(ctx.value())
        } else {
            ctx.convert_nested(ctx.value(), inner)?
        };
        Ok(Value::optional((!converted.is_null()).then_some(converted)).into())
    }
}
