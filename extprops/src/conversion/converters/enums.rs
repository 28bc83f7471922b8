use crate::conversion::{ConversionContext, ConversionResult, Converter};
use crate::error::ConversionError;
use crate::types::RawType;
use crate::value::Value;

/// Matches the raw value against an enumeration's variant names exactly.
#[derive(Clone, Copy, Debug, Default)]
pub struct EnumConverter;

impl Converter for EnumConverter {
    fn name(&self) -> &'static str {
        "enum"
    }

    fn can_convert_to(&self, raw: &RawType) -> bool {
        matches!(raw, RawType::Enum(_))
    }

    fn convert(&self, ctx: &ConversionContext<'_>) -> Result<ConversionResult, ConversionError> {
        let RawType::Enum(enum_type) = ctx.raw_type() else {
            return Ok(ConversionResult::Skipped);
        };
        let variant =
            enum_type
                .variant(ctx.value())
                .ok_or_else(|| ConversionError::UnknownVariant {
                    value: ctx.value().to_owned(),
                    type_name: enum_type.name(),
                })?;
        Ok(Value::Enum {
            type_name: enum_type.name(),
            variant,
        }
        .into())
    }
}
