use super::primitive::parse;
use crate::conversion::{ConversionContext, ConversionResult, Converter};
use crate::error::ConversionError;
use crate::types::RawType;
use crate::value::Value;

/// Converts 128-bit integers, the widest exact numeric targets.
#[derive(Clone, Copy, Debug, Default)]
pub struct BigNumberConverter;

impl Converter for BigNumberConverter {
    fn name(&self) -> &'static str {
        "big-number"
    }

    fn can_convert_to(&self, raw: &RawType) -> bool {
        matches!(raw, RawType::I128 | RawType::U128)
    }

    fn convert(&self, ctx: &ConversionContext<'_>) -> Result<ConversionResult, ConversionError> {
        let value = match ctx.raw_type() {
            RawType::I128 => Value::BigInt(parse(ctx)?),
            RawType::U128 => Value::BigUInt(parse(ctx)?),
            _ => return Ok(ConversionResult::Skipped),
        };
        Ok(value.into())
    }
}
