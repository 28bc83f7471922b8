//! Booleans, characters, and fixed-width numbers.

use std::str::FromStr;

use crate::conversion::{ConversionContext, ConversionResult, Converter};
use crate::error::ConversionError;
use crate::types::RawType;
use crate::value::Value;

/// Converts `bool`, `char`, integers up to 64 bits, and floats.
///
/// A boolean is `true` only for a case-insensitive `"true"`; any other text
/// is `false`. Numbers use Rust's standard grammar for the target width and
/// malformed or out-of-range text is an error.
#[derive(Clone, Copy, Debug, Default)]
pub struct PrimitiveConverter;

pub(super) fn parse<T>(ctx: &ConversionContext<'_>) -> Result<T, ConversionError>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    ctx.value()
        .parse::<T>()
        .map_err(|source| ConversionError::NumericFormat {
            value: ctx.value().to_owned(),
            target: ctx.target().clone(),
            source: Box::new(source),
        })
}

fn widen<T, W>(ctx: &ConversionContext<'_>) -> Result<W, ConversionError>
where
    T: FromStr + TryInto<W>,
    T::Err: std::error::Error + Send + Sync + 'static,
    <T as TryInto<W>>::Error: std::error::Error + Send + Sync + 'static,
{
    parse::<T>(ctx)?
        .try_into()
        .map_err(|source| ConversionError::NumericFormat {
            value: ctx.value().to_owned(),
            target: ctx.target().clone(),
            source: Box::new(source),
        })
}

fn single_char(value: &str) -> Result<char, ConversionError> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(ConversionError::InvalidChar {
            value: value.to_owned(),
        }),
    }
}

impl Converter for PrimitiveConverter {
    fn name(&self) -> &'static str {
        "primitive"
    }

    fn can_convert_to(&self, raw: &RawType) -> bool {
        matches!(
            raw,
            RawType::Bool
                | RawType::Char
                | RawType::I8
                | RawType::I16
                | RawType::I32
                | RawType::I64
                | RawType::Isize
                | RawType::U8
                | RawType::U16
                | RawType::U32
                | RawType::U64
                | RawType::Usize
                | RawType::F32
                | RawType::F64
        )
    }

    fn convert(&self, ctx: &ConversionContext<'_>) -> Result<ConversionResult, ConversionError> {
        let value = match ctx.raw_type() {
            RawType::Bool => Value::Bool(ctx.value().eq_ignore_ascii_case("true")),
            RawType::Char => Value::Char(single_char(ctx.value())?),
            RawType::I8 => Value::Int(widen::<i8, _>(ctx)?),
            RawType::I16 => Value::Int(widen::<i16, _>(ctx)?),
            RawType::I32 => Value::Int(widen::<i32, _>(ctx)?),
            RawType::I64 => Value::Int(parse::<i64>(ctx)?),
            RawType::Isize => Value::Int(widen::<isize, _>(ctx)?),
            RawType::U8 => Value::UInt(widen::<u8, _>(ctx)?),
            RawType::U16 => Value::UInt(widen::<u16, _>(ctx)?),
            RawType::U32 => Value::UInt(widen::<u32, _>(ctx)?),
            RawType::U64 => Value::UInt(parse::<u64>(ctx)?),
            RawType::Usize => Value::UInt(widen::<usize, _>(ctx)?),
            RawType::F32 => Value::F32(parse::<f32>(ctx)?),
            RawType::F64 => Value::F64(parse::<f64>(ctx)?),
            _ => return Ok(ConversionResult::Skipped),
        };
        Ok(value.into())
    }
}
