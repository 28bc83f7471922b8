//! Delimited sequences: arrays, lists, and sets.

use crate::conversion::{ConversionContext, ConversionResult, Converter, split_tokens};
use crate::error::ConversionError;
use crate::types::RawType;
use crate::value::Value;

fn convert_elements(ctx: &ConversionContext<'_>) -> Result<Vec<Value>, ConversionError> {
    let element = ctx.target().element_type()?;
    split_tokens(ctx, ctx.value())
        .into_iter()
        .map(|token| ctx.convert_nested(token, element))
        .collect()
}

/// Converts delimited text into a fixed-length [`Value::Array`].
#[derive(Clone, Copy, Debug, Default)]
pub struct ArrayConverter;

impl Converter for ArrayConverter {
    fn name(&self) -> &'static str {
        "array"
    }

    fn can_convert_to(&self, raw: &RawType) -> bool {
        matches!(raw, RawType::Array)
    }

    fn convert(&self, ctx: &ConversionContext<'_>) -> Result<ConversionResult, ConversionError> {
        convert_elements(ctx).map(|items| Value::Array(items).into())
    }
}

/// Converts delimited text into a [`Value::List`].
#[derive(Clone, Copy, Debug, Default)]
pub struct ListConverter;

impl Converter for ListConverter {
    fn name(&self) -> &'static str {
        "list"
    }

    fn can_convert_to(&self, raw: &RawType) -> bool {
        matches!(raw, RawType::List)
    }

    fn convert(&self, ctx: &ConversionContext<'_>) -> Result<ConversionResult, ConversionError> {
        convert_elements(ctx).map(|items| Value::List(items).into())
    }
}

/// Converts delimited text into a [`Value::Set`], keeping the first
/// occurrence of each element.
#[derive(Clone, Copy, Debug, Default)]
pub struct SetConverter;

impl Converter for SetConverter {
    fn name(&self) -> &'static str {
        "set"
    }

    fn can_convert_to(&self, raw: &RawType) -> bool {
        matches!(raw, RawType::Set)
    }

    fn convert(&self, ctx: &ConversionContext<'_>) -> Result<ConversionResult, ConversionError> {
        let mut unique: Vec<Value> = Vec::new();
        for item in convert_elements(ctx)? {
            if !unique.contains(&item) {
                unique.push(item);
            }
        }
        Ok(Value::Set(unique).into())
    }
}
