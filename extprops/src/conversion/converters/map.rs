use crate::conversion::{ConversionContext, ConversionResult, Converter, split_tokens};
use crate::error::ConversionError;
use crate::types::RawType;
use crate::value::Value;

/// Converts `key=value` entries separated by the delimiter into a
/// [`Value::Map`].
///
/// Each entry splits on its first `=`. Keys and values are converted against
/// the first and second type arguments, which default to `String`.
#[derive(Clone, Copy, Debug, Default)]
pub struct MapConverter;

impl Converter for MapConverter {
    fn name(&self) -> &'static str {
        "map"
    }

    fn can_convert_to(&self, raw: &RawType) -> bool {
        matches!(raw, RawType::Map)
    }

    fn convert(&self, ctx: &ConversionContext<'_>) -> Result<ConversionResult, ConversionError> {
        let key_type = ctx.target().argument_or_string(0)?;
        let value_type = ctx.target().argument_or_string(1)?;
        let entries = split_tokens(ctx, ctx.value())
            .into_iter()
            .map(|entry| {
                let (key, value) =
                    entry
                        .split_once('=')
                        .ok_or_else(|| ConversionError::MalformedEntry {
                            entry: entry.to_owned(),
                            reason: "expected key=value".to_owned(),
                        })?;
                Ok((
                    ctx.convert_nested(key, key_type)?,
                    ctx.convert_nested(value, value_type)?,
                ))
            })
            .collect::<Result<Vec<_>, ConversionError>>()?;
        Ok(Value::Map(entries).into())
    }
}
