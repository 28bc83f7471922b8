use crate::conversion::{ConversionContext, ConversionResult, Converter};
use crate::error::ConversionError;
use crate::types::RawType;
use crate::value::Value;

/// Parses human-readable spans such as `30s` or `1h 15m`.
#[derive(Clone, Copy, Debug, Default)]
pub struct DurationConverter;

impl Converter for DurationConverter {
    fn name(&self) -> &'static str {
        "duration"
    }

    fn can_convert_to(&self, raw: &RawType) -> bool {
        matches!(raw, RawType::Duration)
    }

    fn convert(&self, ctx: &ConversionContext<'_>) -> Result<ConversionResult, ConversionError> {
        humantime::parse_duration(ctx.value())
            .map(|duration| Value::Duration(duration).into())
            .map_err(|source| ConversionError::InvalidDuration {
                value: ctx.value().to_owned(),
                source,
            })
    }
}
