//! Calendar and clock targets backed by `chrono`.

use chrono::{DateTime, Month, NaiveDate, NaiveDateTime, NaiveTime, Weekday};

use crate::conversion::{ConversionContext, ConversionResult, Converter};
use crate::error::ConversionError;
use crate::types::RawType;
use crate::value::Value;

/// Converts dates, times, offsets, instants, weekdays, and months.
///
/// Values are parsed as ISO-8601 (RFC 3339 for offsets and instants) unless
/// the request carries a custom `strftime` pattern, in which case the pattern
/// is used instead. Weekdays and months are matched by English name or
/// three-letter abbreviation, ignoring case.
#[derive(Clone, Copy, Debug, Default)]
pub struct DateTimeConverter;

fn format_error<'c, E>(ctx: &'c ConversionContext<'_>) -> impl FnOnce(E) -> ConversionError + 'c
where
    E: std::error::Error + Send + Sync + 'static,
{
    move |source| ConversionError::DateTimeFormat {
        value: ctx.value().to_owned(),
        target: ctx.target().clone(),
        source: Box::new(source),
    }
}

fn parse_default(raw: &RawType, text: &str) -> Option<Result<Value, chrono::ParseError>> {
    let parsed = match raw {
        RawType::DateTime => text.parse::<NaiveDateTime>().map(Value::DateTime),
        RawType::Date => text.parse::<NaiveDate>().map(Value::Date),
        RawType::Time => text.parse::<NaiveTime>().map(Value::Time),
        RawType::OffsetDateTime => DateTime::parse_from_rfc3339(text).map(Value::OffsetDateTime),
        RawType::Instant => {
            DateTime::parse_from_rfc3339(text).map(|instant| Value::Instant(instant.to_utc()))
        }
        _ => return None,
    };
    Some(parsed)
}

fn parse_with_format(
    raw: &RawType,
    text: &str,
    format: &str,
) -> Option<Result<Value, chrono::ParseError>> {
    let parsed = match raw {
        RawType::DateTime => NaiveDateTime::parse_from_str(text, format).map(Value::DateTime),
        RawType::Date => NaiveDate::parse_from_str(text, format).map(Value::Date),
        RawType::Time => NaiveTime::parse_from_str(text, format).map(Value::Time),
        RawType::OffsetDateTime => {
            DateTime::parse_from_str(text, format).map(Value::OffsetDateTime)
        }
        RawType::Instant => DateTime::parse_from_str(text, format)
            .map(|instant| Value::Instant(instant.to_utc())),
        _ => return None,
    };
    Some(parsed)
}

impl Converter for DateTimeConverter {
    fn name(&self) -> &'static str {
        "date-time"
    }

    fn can_convert_to(&self, raw: &RawType) -> bool {
        matches!(
            raw,
            RawType::DateTime
                | RawType::Date
                | RawType::Time
                | RawType::OffsetDateTime
                | RawType::Instant
                | RawType::Weekday
                | RawType::Month
        )
    }

    fn convert(&self, ctx: &ConversionContext<'_>) -> Result<ConversionResult, ConversionError> {
        let text = ctx.value().trim();
        let raw = ctx.raw_type();
        match raw {
            RawType::Weekday => {
                return text
                    .parse::<Weekday>()
                    .map(|day| Value::Weekday(day).into())
                    .map_err(format_error(ctx));
            }
            RawType::Month => {
                return text
                    .parse::<Month>()
                    .map(|month| Value::Month(month).into())
                    .map_err(format_error(ctx));
            }
            _ => {}
        }
        let parsed = ctx.options().date_format_str().map_or_else(
            || parse_default(raw, text),
            |format| parse_with_format(raw, text, format),
        );
        match parsed {
            Some(result) => result.map(ConversionResult::Converted).map_err(format_error(ctx)),
            None => Ok(ConversionResult::Skipped),
        }
    }
}
