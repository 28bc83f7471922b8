//! Dynamically-typed conversion output.
//!
//! Converters produce [`Value`]s; [`crate::FromProperty`] extracts them into
//! concrete Rust types.

mod opaque;
mod properties;

use std::time::Duration;

use chrono::{DateTime, FixedOffset, Month, NaiveDate, NaiveDateTime, NaiveTime, Utc, Weekday};

pub use opaque::Opaque;
pub use properties::Properties;

/// A converted property value.
///
/// [`Value::Null`] is an explicitly converted null and is distinct from a
/// converter declining the target, which is
/// [`crate::ConversionResult::Skipped`].
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub enum Value {
    /// Explicitly converted null.
    Null,
    /// Text.
    String(String),
    /// Boolean.
    Bool(bool),
    /// Single character.
    Char(char),
    /// Signed integer up to 64 bits.
    Int(i64),
    /// Unsigned integer up to 64 bits.
    UInt(u64),
    /// Signed 128-bit integer.
    BigInt(i128),
    /// Unsigned 128-bit integer.
    BigUInt(u128),
    /// Single-precision float.
    F32(f32),
    /// Double-precision float.
    F64(f64),
    /// Fixed-length sequence.
    Array(Vec<Value>),
    /// Growable sequence.
    List(Vec<Value>),
    /// Duplicate-free collection in first-seen order.
    Set(Vec<Value>),
    /// Possibly absent value.
    Optional(Option<Box<Value>>),
    /// Key/value pairs in source order.
    Map(Vec<(Value, Value)>),
    /// Enumeration variant.
    Enum {
        /// Enumeration name.
        type_name: &'static str,
        /// Matched variant name.
        variant: &'static str,
    },
    /// Date and time without an offset.
    DateTime(NaiveDateTime),
    /// Calendar date.
    Date(NaiveDate),
    /// Time of day.
    Time(NaiveTime),
    /// Date and time with a fixed offset.
    OffsetDateTime(DateTime<FixedOffset>),
    /// Instant on the UTC timeline.
    Instant(DateTime<Utc>),
    /// Day of the week.
    Weekday(Weekday),
    /// Month of the year.
    Month(Month),
    /// Elapsed time span.
    Duration(Duration),
    /// Embedded property listing.
    Properties(Properties),
    /// Value produced by an application converter.
    Opaque(Opaque),
}

impl Value {
    /// Short name of this value's shape, used in diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::String(_) => "a string",
            Self::Bool(_) => "a boolean",
            Self::Char(_) => "a character",
            Self::Int(_) | Self::UInt(_) | Self::BigInt(_) | Self::BigUInt(_) => "an integer",
            Self::F32(_) | Self::F64(_) => "a float",
            Self::Array(_) => "an array",
            Self::List(_) => "a list",
            Self::Set(_) => "a set",
            Self::Optional(_) => "an optional",
            Self::Map(_) => "a map",
            Self::Enum { .. } => "an enum variant",
            Self::DateTime(_) => "a date-time",
            Self::Date(_) => "a date",
            Self::Time(_) => "a time",
            Self::OffsetDateTime(_) => "an offset date-time",
            Self::Instant(_) => "an instant",
            Self::Weekday(_) => "a weekday",
            Self::Month(_) => "a month",
            Self::Duration(_) => "a duration",
            Self::Properties(_) => "a property listing",
            Self::Opaque(_) => "an opaque value",
        }
    }

    /// Wrap an optional value.
    #[must_use]
    pub fn optional(value: Option<Self>) -> Self {
        Self::Optional(value.map(Box::new))
    }

    /// Wrap an application value produced by a custom converter.
    #[must_use]
    pub fn opaque<T>(value: T) -> Self
    where
        T: std::any::Any + Send + Sync,
    {
        Self::Opaque(Opaque::new(value))
    }

    /// Borrow the text of a [`Value::String`].
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Whether this is [`Value::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}
