//! Binding between Rust types and conversion targets.
//!
//! Each implementation names the [`TypeDescriptor`] the converter chain must
//! produce and extracts the matching [`Value`] into `Self`.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::hash::{BuildHasher, Hash};
use std::time::Duration;

use chrono::{DateTime, FixedOffset, Month, NaiveDate, NaiveDateTime, NaiveTime, Utc, Weekday};

use super::{RawType, TypeDescriptor};
use crate::error::ConversionError;
use crate::value::{Properties, Value};

/// A Rust type that can be produced from a property value.
///
/// Implement this for application enums (pairing it with
/// [`TypeDescriptor::enumeration`]) or for types handled by a custom
/// converter (pairing it with [`TypeDescriptor::named`]).
///
/// # Examples
///
/// ```
/// use extprops::{ConversionError, FromProperty, TypeDescriptor, Value};
///
/// #[derive(Debug, PartialEq)]
/// enum Level { Debug, Info }
///
/// impl FromProperty for Level {
///     fn descriptor() -> TypeDescriptor {
///         TypeDescriptor::enumeration("Level", &["Debug", "Info"])
///     }
///
///     fn from_value(value: Value) -> Result<Self, ConversionError> {
///         match value {
///             Value::Enum { variant: "Debug", .. } => Ok(Self::Debug),
///             Value::Enum { variant: "Info", .. } => Ok(Self::Info),
///             other => Err(ConversionError::mismatch(Self::descriptor(), &other)),
///         }
///     }
/// }
/// ```
pub trait FromProperty: Sized {
    /// Conversion target describing `Self`.
    fn descriptor() -> TypeDescriptor;

    /// Extract `Self` from a converted value.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError::ValueMismatch`] when `value` has the wrong
    /// shape or does not fit in `Self`.
    fn from_value(value: Value) -> Result<Self, ConversionError>;
}

fn mismatch<T: FromProperty>(value: &Value) -> ConversionError {
    ConversionError::mismatch(T::descriptor(), value)
}

impl FromProperty for Value {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::object()
    }

    fn from_value(value: Value) -> Result<Self, ConversionError> {
        Ok(value)
    }
}

impl FromProperty for String {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::string()
    }

    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

macro_rules! scalar {
    ($($ty:ty => $raw:ident($variant:ident)),* $(,)?) => {$(
        impl FromProperty for $ty {
            fn descriptor() -> TypeDescriptor {
                TypeDescriptor::of(RawType::$raw)
            }

            fn from_value(value: Value) -> Result<Self, ConversionError> {
                match value {
                    Value::$variant(v) => Ok(v),
                    other => Err(mismatch::<Self>(&other)),
                }
            }
        }
    )*};
}

scalar! {
    bool => Bool(Bool),
    char => Char(Char),
    f32 => F32(F32),
    f64 => F64(F64),
    NaiveDateTime => DateTime(DateTime),
    NaiveDate => Date(Date),
    NaiveTime => Time(Time),
    DateTime<FixedOffset> => OffsetDateTime(OffsetDateTime),
    DateTime<Utc> => Instant(Instant),
    Weekday => Weekday(Weekday),
    Month => Month(Month),
    Duration => Duration(Duration),
    Properties => Properties(Properties),
}

macro_rules! integer {
    ($($ty:ty => $raw:ident),* $(,)?) => {$(
        impl FromProperty for $ty {
            fn descriptor() -> TypeDescriptor {
                TypeDescriptor::of(RawType::$raw)
            }

            fn from_value(value: Value) -> Result<Self, ConversionError> {
                let narrowed = match &value {
                    Value::Int(v) => Self::try_from(*v).ok(),
                    Value::UInt(v) => Self::try_from(*v).ok(),
                    Value::BigInt(v) => Self::try_from(*v).ok(),
                    Value::BigUInt(v) => Self::try_from(*v).ok(),
                    _ => None,
                };
                narrowed.ok_or_else(|| mismatch::<Self>(&value))
            }
        }
    )*};
}

integer! {
    i8 => I8, i16 => I16, i32 => I32, i64 => I64, i128 => I128, isize => Isize,
    u8 => U8, u16 => U16, u32 => U32, u64 => U64, u128 => U128, usize => Usize,
}

fn sequence_of<C, T>(value: Value) -> Result<Vec<T>, ConversionError>
where
    C: FromProperty,
    T: FromProperty,
{
    match value {
        Value::Array(items) | Value::List(items) | Value::Set(items) => {
            items.into_iter().map(T::from_value).collect()
        }
        other => Err(mismatch::<C>(&other)),
    }
}

impl<T: FromProperty> FromProperty for Vec<T> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::list(T::descriptor())
    }

    fn from_value(value: Value) -> Result<Self, ConversionError> {
        sequence_of::<Self, T>(value)
    }
}

impl<T: FromProperty> FromProperty for Box<[T]> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::array(T::descriptor())
    }

    fn from_value(value: Value) -> Result<Self, ConversionError> {
        sequence_of::<Self, T>(value).map(Vec::into_boxed_slice)
    }
}

impl<T, S> FromProperty for HashSet<T, S>
where
    T: FromProperty + Eq + Hash,
    S: BuildHasher + Default,
{
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::set(T::descriptor())
    }

    fn from_value(value: Value) -> Result<Self, ConversionError> {
        sequence_of::<Self, T>(value).map(|items| items.into_iter().collect())
    }
}

impl<T: FromProperty + Ord> FromProperty for BTreeSet<T> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::set(T::descriptor())
    }

    fn from_value(value: Value) -> Result<Self, ConversionError> {
        sequence_of::<Self, T>(value).map(|items| items.into_iter().collect())
    }
}

impl<T: FromProperty> FromProperty for Option<T> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::optional(T::descriptor())
    }

    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::Optional(None) | Value::Null => Ok(None),
            Value::Optional(Some(inner)) => T::from_value(*inner).map(Some),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

fn entries<C, K, V>(value: Value) -> Result<Vec<(K, V)>, ConversionError>
where
    C: FromProperty,
    K: FromProperty,
    V: FromProperty,
{
    match value {
        Value::Map(pairs) => pairs
            .into_iter()
            .map(|(k, v)| Ok((K::from_value(k)?, V::from_value(v)?)))
            .collect(),
        other => Err(mismatch::<C>(&other)),
    }
}

impl<K, V, S> FromProperty for HashMap<K, V, S>
where
    K: FromProperty + Eq + Hash,
    V: FromProperty,
    S: BuildHasher + Default,
{
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::map(K::descriptor(), V::descriptor())
    }

    fn from_value(value: Value) -> Result<Self, ConversionError> {
        entries::<Self, K, V>(value).map(|pairs| pairs.into_iter().collect())
    }
}

impl<K, V> FromProperty for BTreeMap<K, V>
where
    K: FromProperty + Ord,
    V: FromProperty,
{
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::map(K::descriptor(), V::descriptor())
    }

    fn from_value(value: Value) -> Result<Self, ConversionError> {
        entries::<Self, K, V>(value).map(|pairs| pairs.into_iter().collect())
    }
}
