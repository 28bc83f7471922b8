//! Normalised, possibly generic, conversion targets.
//!
//! A [`TypeDescriptor`] is a raw type plus an ordered list of type arguments.
//! Containers read their element types through
//! [`TypeDescriptor::element_type`], which defaults untyped containers to
//! strings and refuses unbound type variables.

use std::borrow::Cow;
use std::fmt;

use crate::error::ConversionError;

static STRING: TypeDescriptor = TypeDescriptor::of(RawType::String);

/// A closed set of named variants used by the enum converter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EnumType {
    name: &'static str,
    variants: &'static [&'static str],
}

impl EnumType {
    /// Declare an enumeration called `name` with the given variant names.
    #[must_use]
    pub const fn new(name: &'static str, variants: &'static [&'static str]) -> Self {
        Self { name, variants }
    }

    /// Enumeration name used in diagnostics.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Declared variant names in declaration order.
    #[must_use]
    pub const fn variants(&self) -> &'static [&'static str] {
        self.variants
    }

    /// Returns the declared variant exactly matching `candidate`.
    #[must_use]
    pub fn variant(&self, candidate: &str) -> Option<&'static str> {
        self.variants.iter().copied().find(|v| *v == candidate)
    }
}

/// Base identity of a target type, without its type arguments.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum RawType {
    /// UTF-8 text.
    String,
    /// Untyped target; converted as text.
    Object,
    /// Wildcard type argument; converted as text.
    Wildcard,
    /// `bool`.
    Bool,
    /// `char`.
    Char,
    /// `i8`.
    I8,
    /// `i16`.
    I16,
    /// `i32`.
    I32,
    /// `i64`.
    I64,
    /// `i128`, the big signed integer.
    I128,
    /// `isize`.
    Isize,
    /// `u8`.
    U8,
    /// `u16`.
    U16,
    /// `u32`.
    U32,
    /// `u64`.
    U64,
    /// `u128`, the big unsigned integer.
    U128,
    /// `usize`.
    Usize,
    /// `f32`.
    F32,
    /// `f64`.
    F64,
    /// Fixed-length sequence; one type argument.
    Array,
    /// Growable sequence; one type argument.
    List,
    /// Duplicate-free collection; one type argument.
    Set,
    /// Possibly absent value; one type argument.
    Optional,
    /// Key/value pairs; two type arguments.
    Map,
    /// Enumeration with named variants.
    Enum(EnumType),
    /// Date and time without an offset.
    DateTime,
    /// Calendar date.
    Date,
    /// Time of day.
    Time,
    /// Date and time with a fixed UTC offset.
    OffsetDateTime,
    /// Instant on the UTC timeline.
    Instant,
    /// Day of the week.
    Weekday,
    /// Month of the year.
    Month,
    /// Elapsed time span.
    Duration,
    /// Embedded `key=value` property listing.
    Properties,
    /// Application type handled by a custom converter.
    Named(Cow<'static, str>),
    /// Unbound generic parameter; never a valid target.
    TypeVariable(Cow<'static, str>),
}

impl RawType {
    /// Whether values of this type are passed through as text.
    #[must_use]
    pub const fn is_textual(&self) -> bool {
        matches!(self, Self::String | Self::Object | Self::Wildcard)
    }

    /// Whether this is an unbound type parameter.
    #[must_use]
    pub const fn is_type_variable(&self) -> bool {
        matches!(self, Self::TypeVariable(_))
    }

    /// Name used when rendering descriptors.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::String => "String",
            Self::Object => "Object",
            Self::Wildcard => "?",
            Self::Bool => "bool",
            Self::Char => "char",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::I128 => "i128",
            Self::Isize => "isize",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::U128 => "u128",
            Self::Usize => "usize",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Array => "Array",
            Self::List => "List",
            Self::Set => "Set",
            Self::Optional => "Optional",
            Self::Map => "Map",
            Self::Enum(e) => e.name(),
            Self::DateTime => "DateTime",
            Self::Date => "Date",
            Self::Time => "Time",
            Self::OffsetDateTime => "OffsetDateTime",
            Self::Instant => "Instant",
            Self::Weekday => "Weekday",
            Self::Month => "Month",
            Self::Duration => "Duration",
            Self::Properties => "Properties",
            Self::Named(name) | Self::TypeVariable(name) => name.as_ref(),
        }
    }
}

impl fmt::Display for RawType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Describes what a raw property string must become.
///
/// # Examples
///
/// ```
/// use extprops::{RawType, TypeDescriptor};
///
/// let ports = TypeDescriptor::list(TypeDescriptor::of(RawType::U16));
/// assert_eq!(ports.to_string(), "List<u16>");
/// assert_eq!(ports.element_type()?.raw_type(), &RawType::U16);
///
/// // Untyped containers hold strings.
/// let untyped = TypeDescriptor::of(RawType::List);
/// assert_eq!(untyped.element_type()?.raw_type(), &RawType::String);
/// # Ok::<(), extprops::ConversionError>(())
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeDescriptor {
    raw: RawType,
    arguments: Vec<TypeDescriptor>,
}

impl TypeDescriptor {
    /// A non-generic descriptor for `raw`.
    #[must_use]
    pub const fn of(raw: RawType) -> Self {
        Self {
            raw,
            arguments: Vec::new(),
        }
    }

    /// A descriptor for `raw` parameterised by `arguments`.
    #[must_use]
    pub fn with_arguments(raw: RawType, arguments: impl IntoIterator<Item = Self>) -> Self {
        Self {
            raw,
            arguments: arguments.into_iter().collect(),
        }
    }

    /// The descriptor of a Rust type implementing [`crate::FromProperty`].
    #[must_use]
    pub fn for_type<T: crate::FromProperty>() -> Self {
        T::descriptor()
    }

    /// `String`.
    #[must_use]
    pub const fn string() -> Self {
        Self::of(RawType::String)
    }

    /// Untyped `Object`.
    #[must_use]
    pub const fn object() -> Self {
        Self::of(RawType::Object)
    }

    /// Wildcard `?`.
    #[must_use]
    pub const fn wildcard() -> Self {
        Self::of(RawType::Wildcard)
    }

    /// An unbound type parameter such as `T`.
    #[must_use]
    pub fn type_variable(name: impl Into<Cow<'static, str>>) -> Self {
        Self::of(RawType::TypeVariable(name.into()))
    }

    /// An application type handled by a custom converter.
    #[must_use]
    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        Self::of(RawType::Named(name.into()))
    }

    /// An enumeration with the given variant names.
    #[must_use]
    pub const fn enumeration(name: &'static str, variants: &'static [&'static str]) -> Self {
        Self::of(RawType::Enum(EnumType::new(name, variants)))
    }

    /// `Array<element>`.
    #[must_use]
    pub fn array(element: Self) -> Self {
        Self::with_arguments(RawType::Array, [element])
    }

    /// `List<element>`.
    #[must_use]
    pub fn list(element: Self) -> Self {
        Self::with_arguments(RawType::List, [element])
    }

    /// `Set<element>`.
    #[must_use]
    pub fn set(element: Self) -> Self {
        Self::with_arguments(RawType::Set, [element])
    }

    /// `Optional<inner>`.
    #[must_use]
    pub fn optional(inner: Self) -> Self {
        Self::with_arguments(RawType::Optional, [inner])
    }

    /// `Map<key, value>`.
    #[must_use]
    pub fn map(key: Self, value: Self) -> Self {
        Self::with_arguments(RawType::Map, [key, value])
    }

    /// Base type identity.
    #[must_use]
    pub const fn raw_type(&self) -> &RawType {
        &self.raw
    }

    /// Ordered type arguments; empty when unparameterised.
    #[must_use]
    pub fn type_arguments(&self) -> &[Self] {
        &self.arguments
    }

    /// Whether this descriptor is an unbound type parameter.
    #[must_use]
    pub const fn is_unresolved_type_variable(&self) -> bool {
        self.raw.is_type_variable()
    }

    /// Fails when this descriptor is an unbound type parameter.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError::UnsupportedTypeVariable`].
    pub fn ensure_resolved(&self) -> Result<(), ConversionError> {
        if self.is_unresolved_type_variable() {
            return Err(ConversionError::UnsupportedTypeVariable {
                target: self.clone(),
            });
        }
        Ok(())
    }

    /// Element type of an array, list, set, or optional.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError::UnsupportedTypeVariable`] when the element
    /// type is an unbound type parameter.
    pub fn element_type(&self) -> Result<&Self, ConversionError> {
        self.argument_or_string(0)
    }

    /// Type argument at `index`, treating absent, `Object`, and wildcard
    /// arguments as `String`.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError::UnsupportedTypeVariable`] when the argument
    /// is an unbound type parameter.
    pub fn argument_or_string(&self, index: usize) -> Result<&Self, ConversionError> {
        match self.arguments.get(index) {
            None => Ok(&STRING),
            Some(arg) if arg.is_unresolved_type_variable() => {
                Err(ConversionError::UnsupportedTypeVariable {
                    target: self.clone(),
                })
            }
            Some(arg) if arg.raw.is_textual() => Ok(&STRING),
            Some(arg) => Ok(arg),
        }
    }
}

impl From<RawType> for TypeDescriptor {
    fn from(raw: RawType) -> Self {
        Self::of(raw)
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)?;
        if self.arguments.is_empty() {
            return Ok(());
        }
        f.write_str("<")?;
        for (i, arg) in self.arguments.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{arg}")?;
        }
        f.write_str(">")
    }
}
