//! Error enums for each stage of the property pipeline.

use std::error::Error as StdError;

use figment::Error as FigmentError;
use thiserror::Error;

use super::aggregate::AggregatedErrors;
use crate::types::TypeDescriptor;

/// Boxed error used to carry third-party failure causes.
pub(crate) type BoxError = Box<dyn StdError + Send + Sync>;

/// Failures raised while turning a raw string into a target type.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConversionError {
    /// The target, or a required nested element type, is an unbound type
    /// parameter.
    #[error("type variables such as `{target}` cannot be used as conversion targets")]
    UnsupportedTypeVariable {
        /// Descriptor containing the type variable.
        target: TypeDescriptor,
    },

    /// No registered converter accepts the target type.
    #[error("no converter accepts target type `{target}`")]
    NoApplicableConverter {
        /// Descriptor nobody claimed.
        target: TypeDescriptor,
    },

    /// A converter accepted the target and then declined to convert it.
    #[error("converter `{converter}` accepted `{target}` but skipped the conversion")]
    SkippedAfterAccept {
        /// Name of the offending converter.
        converter: &'static str,
        /// Descriptor it accepted.
        target: TypeDescriptor,
    },

    /// The raw value is not valid numeric text for the target width.
    #[error("cannot parse '{value}' as `{target}`: {source}")]
    NumericFormat {
        /// Offending raw value.
        value: String,
        /// Numeric target type.
        target: TypeDescriptor,
        /// Parser failure.
        #[source]
        source: BoxError,
    },

    /// A `char` target received zero or several characters.
    #[error("expected a single character but found '{value}'")]
    InvalidChar {
        /// Offending raw value.
        value: String,
    },

    /// The raw value does not match the expected date/time layout.
    #[error("cannot parse '{value}' as `{target}`: {source}")]
    DateTimeFormat {
        /// Offending raw value.
        value: String,
        /// Temporal target type.
        target: TypeDescriptor,
        /// Parser failure.
        #[source]
        source: BoxError,
    },

    /// The raw value is not a human-readable duration.
    #[error("cannot parse '{value}' as a duration: {source}")]
    InvalidDuration {
        /// Offending raw value.
        value: String,
        /// Parser failure.
        #[source]
        source: humantime::DurationError,
    },

    /// The raw value names no variant of the target enumeration.
    #[error("'{value}' is not a variant of `{type_name}`")]
    UnknownVariant {
        /// Offending raw value.
        value: String,
        /// Enumeration name.
        type_name: &'static str,
    },

    /// A structured entry (map pair, properties line) is malformed.
    #[error("malformed entry '{entry}': {reason}")]
    MalformedEntry {
        /// Offending entry text.
        entry: String,
        /// Why the entry was rejected.
        reason: String,
    },

    /// A converted value could not be extracted as the requested Rust type.
    #[error("expected a value of type `{expected}` but found {found}")]
    ValueMismatch {
        /// Descriptor of the requested Rust type.
        expected: TypeDescriptor,
        /// Kind of the value actually produced.
        found: &'static str,
    },
}

/// Failures raised while expanding `${name}` style variables.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExpansionError {
    /// The resolver had no value for a referenced variable.
    #[error("failed to expand \"{name}\" variable in '{source_text}': value cannot be resolved")]
    UnresolvedVariable {
        /// Variable name between the markers.
        name: String,
        /// String being expanded.
        source_text: String,
    },

    /// The resolver itself failed.
    #[error("resolver failed while expanding '{source_text}': {source}")]
    Resolver {
        /// String being expanded.
        source_text: String,
        /// Resolver failure.
        #[source]
        source: ResolveError,
    },

    /// References kept nesting past the configured limit.
    #[error(
        "expansion of '{source_text}' nested more than {limit} levels deep; variables may reference themselves"
    )]
    DepthExceeded {
        /// String being expanded.
        source_text: String,
        /// Configured nesting limit.
        limit: usize,
    },

    /// A prefix or suffix marker was empty.
    #[error("variable {marker} must not be empty")]
    InvalidMarkers {
        /// Which marker was rejected.
        marker: &'static str,
    },

    /// A custom variable pattern failed validation or compilation.
    #[error("invalid variable pattern '{pattern}': {message}")]
    InvalidPattern {
        /// Pattern as supplied.
        pattern: String,
        /// Validation or compilation message.
        message: String,
    },

    /// A variable pattern captured an empty name.
    #[error("variable pattern '{pattern}' matched an empty name in '{source_text}'")]
    EmptyVariableName {
        /// Pattern in use.
        pattern: String,
        /// String being expanded.
        source_text: String,
    },
}

/// A property source failed while looking up a name.
#[derive(Debug, Error)]
#[error("failed to resolve property '{name}': {source}")]
pub struct ResolveError {
    name: String,
    #[source]
    source: BoxError,
}

impl ResolveError {
    /// Wraps `source` as a failure to resolve `name`.
    #[must_use]
    pub fn new(name: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }

    /// Name of the property being resolved.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A processor failed to transform a resolved value.
#[derive(Debug, Error)]
#[error("processor `{processor}` failed on property '{property}': {source}")]
pub struct ProcessingError {
    processor: &'static str,
    property: String,
    #[source]
    source: BoxError,
}

impl ProcessingError {
    /// Wraps `source` as a failure of `processor` on `property`.
    #[must_use]
    pub fn new(
        processor: &'static str,
        property: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        Self {
            processor,
            property: property.into(),
            source: source.into(),
        }
    }

    /// Name of the failing processor.
    #[must_use]
    pub const fn processor(&self) -> &'static str {
        self.processor
    }

    /// Property whose value was being processed.
    #[must_use]
    pub fn property(&self) -> &str {
        &self.property
    }
}

/// Errors surfaced by the public API.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PropsError {
    /// Conversion of a resolved value failed.
    #[error("failed to convert {}: {source}", describe_property(.property.as_deref()))]
    Conversion {
        /// Property being converted, when known.
        property: Option<String>,
        /// Underlying conversion failure.
        #[source]
        source: ConversionError,
    },

    /// Variable expansion failed.
    #[error(transparent)]
    Expansion(#[from] ExpansionError),

    /// A resolver failed.
    #[error(transparent)]
    Resolution(#[from] ResolveError),

    /// A processor failed.
    #[error(transparent)]
    Processing(#[from] ProcessingError),

    /// A required property has no value in any source.
    #[error("property '{name}' cannot be resolved")]
    UnresolvedProperty {
        /// Property name after variable expansion.
        name: String,
    },

    /// A view was asked for an accessor it does not define.
    #[error("no accessor named '{name}' is registered")]
    UnknownAccessor {
        /// Requested accessor name.
        name: String,
    },

    /// Builder or settings validation failed.
    #[error("invalid configuration for '{key}': {message}")]
    Configuration {
        /// Setting or component at fault.
        key: String,
        /// Human-readable explanation.
        message: String,
    },

    /// Loading settings through Figment failed.
    #[error("failed to gather settings: {0}")]
    Gathering(#[from] Box<FigmentError>),

    /// Several failures were collected in one pass.
    #[error("multiple property errors:\n{0}")]
    Aggregate(Box<AggregatedErrors>),
}

fn describe_property(property: Option<&str>) -> String {
    property.map_or_else(|| String::from("value"), |name| format!("property '{name}'"))
}
