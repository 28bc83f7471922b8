//! Typed access to externally configured properties.
//!
//! `extprops` resolves property values from pluggable sources, expands
//! `${name}` references inside names and values, and converts the resulting
//! strings into typed values through an ordered chain of converters.
//!
//! - [`resolver`] holds the property sources and the [`Resolver`] trait.
//! - [`expansion`] rewrites variable references.
//! - [`conversion`] dispatches raw strings to leaf converters.
//! - [`ExternalizedProperties`] assembles the pipeline; [`PropertyView`]
//!   exposes an [`AccessorTable`] through it.
//!
//! # Examples
//!
//! ```
//! use extprops::{Accessor, AccessorTable, ExternalizedProperties};
//! use extprops::resolver::MapResolver;
//!
//! let props = ExternalizedProperties::builder()
//!     .resolver(MapResolver::from_iter([
//!         ("region", "eu"),
//!         ("eu.replicas", "db-1, db-2"),
//!     ]))
//!     .default_resolvers()
//!     .build()?;
//!
//! let view = props.view(AccessorTable::from_accessors([
//!     Accessor::of::<Vec<String>>("replicas", "${region}.replicas").delimiter(", "),
//! ])?)?;
//! assert_eq!(view.get_as::<Vec<String>>("replicas")?, ["db-1", "db-2"]);
//! # Ok::<(), std::sync::Arc<extprops::PropsError>>(())
//! ```

pub mod cache;
pub mod conversion;
mod error;
pub mod expansion;
pub mod processing;
mod properties;
pub mod resolver;
mod result_ext;
mod settings;
mod types;
mod value;

pub use conversion::{ConversionResult, ConvertOptions, Converter, RootConverter};
pub use error::{
    AggregatedErrors, ConversionError, ExpansionError, ProcessingError, PropsError, PropsResult,
    ResolveError,
};
pub use expansion::VariableExpander;
pub use properties::{
    Accessor, AccessorTable, ExternalizedProperties, ExternalizedPropertiesBuilder, PropertyView,
};
pub use resolver::Resolver;
pub use result_ext::{IntoFigmentError, PropsResultExt};
pub use settings::{SETTINGS_FILE, Settings};
pub use types::{EnumType, FromProperty, RawType, TypeDescriptor};
pub use value::{Opaque, Properties, Value};
