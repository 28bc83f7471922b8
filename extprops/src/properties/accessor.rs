//! Start-up mapping from accessor names to property lookups.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::conversion::ConvertOptions;
use crate::processing::Processor;
use crate::types::{FromProperty, TypeDescriptor};
use crate::{PropsError, PropsResult};

/// One typed property lookup: what to resolve, what it becomes, and how.
///
/// # Examples
///
/// ```
/// use extprops::{Accessor, RawType, TypeDescriptor};
///
/// let hosts = Accessor::of::<Vec<String>>("hosts", "cluster.${env}.hosts")
///     .delimiter(";")
///     .strip_empty(true)
///     .default_value("localhost");
/// assert_eq!(hosts.property(), "cluster.${env}.hosts");
/// assert_eq!(hosts.target(), &TypeDescriptor::list(TypeDescriptor::string()));
/// ```
#[derive(Clone)]
pub struct Accessor {
    name: Cow<'static, str>,
    property: Cow<'static, str>,
    target: TypeDescriptor,
    delimiter: Option<Cow<'static, str>>,
    strip_empty: bool,
    date_format: Option<String>,
    default: Option<String>,
    processors: Vec<Arc<dyn Processor>>,
}

impl Accessor {
    /// Accessor `name` converting property `property` into `target`.
    ///
    /// The property name may contain variable references, which are expanded
    /// on every lookup.
    #[must_use]
    pub fn new(
        name: impl Into<Cow<'static, str>>,
        property: impl Into<Cow<'static, str>>,
        target: TypeDescriptor,
    ) -> Self {
        Self {
            name: name.into(),
            property: property.into(),
            target,
            delimiter: None,
            strip_empty: false,
            date_format: None,
            default: None,
            processors: Vec::new(),
        }
    }

    /// Accessor targeting the descriptor of `T`.
    #[must_use]
    pub fn of<T: FromProperty>(
        name: impl Into<Cow<'static, str>>,
        property: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::new(name, property, T::descriptor())
    }

    /// Split container values on `delimiter` instead of the configured one.
    #[must_use]
    pub fn delimiter(mut self, delimiter: impl Into<Cow<'static, str>>) -> Self {
        self.delimiter = Some(delimiter.into());
        self
    }

    /// Drop empty tokens from container values.
    #[must_use]
    pub const fn strip_empty(mut self, strip: bool) -> Self {
        self.strip_empty = strip;
        self
    }

    /// Parse date/time values with a chrono `strftime` pattern.
    #[must_use]
    pub fn date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = Some(format.into());
        self
    }

    /// Raw value converted when the property cannot be resolved.
    #[must_use]
    pub fn default_value(mut self, raw: impl Into<String>) -> Self {
        self.default = Some(raw.into());
        self
    }

    /// Append a processor applied to resolved values before conversion.
    #[must_use]
    pub fn processor(mut self, processor: impl Processor + 'static) -> Self {
        self.processors.push(Arc::new(processor));
        self
    }

    /// Accessor name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Property name, possibly containing variable references.
    #[must_use]
    pub fn property(&self) -> &str {
        &self.property
    }

    /// Conversion target.
    #[must_use]
    pub const fn target(&self) -> &TypeDescriptor {
        &self.target
    }

    /// Raw default value, if any.
    #[must_use]
    pub fn default_raw(&self) -> Option<&str> {
        self.default.as_deref()
    }

    /// Processors in application order.
    #[must_use]
    pub fn processors(&self) -> &[Arc<dyn Processor>] {
        &self.processors
    }

    /// Options for this accessor layered over `base`.
    #[must_use]
    pub fn convert_options(&self, base: &ConvertOptions) -> ConvertOptions {
        let mut options = base.clone().strip_empty(self.strip_empty || base.strips_empty());
        if let Some(delimiter) = &self.delimiter {
            options = options.delimiter(delimiter.clone());
        }
        if let Some(format) = &self.date_format {
            options = options.date_format(format.clone());
        }
        options
    }
}

impl fmt::Debug for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accessor")
            .field("name", &self.name)
            .field("property", &self.property)
            .field("target", &self.target.to_string())
            .field("default", &self.default)
            .field(
                "processors",
                &self.processors.iter().map(|p| p.name()).collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}

/// Accessors keyed by name, built once at start-up.
///
/// # Examples
///
/// ```
/// use extprops::{Accessor, AccessorTable};
///
/// let table = AccessorTable::new()
///     .with(Accessor::of::<u16>("port", "http.port"))?
///     .with(Accessor::of::<String>("host", "http.host"))?;
/// assert_eq!(table.len(), 2);
/// assert!(table.with(Accessor::of::<u32>("port", "other")).is_err());
/// # Ok::<(), std::sync::Arc<extprops::PropsError>>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct AccessorTable {
    accessors: Vec<Accessor>,
    index: HashMap<String, usize>,
}

impl AccessorTable {
    /// An empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from `accessors`.
    ///
    /// # Errors
    ///
    /// Returns [`PropsError::Configuration`] when two accessors share a name.
    pub fn from_accessors(accessors: impl IntoIterator<Item = Accessor>) -> PropsResult<Self> {
        accessors
            .into_iter()
            .try_fold(Self::new(), Self::with)
    }

    /// Add `accessor`, consuming and returning the table.
    ///
    /// # Errors
    ///
    /// Returns [`PropsError::Configuration`] when the name is already taken.
    pub fn with(mut self, accessor: Accessor) -> PropsResult<Self> {
        self.insert(accessor)?;
        Ok(self)
    }

    /// Add `accessor`.
    ///
    /// # Errors
    ///
    /// Returns [`PropsError::Configuration`] when the name is already taken.
    pub fn insert(&mut self, accessor: Accessor) -> PropsResult<()> {
        if self.index.contains_key(accessor.name()) {
            return Err(Arc::new(PropsError::configuration(
                "accessors",
                format!("duplicate accessor name '{}'", accessor.name()),
            )));
        }
        self.index.insert(accessor.name().to_owned(), self.accessors.len());
        self.accessors.push(accessor);
        Ok(())
    }

    /// Accessor registered under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Accessor> {
        self.index.get(name).and_then(|&i| self.accessors.get(i))
    }

    /// Accessors in registration order.
    pub fn iter(&self) -> std::slice::Iter<'_, Accessor> {
        self.accessors.iter()
    }

    /// Number of accessors.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.accessors.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.accessors.is_empty()
    }
}

impl<'a> IntoIterator for &'a AccessorTable {
    type Item = &'a Accessor;
    type IntoIter = std::slice::Iter<'a, Accessor>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
