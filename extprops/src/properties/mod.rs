//! The composition root.
//!
//! [`ExternalizedProperties`] ties a resolver chain, a variable expander, and
//! a converter chain together. [`PropertyView`] exposes an
//! [`AccessorTable`] through it, standing in for an interface whose methods
//! each map to one property.

mod accessor;
mod builder;
mod view;

use std::fmt;
use std::sync::Arc;

use tracing::debug;

pub use accessor::{Accessor, AccessorTable};
pub use builder::ExternalizedPropertiesBuilder;
pub use view::PropertyView;

use crate::conversion::{ConversionContext, ConvertOptions, RootConverter};
use crate::expansion::VariableExpander;
use crate::resolver::Resolver;
use crate::settings::Settings;
use crate::types::{FromProperty, TypeDescriptor};
use crate::value::Value;
use crate::{PropsError, PropsResult, PropsResultExt};

struct Inner {
    resolver: Arc<dyn Resolver>,
    expander: Arc<dyn VariableExpander>,
    converter: RootConverter,
    options: ConvertOptions,
    settings: Settings,
}

/// Resolves, expands, and converts externally configured properties.
///
/// Cloning is cheap; clones share the same resolvers and converters.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use extprops::ExternalizedProperties;
/// use extprops::resolver::MapResolver;
///
/// let props = ExternalizedProperties::builder()
///     .resolver(MapResolver::from_iter([
///         ("env", "prod"),
///         ("prod.timeout", "1m 30s"),
///         ("ports", "80,443"),
///     ]))
///     .build()?;
///
/// let timeout: Duration = props.require("${env}.timeout")?;
/// assert_eq!(timeout, Duration::from_secs(90));
/// let ports: Option<Vec<u16>> = props.resolve_as("ports")?;
/// assert_eq!(ports, Some(vec![80, 443]));
/// assert_eq!(props.resolve_as::<String>("missing")?, None);
/// # Ok::<(), std::sync::Arc<extprops::PropsError>>(())
/// ```
#[derive(Clone)]
pub struct ExternalizedProperties {
    inner: Arc<Inner>,
}

impl ExternalizedProperties {
    /// Start configuring an instance.
    #[must_use]
    pub fn builder() -> ExternalizedPropertiesBuilder {
        ExternalizedPropertiesBuilder::new()
    }

    /// Settings the instance was built with.
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.inner.settings
    }

    /// The converter chain.
    #[must_use]
    pub fn converter(&self) -> &RootConverter {
        &self.inner.converter
    }

    /// Default conversion options derived from the settings.
    #[must_use]
    pub fn convert_options(&self) -> &ConvertOptions {
        &self.inner.options
    }

    /// Expand variable references in `source`.
    ///
    /// # Errors
    ///
    /// Returns [`PropsError::Expansion`] when a variable cannot be resolved.
    pub fn expand_variables(&self, source: &str) -> PropsResult<String> {
        self.inner.expander.expand(source).into_props()
    }

    /// Resolve `name` after expanding variables in it, then expand variables
    /// in the value when `expand_values` is enabled.
    ///
    /// # Errors
    ///
    /// Returns [`PropsError::Expansion`] or [`PropsError::Resolution`] when
    /// expansion or a resolver fails. A missing property is `Ok(None)`.
    pub fn resolve_property(&self, name: &str) -> PropsResult<Option<String>> {
        self.resolve_expanded(name).map(|(_, value)| value)
    }

    /// Like [`Self::resolve_property`], also returning the expanded name.
    pub(crate) fn resolve_expanded(&self, name: &str) -> PropsResult<(String, Option<String>)> {
        let expanded_name = self.expand_variables(name)?;
        let Some(raw) = self.inner.resolver.resolve(&expanded_name).into_props()? else {
            debug!(property = %expanded_name, "property not resolved");
            return Ok((expanded_name, None));
        };
        debug!(property = %expanded_name, "property resolved");
        let value = if self.inner.settings.expand_values {
            self.expand_variables(&raw)?
        } else {
            raw
        };
        Ok((expanded_name, Some(value)))
    }

    /// Resolve `name` and convert it into `target`.
    ///
    /// # Errors
    ///
    /// Returns any resolution failure, or [`PropsError::Conversion`] naming
    /// the property when conversion fails.
    pub fn resolve_typed(&self, name: &str, target: &TypeDescriptor) -> PropsResult<Option<Value>> {
        let (property, raw) = self.resolve_expanded(name)?;
        raw.map(|value| self.convert_for(&property, &value, target, &self.inner.options))
            .transpose()
    }

    /// Resolve `name` and convert it into `T`.
    ///
    /// # Errors
    ///
    /// See [`Self::resolve_typed`].
    pub fn resolve_as<T: FromProperty>(&self, name: &str) -> PropsResult<Option<T>> {
        let (property, raw) = self.resolve_expanded(name)?;
        raw.map(|value| {
            let converted = self.convert_for(&property, &value, &T::descriptor(), &self.inner.options)?;
            extract(&property, converted)
        })
        .transpose()
    }

    /// Resolve `name` and convert it into `T`, failing when it is absent.
    ///
    /// # Errors
    ///
    /// Returns [`PropsError::UnresolvedProperty`] when no resolver has the
    /// property, and otherwise as [`Self::resolve_as`].
    pub fn require<T: FromProperty>(&self, name: &str) -> PropsResult<T> {
        let (property, raw) = self.resolve_expanded(name)?;
        let value = raw.ok_or_else(|| Arc::new(PropsError::unresolved(property.as_str())))?;
        let converted = self.convert_for(&property, &value, &T::descriptor(), &self.inner.options)?;
        extract(&property, converted)
    }

    /// Convert `raw` into `T` without resolving anything.
    ///
    /// # Errors
    ///
    /// Returns [`PropsError::Conversion`] when conversion fails.
    pub fn convert<T: FromProperty>(&self, raw: &str) -> PropsResult<T> {
        let value = self.convert_value(raw, &T::descriptor())?;
        T::from_value(value).into_props()
    }

    /// Convert `raw` into `target` without resolving anything.
    ///
    /// # Errors
    ///
    /// Returns [`PropsError::Conversion`] when conversion fails.
    pub fn convert_value(&self, raw: &str, target: &TypeDescriptor) -> PropsResult<Value> {
        self.inner
            .converter
            .convert_with(raw, target, &self.inner.options)
            .into_props()
    }

    /// Expose `table` through this instance.
    ///
    /// # Errors
    ///
    /// With eager loading enabled, returns the failures of every accessor
    /// that could not be loaded; see [`PropertyView::new`].
    pub fn view(&self, table: AccessorTable) -> PropsResult<PropertyView> {
        PropertyView::new(self.clone(), table)
    }

    pub(crate) fn convert_for(
        &self,
        property: &str,
        raw: &str,
        target: &TypeDescriptor,
        options: &ConvertOptions,
    ) -> PropsResult<Value> {
        let ctx = ConversionContext::new(&self.inner.converter, raw, target)
            .with_options(options)
            .for_property(property);
        self.inner
            .converter
            .convert_to_value(&ctx)
            .map_err(|source| Arc::new(PropsError::conversion(property, source)))
    }
}

pub(crate) fn extract<T: FromProperty>(property: &str, value: Value) -> PropsResult<T> {
    T::from_value(value).map_err(|source| Arc::new(PropsError::conversion(property, source)))
}

impl fmt::Debug for ExternalizedProperties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExternalizedProperties")
            .field("converter", &self.inner.converter)
            .field("settings", &self.inner.settings)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
