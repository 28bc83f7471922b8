//! Assembly of [`ExternalizedProperties`].

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use super::{ExternalizedProperties, Inner};
use crate::cache::ExpiringCacheStrategy;
use crate::conversion::{ConvertOptions, Converter, RootConverter, converters};
use crate::error::ExpansionError;
use crate::expansion::{NoOpVariableExpander, SimpleVariableExpander, VariableExpander};
use crate::resolver::{CachingResolver, EnvResolver, Resolver, ResolverChain};
use crate::settings::Settings;
use crate::{PropsError, PropsResult, PropsResultExt};

type ExpanderFactory =
    Box<dyn FnOnce(Arc<dyn Resolver>) -> Result<Arc<dyn VariableExpander>, ExpansionError>>;

enum ExpanderChoice {
    Markers,
    Disabled,
    Custom(ExpanderFactory),
}

/// Configures and builds [`ExternalizedProperties`].
///
/// Resolvers and converters are consulted in the order they are added. When
/// no converter is added, the built-in set is used.
///
/// # Examples
///
/// ```
/// use extprops::ExternalizedProperties;
/// use extprops::expansion::PatternVariableExpander;
/// use extprops::resolver::MapResolver;
///
/// let props = ExternalizedProperties::builder()
///     .resolver(MapResolver::from_iter([("user", "ada"), ("greeting", "hi #[user]")]))
///     .variable_expander_with(|resolver| {
///         PatternVariableExpander::with_pattern(resolver, r"#\[(.+?)\]")
///     })
///     .build()?;
/// assert_eq!(props.resolve_property("greeting")?, Some("hi ada".to_owned()));
/// # Ok::<(), std::sync::Arc<extprops::PropsError>>(())
/// ```
pub struct ExternalizedPropertiesBuilder {
    resolvers: Vec<Arc<dyn Resolver>>,
    converters: Vec<Arc<dyn Converter>>,
    expander: ExpanderChoice,
    settings: Settings,
}

impl ExternalizedPropertiesBuilder {
    /// A builder with no resolvers, the built-in converters, and default
    /// settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            resolvers: Vec::new(),
            converters: Vec::new(),
            expander: ExpanderChoice::Markers,
            settings: Settings::default(),
        }
    }

    /// Add a property source.
    #[must_use]
    pub fn resolver(mut self, resolver: impl Resolver + 'static) -> Self {
        self.resolvers.push(Arc::new(resolver));
        self
    }

    /// Add an already shared property source.
    #[must_use]
    pub fn shared_resolver(mut self, resolver: Arc<dyn Resolver>) -> Self {
        self.resolvers.push(resolver);
        self
    }

    /// Add the process environment as a property source.
    #[must_use]
    pub fn default_resolvers(self) -> Self {
        self.resolver(EnvResolver::new())
    }

    /// Add a converter ahead of any added later.
    #[must_use]
    pub fn converter(mut self, converter: impl Converter + 'static) -> Self {
        self.converters.push(Arc::new(converter));
        self
    }

    /// Add the built-in converters at this point in the chain.
    #[must_use]
    pub fn default_converters(mut self) -> Self {
        self.converters.extend(converters::defaults());
        self
    }

    /// Use `expander` instead of the marker-based expander.
    #[must_use]
    pub fn variable_expander(mut self, expander: impl VariableExpander + 'static) -> Self {
        let shared: Arc<dyn VariableExpander> = Arc::new(expander);
        self.expander = ExpanderChoice::Custom(Box::new(move |_| Ok(shared)));
        self
    }

    /// Build the expander from the assembled resolver chain.
    #[must_use]
    pub fn variable_expander_with<F, E>(mut self, factory: F) -> Self
    where
        F: FnOnce(Arc<dyn Resolver>) -> Result<E, ExpansionError> + 'static,
        E: VariableExpander + 'static,
    {
        self.expander = ExpanderChoice::Custom(Box::new(move |resolver| {
            factory(resolver).map(|expander| Arc::new(expander) as Arc<dyn VariableExpander>)
        }));
        self
    }

    /// Leave variable references untouched.
    #[must_use]
    pub fn no_variable_expansion(mut self) -> Self {
        self.expander = ExpanderChoice::Disabled;
        self
    }

    /// Replace all settings.
    #[must_use]
    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Cache resolved values for `ttl`.
    #[must_use]
    pub const fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.settings.cache_ttl = Some(ttl);
        self
    }

    /// Resolve every accessor when a view is created.
    #[must_use]
    pub const fn eager_loading(mut self, eager: bool) -> Self {
        self.settings.eager_loading = eager;
        self
    }

    /// Assemble the configured components.
    ///
    /// # Errors
    ///
    /// Returns [`PropsError::Configuration`] when no resolver was added, the
    /// settings are invalid, or the converter chain cannot fall back to
    /// `String`; returns [`PropsError::Expansion`] when a custom expander
    /// cannot be built.
    pub fn build(self) -> PropsResult<ExternalizedProperties> {
        let Self {
            resolvers,
            converters: registered,
            expander: expander_choice,
            settings,
        } = self;
        settings.validate()?;
        if resolvers.is_empty() {
            return Err(Arc::new(PropsError::configuration(
                "resolvers",
                "at least one resolver is required",
            )));
        }
        let mut chain = ResolverChain::new();
        for source in resolvers {
            chain.push(source);
        }
        let resolver: Arc<dyn Resolver> = match settings.cache_ttl {
            Some(ttl) => Arc::new(CachingResolver::new(
                chain,
                Arc::new(ExpiringCacheStrategy::<String, String>::new(ttl)),
            )),
            None => Arc::new(chain),
        };
        let converter = if registered.is_empty() {
            RootConverter::with_defaults()
        } else {
            RootConverter::new(registered)?
        };
        let expander: Arc<dyn VariableExpander> = match expander_choice {
            ExpanderChoice::Markers => Arc::new(
                SimpleVariableExpander::with_markers(
                    Arc::clone(&resolver),
                    settings.variable_prefix.clone(),
                    settings.variable_suffix.clone(),
                )
                .into_props()?
                .max_depth(settings.max_expansion_depth),
            ),
            ExpanderChoice::Disabled => Arc::new(NoOpVariableExpander),
            ExpanderChoice::Custom(factory) => factory(Arc::clone(&resolver)).into_props()?,
        };
        let options = ConvertOptions::new().delimiter(settings.delimiter.clone());
        Ok(ExternalizedProperties {
            inner: Arc::new(Inner {
                resolver,
                expander,
                converter,
                options,
                settings,
            }),
        })
    }
}

impl Default for ExternalizedPropertiesBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ExternalizedPropertiesBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExternalizedPropertiesBuilder")
            .field("resolvers", &self.resolvers.len())
            .field("converters", &self.converters.len())
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
