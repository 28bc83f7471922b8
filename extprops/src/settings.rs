//! Layered configuration for the library itself.
//!
//! [`Settings`] controls expansion markers, collection delimiters, caching,
//! and eager loading. Values come from defaults, an optional
//! `extprops.toml`, and prefixed environment variables, in that order.

use std::sync::Arc;
use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uncased::Uncased;

use crate::conversion::DEFAULT_DELIMITER;
use crate::expansion::{DEFAULT_MAX_DEPTH, DEFAULT_PREFIX, DEFAULT_SUFFIX};
use crate::{PropsError, PropsResult, PropsResultExt};

/// File consulted by [`Settings::load`] in the working directory.
pub const SETTINGS_FILE: &str = "extprops.toml";

/// Library settings.
///
/// # Examples
///
/// ```
/// use figment::{Figment, providers::{Format, Toml}};
/// use extprops::Settings;
///
/// let figment = Figment::from(Toml::string("delimiter = ';'\ncache_ttl = '5m'"));
/// let settings = Settings::from_figment(&figment)?;
/// assert_eq!(settings.delimiter, ";");
/// assert_eq!(settings.cache_ttl.map(|ttl| ttl.as_secs()), Some(300));
/// assert_eq!(settings.variable_prefix, "${");
/// # Ok::<(), std::sync::Arc<extprops::PropsError>>(())
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Marker opening a variable reference.
    pub variable_prefix: String,
    /// Marker closing a variable reference.
    pub variable_suffix: String,
    /// Nesting cap for references inside substituted values.
    pub max_expansion_depth: usize,
    /// Default delimiter for collection and map values.
    pub delimiter: String,
    /// Expand variables inside resolved values.
    pub expand_values: bool,
    /// Cache resolved values for this long; `None` disables caching.
    #[serde(with = "humantime_option")]
    pub cache_ttl: Option<Duration>,
    /// Resolve every accessor of a view when it is created.
    pub eager_loading: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            variable_prefix: DEFAULT_PREFIX.to_owned(),
            variable_suffix: DEFAULT_SUFFIX.to_owned(),
            max_expansion_depth: DEFAULT_MAX_DEPTH,
            delimiter: DEFAULT_DELIMITER.to_owned(),
            expand_values: true,
            cache_ttl: None,
            eager_loading: false,
        }
    }
}

impl Settings {
    /// Extract settings from `figment`, falling back to defaults for
    /// missing keys.
    ///
    /// # Errors
    ///
    /// Returns [`PropsError::Gathering`] when a value has the wrong type and
    /// [`PropsError::Configuration`] when [`Settings::validate`] rejects the
    /// result.
    pub fn from_figment(figment: &Figment) -> PropsResult<Self> {
        let settings: Self = figment.extract().map_err(PropsError::gathering).map_err(Arc::new)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load defaults, then [`SETTINGS_FILE`] when present, then environment
    /// variables named `{prefix}{KEY}` such as `EXTPROPS_DELIMITER`.
    ///
    /// # Errors
    ///
    /// See [`Settings::from_figment`].
    pub fn load(prefix: &str) -> PropsResult<Self> {
        Self::from_figment(&Self::figment(prefix))
    }

    /// The layered figment used by [`Settings::load`].
    #[must_use]
    pub fn figment(prefix: &str) -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(SETTINGS_FILE))
            .merge(Env::prefixed(prefix).map(|k| Uncased::from(k.as_str().to_ascii_lowercase())))
    }

    /// Check the settings are usable.
    ///
    /// # Errors
    ///
    /// Returns [`PropsError::Configuration`] for empty markers, an empty
    /// delimiter, or a zero expansion depth.
    pub fn validate(&self) -> PropsResult<()> {
        let checks = [
            ("variable_prefix", self.variable_prefix.is_empty(), "must not be empty"),
            ("variable_suffix", self.variable_suffix.is_empty(), "must not be empty"),
            ("delimiter", self.delimiter.is_empty(), "must not be empty"),
            ("max_expansion_depth", self.max_expansion_depth == 0, "must be at least 1"),
        ];
        checks
            .into_iter()
            .find(|(_, failed, _)| *failed)
            .map_or(Ok(()), |(key, _, message)| {
                Err(PropsError::configuration(key, message))
            })
            .into_props()
    }
}

mod humantime_option {
    use super::{Deserialize, Deserializer, Duration, Serializer};

    #[expect(
        clippy::ref_option,
        reason = "serde's `with` attribute passes a reference to the field"
    )]
    pub fn serialize<S: Serializer>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(ttl) => serializer.serialize_str(&humantime::format_duration(*ttl).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Duration>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|text| humantime::parse_duration(&text).map_err(serde::de::Error::custom))
            .transpose()
    }
}
