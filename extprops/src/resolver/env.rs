//! Process environment property source.

use std::env::{self, VarError};

use super::Resolver;
use crate::error::ResolveError;

/// Resolves properties from environment variables.
///
/// The live environment is read on every lookup. A name is tried as given
/// and then in environment form, so `app.http-port` also matches
/// `APP_HTTP_PORT`. With a prefix only the prefixed environment form is
/// consulted.
#[derive(Clone, Debug, Default)]
pub struct EnvResolver {
    prefix: Option<String>,
}

impl EnvResolver {
    /// Resolver over unprefixed variables.
    #[must_use]
    pub const fn new() -> Self {
        Self { prefix: None }
    }

    /// Resolver that prepends `prefix` to the environment form of each name.
    ///
    /// # Examples
    ///
    /// ```
    /// use extprops::resolver::EnvResolver;
    ///
    /// let resolver = EnvResolver::prefixed("DEMO_");
    /// assert_eq!(resolver.env_name("db.pool-size"), "DEMO_DB_POOL_SIZE");
    /// ```
    #[must_use]
    pub fn prefixed(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
        }
    }

    /// Environment form of `name`: upper case with `.` and `-` as `_`.
    #[must_use]
    pub fn env_name(&self, name: &str) -> String {
        let formatted: String = name
            .chars()
            .map(|c| match c {
                '.' | '-' => '_',
                other => other.to_ascii_uppercase(),
            })
            .collect();
        match &self.prefix {
            Some(prefix) => format!("{prefix}{formatted}"),
            None => formatted,
        }
    }

    fn read(name: &str) -> Result<Option<String>, ResolveError> {
        match env::var(name) {
            Ok(value) => Ok(Some(value)),
            Err(VarError::NotPresent) => Ok(None),
            Err(err @ VarError::NotUnicode(_)) => Err(ResolveError::new(name, err)),
        }
    }
}

impl Resolver for EnvResolver {
    fn resolve(&self, name: &str) -> Result<Option<String>, ResolveError> {
        if self.prefix.is_none()
            && let Some(value) = Self::read(name)?
        {
            return Ok(Some(value));
        }
        let formatted = self.env_name(name);
        if formatted == name {
            return Ok(None);
        }
        Self::read(&formatted)
    }
}
