//! Property source backed by a layered Figment configuration.

use std::path::Path;

use figment::Figment;
use figment::providers::{Format, Toml};
use serde_json::Value as Json;

use super::Resolver;
use crate::error::ResolveError;

/// Resolves dotted property names against a [`Figment`].
///
/// Scalars are rendered as text and arrays of scalars are joined with `,` so
/// they can be read back by the collection converters. Tables are rejected.
///
/// # Examples
///
/// ```
/// use extprops::resolver::{FigmentResolver, Resolver};
/// use figment::{Figment, providers::{Format, Toml}};
///
/// let figment = Figment::from(Toml::string("[db]\nports = [5432, 5433]"));
/// let resolver = FigmentResolver::new(figment);
/// assert_eq!(resolver.resolve("db.ports")?, Some("5432,5433".to_owned()));
/// # Ok::<(), extprops::ResolveError>(())
/// ```
#[derive(Clone, Debug)]
pub struct FigmentResolver {
    figment: Figment,
}

impl FigmentResolver {
    /// Resolve against `figment`.
    #[must_use]
    pub const fn new(figment: Figment) -> Self {
        Self { figment }
    }

    /// Resolve against a TOML file. A missing file resolves nothing.
    #[must_use]
    pub fn toml_file(path: impl AsRef<Path>) -> Self {
        Self::new(Figment::from(Toml::file(path)))
    }

    fn render(name: &str, value: Json) -> Result<String, ResolveError> {
        match value {
            Json::Array(items) => items
                .into_iter()
                .map(|item| Self::render_scalar(name, item))
                .collect::<Result<Vec<_>, _>>()
                .map(|parts| parts.join(",")),
            other => Self::render_scalar(name, other),
        }
    }

    fn render_scalar(name: &str, value: Json) -> Result<String, ResolveError> {
        match value {
            Json::Null => Ok(String::new()),
            Json::Bool(b) => Ok(b.to_string()),
            Json::Number(n) => Ok(n.to_string()),
            Json::String(s) => Ok(s),
            Json::Array(_) | Json::Object(_) => Err(ResolveError::new(
                name,
                "value is a nested table or array and cannot be read as a property",
            )),
        }
    }
}

impl Resolver for FigmentResolver {
    fn resolve(&self, name: &str) -> Result<Option<String>, ResolveError> {
        if !self.figment.contains(name) {
            return Ok(None);
        }
        let value = self
            .figment
            .find_value(name)
            .map_err(|e| ResolveError::new(name, e))?;
        let json: Json = value
            .deserialize()
            .map_err(|e| ResolveError::new(name, e))?;
        Self::render(name, json).map(Some)
    }
}
