//! Typed access to an [`AccessorTable`].

use std::fmt;
use std::sync::Arc;

use tracing::{trace, warn};

use super::{Accessor, AccessorTable, ExternalizedProperties, extract};
use crate::cache::{CacheStrategy, ConcurrentMapCacheStrategy, ExpiringCacheStrategy, NoCacheStrategy};
use crate::types::{FromProperty, RawType};
use crate::value::Value;
use crate::{PropsError, PropsResult};

/// Resolves accessors by name through an [`ExternalizedProperties`].
///
/// Each lookup expands the accessor's property name, resolves it, runs the
/// accessor's processors, and converts the result. An unresolved property
/// falls back to the accessor's default value, then to an empty optional for
/// optional targets.
///
/// # Examples
///
/// ```
/// use extprops::{Accessor, AccessorTable, ExternalizedProperties};
/// use extprops::resolver::MapResolver;
///
/// let props = ExternalizedProperties::builder()
///     .resolver(MapResolver::from_iter([("http.port", "8080")]))
///     .build()?;
/// let view = props.view(AccessorTable::from_accessors([
///     Accessor::of::<u16>("port", "http.port"),
///     Accessor::of::<String>("host", "http.host").default_value("localhost"),
///     Accessor::of::<Option<bool>>("tls", "http.tls"),
/// ])?)?;
///
/// assert_eq!(view.get_as::<u16>("port")?, 8080);
/// assert_eq!(view.get_as::<String>("host")?, "localhost");
/// assert_eq!(view.get_as::<Option<bool>>("tls")?, None);
/// # Ok::<(), std::sync::Arc<extprops::PropsError>>(())
/// ```
#[derive(Clone)]
pub struct PropertyView {
    properties: ExternalizedProperties,
    table: Arc<AccessorTable>,
    memo: Arc<dyn CacheStrategy<String, Value>>,
}

impl PropertyView {
    /// Expose `table` through `properties`.
    ///
    /// Values are memoised per accessor when the settings enable caching.
    /// With eager loading, every accessor is resolved immediately and kept
    /// for the life of the view; accessors whose property is absent are
    /// skipped.
    ///
    /// # Errors
    ///
    /// With eager loading, returns the single failure or a
    /// [`PropsError::Aggregate`] of every accessor that failed to load.
    pub fn new(properties: ExternalizedProperties, table: AccessorTable) -> PropsResult<Self> {
        let settings = properties.settings();
        let memo: Arc<dyn CacheStrategy<String, Value>> = match (settings.eager_loading, settings.cache_ttl) {
            (_, Some(ttl)) => Arc::new(ExpiringCacheStrategy::<String, Value>::new(ttl)),
            (true, None) => Arc::new(ConcurrentMapCacheStrategy::<String, Value>::new()),
            (false, None) => Arc::new(NoCacheStrategy),
        };
        let eager = settings.eager_loading;
        let view = Self {
            properties,
            table: Arc::new(table),
            memo,
        };
        if eager {
            view.load_all()?;
        }
        Ok(view)
    }

    fn load_all(&self) -> PropsResult<()> {
        let mut failures = Vec::new();
        for accessor in self.table.iter() {
            match self.evaluate(accessor) {
                Ok(value) => self.memo.cache(accessor.name().to_owned(), value),
                Err(err) if matches!(*err, PropsError::UnresolvedProperty { .. }) => {
                    trace!(accessor = accessor.name(), "skipping unresolved accessor");
                }
                Err(err) => {
                    warn!(accessor = accessor.name(), error = %err, "eager loading failed");
                    failures.push(err);
                }
            }
        }
        PropsError::try_aggregate(failures).map_or(Ok(()), |err| Err(Arc::new(err)))
    }

    /// The accessor table.
    #[must_use]
    pub fn table(&self) -> &AccessorTable {
        &self.table
    }

    /// The instance resolving this view.
    #[must_use]
    pub const fn properties(&self) -> &ExternalizedProperties {
        &self.properties
    }

    /// Value of the accessor called `name`.
    ///
    /// # Errors
    ///
    /// Returns [`PropsError::UnknownAccessor`] for names missing from the
    /// table, [`PropsError::UnresolvedProperty`] when the property is absent
    /// with no fallback, and any expansion, resolution, processing, or
    /// conversion failure.
    pub fn get(&self, name: &str) -> PropsResult<Value> {
        let accessor = self
            .table
            .get(name)
            .ok_or_else(|| Arc::new(PropsError::UnknownAccessor { name: name.to_owned() }))?;
        let key = name.to_owned();
        if let Some(hit) = self.memo.get(&key) {
            trace!(accessor = name, "accessor cache hit");
            return Ok(hit);
        }
        let value = self.evaluate(accessor)?;
        self.memo.cache(key, value.clone());
        Ok(value)
    }

    /// Value of the accessor called `name`, extracted as `T`.
    ///
    /// # Errors
    ///
    /// See [`Self::get`]; also fails when the value does not fit `T`.
    pub fn get_as<T: FromProperty>(&self, name: &str) -> PropsResult<T> {
        let value = self.get(name)?;
        let property = self.table.get(name).map_or(name, Accessor::property);
        extract(property, value)
    }

    /// Drop memoised values so the next lookups resolve again.
    pub fn refresh(&self) {
        self.memo.expire_all();
    }

    fn evaluate(&self, accessor: &Accessor) -> PropsResult<Value> {
        let options = accessor.convert_options(self.properties.convert_options());
        let (property, resolved) = self.properties.resolve_expanded(accessor.property())?;
        let raw = match resolved {
            Some(value) => accessor
                .processors()
                .iter()
                .try_fold(value, |current, processor| {
                    processor.process(&property, &current)
                })
                .map_err(|err| Arc::new(PropsError::from(err)))?,
            None => match accessor.default_raw() {
                Some(default) => default.to_owned(),
                None if matches!(accessor.target().raw_type(), RawType::Optional) => {
                    return Ok(Value::Optional(None));
                }
                None => return Err(Arc::new(PropsError::unresolved(property))),
            },
        };
        self.properties
            .convert_for(&property, &raw, accessor.target(), &options)
    }
}

impl fmt::Debug for PropertyView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyView")
            .field("table", &self.table)
            .finish_non_exhaustive()
    }
}
