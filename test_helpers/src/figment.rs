//! Helpers for running configuration tests inside a `figment::Jail`.
//!
//! A jail gives each test a scratch working directory and restores any
//! environment variables it set once the closure returns.

use anyhow::{Result, anyhow};

/// Runs `f` inside a [`figment::Jail`] and hands back its output.
///
/// # Errors
///
/// Returns an error when the jail cannot be created or `f` fails.
///
/// # Examples
///
/// ```
/// use test_helpers::figment::with_jail;
///
/// let contents = with_jail(|jail| {
///     jail.create_file("extprops.toml", "delimiter = \";\"")?;
///     Ok(std::fs::read_to_string("extprops.toml").map_err(|e| e.to_string())?)
/// })?;
/// assert!(contents.contains("delimiter"));
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn with_jail<F, T>(f: F) -> Result<T>
where
    F: FnOnce(&mut figment::Jail) -> figment::error::Result<T>,
{
    let mut output = None;
    figment::Jail::try_with(|jail| {
        output = Some(f(jail)?);
        Ok(())
    })
    .map_err(|err| anyhow!("jail failed: {err}"))?;
    output.ok_or_else(|| anyhow!("jail closure produced no value"))
}
