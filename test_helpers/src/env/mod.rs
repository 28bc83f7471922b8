//! Guards for mutating process environment variables in tests.
//!
//! Every mutation and every restoration runs under one global re-entrant
//! mutex. Guards restore the prior value (or remove the variable) on drop,
//! so stacked guards for one key unwind in LIFO order. Hold [`lock`] or an
//! [`EnvScope`] when a test needs several mutations to appear atomically.
//!
//! # Examples
//!
//! ```
//! use test_helpers::env;
//!
//! let _g = env::set_var("EXTPROPS_DEMO", "on");
//! assert_eq!(std::env::var("EXTPROPS_DEMO").as_deref(), Ok("on"));
//! ```

use std::env;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::sync::LazyLock;

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};

static ENV_MUTEX: LazyLock<ReentrantMutex<()>> = LazyLock::new(ReentrantMutex::default);

enum Change<'v> {
    Set(&'v OsStr),
    Remove,
}

fn apply(key: &str, change: &Change<'_>) {
    // SAFETY: callers hold `ENV_MUTEX`, serialising environment writes made
    // through this module.
    match change {
        Change::Set(value) => unsafe { env::set_var(key, value) },
        Change::Remove => unsafe { env::remove_var(key) },
    }
}

fn mutate(key: String, change: &Change<'_>, _held: &ReentrantMutexGuard<'_, ()>) -> EnvVarGuard {
    let original = env::var_os(&key);
    apply(&key, change);
    EnvVarGuard { key, original }
}

/// Restores one environment variable to its prior state on drop.
#[must_use = "dropping restores the prior value"]
pub struct EnvVarGuard {
    key: String,
    original: Option<OsString>,
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        let _held = ENV_MUTEX.lock();
        let restore = self
            .original
            .as_deref()
            .map_or(Change::Remove, Change::Set);
        apply(&self.key, &restore);
    }
}

impl fmt::Debug for EnvVarGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvVarGuard")
            .field("key", &self.key)
            .field("had_original", &self.original.is_some())
            .finish()
    }
}

/// Holds the global environment lock until dropped.
#[must_use = "dropping releases the environment lock"]
pub struct EnvVarLock {
    guard: ReentrantMutexGuard<'static, ()>,
}

impl EnvVarLock {
    /// Set `key` while the lock is held.
    pub fn set_var(&self, key: impl Into<String>, value: impl AsRef<OsStr>) -> EnvVarGuard {
        mutate(key.into(), &Change::Set(value.as_ref()), &self.guard)
    }

    /// Remove `key` while the lock is held.
    pub fn remove_var(&self, key: impl Into<String>) -> EnvVarGuard {
        mutate(key.into(), &Change::Remove, &self.guard)
    }
}

/// Keeps the lock and a set of guards alive together.
///
/// Guards are restored before the lock is released.
#[must_use = "dropping restores the guarded variables"]
pub struct EnvScope {
    guards: Vec<EnvVarGuard>,
    _lock: EnvVarLock,
}

impl EnvScope {
    /// Number of variables this scope restores.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.guards.len()
    }

    /// Whether the scope guards nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }
}

impl fmt::Debug for EnvScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvScope")
            .field("guards", &self.guards)
            .finish_non_exhaustive()
    }
}

/// Set `key` to `value` until the returned guard drops.
///
/// # Examples
///
/// ```
/// use test_helpers::env;
///
/// let _g = env::set_var("EXTPROPS_FOO", "bar");
/// assert!(matches!(std::env::var("EXTPROPS_FOO"), Ok(ref value) if value == "bar"));
/// ```
pub fn set_var(key: impl Into<String>, value: impl AsRef<OsStr>) -> EnvVarGuard {
    lock().set_var(key, value)
}

/// Remove `key` until the returned guard drops.
///
/// # Examples
///
/// ```
/// use test_helpers::env;
///
/// let _g = env::remove_var("EXTPROPS_FOO");
/// assert!(std::env::var("EXTPROPS_FOO").is_err());
/// ```
pub fn remove_var(key: impl Into<String>) -> EnvVarGuard {
    lock().remove_var(key)
}

/// Acquire the global environment lock.
pub fn lock() -> EnvVarLock {
    EnvVarLock {
        guard: ENV_MUTEX.lock(),
    }
}

/// Apply several mutations under one lock, keeping it until the scope drops.
///
/// # Examples
///
/// ```
/// use test_helpers::env;
///
/// let scope = env::scope_with(|lock| {
///     vec![lock.set_var("EXTPROPS_A", "1"), lock.remove_var("EXTPROPS_B")]
/// });
/// assert_eq!(scope.len(), 2);
/// ```
pub fn scope_with<F>(build: F) -> EnvScope
where
    F: FnOnce(&EnvVarLock) -> Vec<EnvVarGuard>,
{
    let held = lock();
    let guards = build(&held);
    EnvScope {
        guards,
        _lock: held,
    }
}
