//! Unit tests for the bundled property sources.
#![expect(
    clippy::panic_in_result_fn,
    reason = "assertions read better than ensure-style early returns here"
)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use figment::Figment;
use figment::providers::{Format, Toml};
use rstest::rstest;
use serial_test::serial;
use test_helpers::env;

use super::{
    CachingResolver, EnvResolver, FigmentResolver, FnResolver, MapResolver, Resolver,
    ResolverChain,
};
use crate::cache::ConcurrentMapCacheStrategy;
use crate::error::ResolveError;

struct CountingResolver {
    calls: AtomicUsize,
    value: Option<&'static str>,
}

impl CountingResolver {
    const fn new(value: Option<&'static str>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            value,
        }
    }
}

impl Resolver for &CountingResolver {
    fn resolve(&self, _name: &str) -> Result<Option<String>, ResolveError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.value.map(str::to_owned))
    }
}

#[test]
fn chain_prefers_earlier_resolvers() -> Result<(), ResolveError> {
    let chain = ResolverChain::new()
        .with(MapResolver::from_iter([("name", "first")]))
        .with(MapResolver::from_iter([("name", "second"), ("other", "x")]));
    assert_eq!(chain.resolve("name")?, Some("first".to_owned()));
    assert_eq!(chain.resolve("other")?, Some("x".to_owned()));
    assert_eq!(chain.resolve("missing")?, None);
    Ok(())
}

#[test]
fn chain_propagates_resolver_failures() {
    struct Failing;
    impl Resolver for Failing {
        fn resolve(&self, name: &str) -> Result<Option<String>, ResolveError> {
            Err(ResolveError::new(name, "source offline"))
        }
    }
    let chain = ResolverChain::new().with(Failing).with(MapResolver::from_iter([("a", "b")]));
    let err = chain.resolve("a").expect_err("failing resolver should abort the chain");
    assert_eq!(err.name(), "a");
}

#[rstest]
#[case("App.Name", Some("demo"))]
#[case("app.name", None)]
fn map_resolver_matches_exactly_by_default(
    #[case] name: &str,
    #[case] expected: Option<&str>,
) -> Result<(), ResolveError> {
    let resolver = MapResolver::from_iter([("App.Name", "demo")]);
    assert_eq!(resolver.resolve(name)?.as_deref(), expected);
    Ok(())
}

#[test]
fn map_resolver_can_ignore_case() -> Result<(), ResolveError> {
    let resolver = MapResolver::from_iter([("App.Name", "demo")]).ignore_case();
    assert_eq!(resolver.resolve("APP.NAME")?.as_deref(), Some("demo"));
    Ok(())
}

#[test]
fn map_resolver_consults_fallback_for_missing_names() -> Result<(), ResolveError> {
    let resolver = MapResolver::from_iter([("known", "1")])
        .with_fallback(|name| name.starts_with("dyn.").then(|| format!("{name}!")));
    assert_eq!(resolver.resolve("known")?.as_deref(), Some("1"));
    assert_eq!(resolver.resolve("dyn.x")?.as_deref(), Some("dyn.x!"));
    assert_eq!(resolver.resolve("other")?, None);
    Ok(())
}

#[rstest]
#[case("java.home", "JAVA_HOME")]
#[case("java-home", "JAVA_HOME")]
#[case("Db.Pool-Size", "DB_POOL_SIZE")]
fn env_names_are_upper_snake_case(#[case] name: &str, #[case] expected: &str) {
    assert_eq!(EnvResolver::new().env_name(name), expected);
}

#[test]
#[serial]
fn env_resolver_reads_raw_and_formatted_names() -> Result<(), ResolveError> {
    let _raw = env::set_var("extprops.raw.name", "raw");
    let _formatted = env::set_var("EXTPROPS_TEST_PORT", "8080");
    let resolver = EnvResolver::new();
    assert_eq!(resolver.resolve("extprops.raw.name")?.as_deref(), Some("raw"));
    assert_eq!(resolver.resolve("extprops.test-port")?.as_deref(), Some("8080"));
    Ok(())
}

#[test]
#[serial]
fn env_resolver_sees_variables_set_after_construction() -> Result<(), ResolveError> {
    let resolver = EnvResolver::prefixed("EXTPROPS_LATE_");
    let _cleared = env::remove_var("EXTPROPS_LATE_VALUE");
    assert_eq!(resolver.resolve("value")?, None);
    let _set = env::set_var("EXTPROPS_LATE_VALUE", "now");
    assert_eq!(resolver.resolve("value")?.as_deref(), Some("now"));
    Ok(())
}

#[rstest]
#[case("server.host", Some("localhost"))]
#[case("server.port", Some("8080"))]
#[case("server.tls", Some("true"))]
#[case("server.aliases", Some("a,b"))]
#[case("server.missing", None)]
fn figment_resolver_renders_scalars(
    #[case] name: &str,
    #[case] expected: Option<&str>,
) -> Result<(), ResolveError> {
    let figment = Figment::from(Toml::string(
        "[server]\nhost = \"localhost\"\nport = 8080\ntls = true\naliases = [\"a\", \"b\"]",
    ));
    let resolver = FigmentResolver::new(figment);
    assert_eq!(resolver.resolve(name)?.as_deref(), expected);
    Ok(())
}

#[test]
fn figment_resolver_rejects_tables() {
    let figment = Figment::from(Toml::string("[server]\nhost = \"localhost\""));
    let err = FigmentResolver::new(figment)
        .resolve("server")
        .expect_err("tables are not properties");
    assert_eq!(err.name(), "server");
}

#[test]
fn caching_resolver_only_caches_present_values() -> Result<(), ResolveError> {
    let hit = CountingResolver::new(Some("v"));
    let cached = CachingResolver::new(&hit, Arc::new(ConcurrentMapCacheStrategy::new()));
    assert_eq!(cached.resolve("a")?.as_deref(), Some("v"));
    assert_eq!(cached.resolve("a")?.as_deref(), Some("v"));
    assert_eq!(hit.calls.load(Ordering::SeqCst), 1);

    let miss = CountingResolver::new(None);
    let uncached = CachingResolver::new(&miss, Arc::new(ConcurrentMapCacheStrategy::new()));
    assert_eq!(uncached.resolve("a")?, None);
    assert_eq!(uncached.resolve("a")?, None);
    assert_eq!(miss.calls.load(Ordering::SeqCst), 2);
    Ok(())
}

#[test]
fn fn_resolver_wraps_closures() -> Result<(), ResolveError> {
    let resolver = FnResolver::new(|name: &str| Some(name.to_uppercase()));
    assert_eq!(resolver.resolve("abc")?.as_deref(), Some("ABC"));
    Ok(())
}
