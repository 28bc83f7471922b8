//! Unit tests for the composition root and property views.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use rstest::{fixture, rstest};

use super::{Accessor, AccessorTable, ExternalizedProperties};
use crate::conversion::{ConversionContext, ConversionResult, Converter};
use crate::error::{ConversionError, ResolveError};
use crate::processing::Base64Decode;
use crate::resolver::{MapResolver, Resolver};
use crate::settings::Settings;
use crate::types::{RawType, TypeDescriptor};
use crate::value::Value;
use crate::PropsError;

struct Counting {
    calls: Arc<AtomicUsize>,
}

impl Resolver for Counting {
    fn resolve(&self, name: &str) -> Result<Option<String>, ResolveError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok((name == "counted").then(|| "1".to_owned()))
    }
}

#[fixture]
fn source() -> MapResolver {
    MapResolver::from_iter([
        ("env", "prod"),
        ("prod.db.host", "db.internal"),
        ("db.url", "jdbc://${prod.db.host}:5432"),
        ("ports", "80;443"),
        ("secret", "aHVudGVyMg=="),
        ("retries", "three"),
        ("timeout", "5s"),
    ])
}

#[fixture]
fn props(source: MapResolver) -> ExternalizedProperties {
    ExternalizedProperties::builder()
        .resolver(source)
        .build()
        .expect("valid configuration")
}

#[rstest]
fn property_names_and_values_are_expanded(props: ExternalizedProperties) {
    assert_eq!(
        props.resolve_property("${env}.db.host").expect("resolves"),
        Some("db.internal".to_owned())
    );
    assert_eq!(
        props.resolve_property("db.url").expect("resolves"),
        Some("jdbc://db.internal:5432".to_owned())
    );
    assert_eq!(props.resolve_property("absent").expect("no failure"), None);
}

#[rstest]
fn value_expansion_can_be_disabled(source: MapResolver) {
    let props = ExternalizedProperties::builder()
        .resolver(source)
        .settings(Settings {
            expand_values: false,
            ..Settings::default()
        })
        .build()
        .expect("valid configuration");
    assert_eq!(
        props.resolve_property("db.url").expect("resolves"),
        Some("jdbc://${prod.db.host}:5432".to_owned())
    );
}

#[rstest]
fn no_variable_expansion_keeps_names_verbatim(source: MapResolver) {
    let props = ExternalizedProperties::builder()
        .resolver(source)
        .no_variable_expansion()
        .build()
        .expect("valid configuration");
    assert_eq!(props.resolve_property("${env}.db.host").expect("lookup"), None);
    assert_eq!(props.expand_variables("${env}").expect("identity"), "${env}");
}

#[rstest]
fn custom_markers_come_from_settings(source: MapResolver) {
    let props = ExternalizedProperties::builder()
        .resolver(source)
        .settings(Settings {
            variable_prefix: "%{".to_owned(),
            variable_suffix: "}%".to_owned(),
            ..Settings::default()
        })
        .build()
        .expect("valid configuration");
    assert_eq!(props.expand_variables("%{env}%-${env}").expect("expands"), "prod-${env}");
}

#[rstest]
fn require_reports_the_expanded_name(props: ExternalizedProperties) {
    let err = props.require::<String>("${env}.db.user").expect_err("absent");
    assert!(
        matches!(&*err, PropsError::UnresolvedProperty { name } if name == "prod.db.user"),
        "{err}"
    );
}

#[rstest]
fn conversion_failures_name_the_property(props: ExternalizedProperties) {
    let err = props.require::<u8>("retries").expect_err("not a number");
    assert!(matches!(
        &*err,
        PropsError::Conversion { property: Some(p), source: ConversionError::NumericFormat { .. } }
            if p == "retries"
    ));
    assert!(err.to_string().contains("retries"));
}

#[rstest]
fn typed_resolution_uses_descriptors(props: ExternalizedProperties) {
    assert_eq!(
        props
            .resolve_typed("timeout", &TypeDescriptor::of(RawType::Duration))
            .expect("resolves"),
        Some(Value::Duration(Duration::from_secs(5)))
    );
    assert_eq!(props.resolve_as::<Duration>("missing").expect("absent"), None);
    assert_eq!(props.convert::<Vec<u8>>("1,2").expect("converts"), vec![1, 2]);
    assert_eq!(
        props
            .convert_value("x", &TypeDescriptor::optional(TypeDescriptor::string()))
            .expect("converts"),
        Value::optional(Some(Value::from("x")))
    );
}

#[test]
fn builder_requires_a_resolver() {
    let err = ExternalizedProperties::builder().build().expect_err("no resolver");
    assert!(matches!(&*err, PropsError::Configuration { key, .. } if key == "resolvers"));
}

#[test]
fn builder_rejects_invalid_settings() {
    let err = ExternalizedProperties::builder()
        .default_resolvers()
        .settings(Settings {
            max_expansion_depth: 0,
            ..Settings::default()
        })
        .build()
        .expect_err("zero depth");
    assert!(matches!(&*err, PropsError::Configuration { .. }));
}

#[rstest]
fn custom_converters_run_before_defaults(source: MapResolver) {
    struct Shouting;
    impl Converter for Shouting {
        fn name(&self) -> &'static str {
            "shouting"
        }
        fn can_convert_to(&self, raw: &RawType) -> bool {
            matches!(raw, RawType::Named(name) if name == "Shout")
        }
        fn convert(
            &self,
            ctx: &ConversionContext<'_>,
        ) -> Result<ConversionResult, ConversionError> {
            Ok(Value::from(ctx.value().to_uppercase()).into())
        }
    }

    let props = ExternalizedProperties::builder()
        .resolver(source)
        .converter(Shouting)
        .default_converters()
        .build()
        .expect("valid configuration");
    assert_eq!(
        props
            .resolve_typed("env", &TypeDescriptor::named("Shout"))
            .expect("converts"),
        Some(Value::from("PROD"))
    );
    assert!(props.require::<u16>("prod.db.host").is_err());
}

#[test]
fn converters_without_string_fallback_are_rejected() {
    struct OnlyBools;
    impl Converter for OnlyBools {
        fn name(&self) -> &'static str {
            "bools"
        }
        fn can_convert_to(&self, raw: &RawType) -> bool {
            matches!(raw, RawType::Bool)
        }
        fn convert(
            &self,
            _ctx: &ConversionContext<'_>,
        ) -> Result<ConversionResult, ConversionError> {
            Ok(Value::Bool(true).into())
        }
    }

    let err = ExternalizedProperties::builder()
        .default_resolvers()
        .converter(OnlyBools)
        .build()
        .expect_err("no String converter");
    assert!(matches!(&*err, PropsError::Configuration { key, .. } if key == "converters"));
}

#[test]
fn cache_ttl_memoises_resolved_values() {
    let calls = Arc::new(AtomicUsize::new(0));
    let props = ExternalizedProperties::builder()
        .resolver(Counting {
            calls: Arc::clone(&calls),
        })
        .cache_ttl(Duration::from_secs(60))
        .no_variable_expansion()
        .build()
        .expect("valid configuration");
    for _ in 0..3 {
        assert_eq!(props.require::<u8>("counted").expect("resolves"), 1);
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[rstest]
fn view_applies_accessor_options(props: ExternalizedProperties) {
    let table = AccessorTable::from_accessors([
        Accessor::of::<Vec<u16>>("ports", "ports").delimiter(";"),
        Accessor::of::<String>("password", "secret").processor(Base64Decode::standard()),
        Accessor::of::<String>("user", "db.user").default_value("admin"),
        Accessor::of::<Option<u32>>("pool", "db.pool"),
        Accessor::of::<String>("region", "${env}.region"),
    ])
    .expect("unique names");
    let view = props.view(table).expect("lazy view");

    assert_eq!(view.get_as::<Vec<u16>>("ports").expect("ports"), vec![80, 443]);
    assert_eq!(view.get_as::<String>("password").expect("decoded"), "hunter2");
    assert_eq!(view.get_as::<String>("user").expect("default"), "admin");
    assert_eq!(view.get_as::<Option<u32>>("pool").expect("optional"), None);

    let unresolved = view.get("region").expect_err("absent");
    assert!(
        matches!(&*unresolved, PropsError::UnresolvedProperty { name } if name == "prod.region")
    );
    let unknown = view.get("nope").expect_err("unknown accessor");
    assert!(matches!(&*unknown, PropsError::UnknownAccessor { .. }));
}

#[rstest]
fn processor_failures_surface(props: ExternalizedProperties) {
    let table = AccessorTable::new()
        .with(Accessor::of::<String>("retries", "retries").processor(Base64Decode::standard()))
        .expect("unique names");
    let view = props.view(table).expect("lazy view");
    let err = view.get("retries").expect_err("not base64");
    assert!(matches!(&*err, PropsError::Processing(e) if e.property() == "retries"));
}

#[test]
fn views_memoise_when_caching() {
    let calls = Arc::new(AtomicUsize::new(0));
    let props = ExternalizedProperties::builder()
        .resolver(Counting {
            calls: Arc::clone(&calls),
        })
        .cache_ttl(Duration::from_secs(60))
        .build()
        .expect("valid configuration");
    let table = AccessorTable::new()
        .with(Accessor::of::<u8>("counted", "counted"))
        .expect("unique names");
    let view = props.view(table).expect("lazy view");
    assert_eq!(view.get("counted").expect("value"), Value::UInt(1));
    view.refresh();
    assert_eq!(view.get("counted").expect("value"), Value::UInt(1));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[rstest]
fn eager_loading_aggregates_failures(source: MapResolver) {
    let props = ExternalizedProperties::builder()
        .resolver(source)
        .eager_loading(true)
        .build()
        .expect("valid configuration");
    let table = AccessorTable::from_accessors([
        Accessor::of::<u8>("retries", "retries"),
        Accessor::of::<bool>("flag", "env"),
        Accessor::of::<u16>("ports", "ports"),
        Accessor::of::<String>("absent", "nowhere"),
    ])
    .expect("unique names");
    let err = props.view(table).expect_err("two failures");
    let PropsError::Aggregate(errors) = &*err else {
        panic!("expected an aggregate, got {err}");
    };
    assert_eq!(errors.len(), 2);
    assert!(errors.iter().all(|e| matches!(e, PropsError::Conversion { .. })));
}

#[rstest]
fn eager_loading_keeps_loaded_values(source: MapResolver) {
    let props = ExternalizedProperties::builder()
        .resolver(source)
        .eager_loading(true)
        .build()
        .expect("valid configuration");
    let table = AccessorTable::from_accessors([
        Accessor::of::<Duration>("timeout", "timeout"),
        Accessor::of::<String>("absent", "nowhere"),
    ])
    .expect("unique names");
    let view = props.view(table).expect("loads");
    assert_eq!(
        view.get_as::<Duration>("timeout").expect("loaded"),
        Duration::from_secs(5)
    );
    assert!(view.get("absent").is_err());
}

#[test]
fn accessor_names_must_be_unique() {
    let err = AccessorTable::from_accessors([
        Accessor::of::<u8>("a", "x"),
        Accessor::of::<u8>("a", "y"),
    ])
    .expect_err("duplicate");
    assert!(matches!(&*err, PropsError::Configuration { key, .. } if key == "accessors"));
}
