//! Unit tests for error rendering and aggregation behaviour.

use rstest::rstest;
use std::sync::Arc;

use super::{ConversionError, PropsError, ResolveError};
use crate::TypeDescriptor;

#[rstest]
#[case(Some("app.port"), "failed to convert property 'app.port'")]
#[case(None, "failed to convert value")]
fn conversion_errors_name_the_property(#[case] property: Option<&str>, #[case] prefix: &str) {
    let err = PropsError::Conversion {
        property: property.map(str::to_owned),
        source: ConversionError::NoApplicableConverter {
            target: TypeDescriptor::named("Url"),
        },
    };
    let rendered = err.to_string();
    assert!(rendered.starts_with(prefix), "unexpected message: {rendered}");
    assert!(rendered.contains("`Url`"));
}

#[test]
fn resolve_errors_keep_their_cause() {
    let err = ResolveError::new("db.url", "connection refused");
    assert_eq!(err.name(), "db.url");
    let source = std::error::Error::source(&err).map(ToString::to_string);
    assert_eq!(source.as_deref(), Some("connection refused"));
}

fn owned_errors() -> Vec<Arc<PropsError>> {
    vec![
        Arc::new(PropsError::unresolved("db.url")),
        Arc::new(PropsError::configuration("delimiter", "must not be empty")),
    ]
}

#[test]
fn nothing_to_aggregate() {
    assert!(PropsError::try_aggregate(Vec::<Arc<PropsError>>::new()).is_none());
}

#[test]
fn a_sole_owned_error_is_unwrapped() {
    let sole = PropsError::try_aggregate([PropsError::unresolved("db.url")]);
    assert!(matches!(
        sole,
        Some(PropsError::UnresolvedProperty { ref name }) if name == "db.url"
    ));
}

#[test]
fn a_sole_shared_error_stays_wrapped() {
    let shared = Arc::new(PropsError::unresolved("db.url"));
    let kept = Arc::clone(&shared);
    let wrapped = PropsError::try_aggregate([shared]);
    let Some(PropsError::Aggregate(all)) = wrapped else {
        panic!("shared errors cannot be unwrapped");
    };
    assert_eq!(all.len(), 1);
    assert_eq!(Arc::strong_count(&kept), 2);
}

#[test]
fn several_errors_render_one_per_line() {
    let Some(PropsError::Aggregate(all)) = PropsError::try_aggregate(owned_errors()) else {
        panic!("two errors should aggregate");
    };
    let lines: Vec<String> = all.to_string().lines().map(str::to_owned).collect();
    assert_eq!(lines.len(), 2);
    assert!(lines.first().is_some_and(|l| l.starts_with("1: ") && l.contains("db.url")));
    assert!(lines.get(1).is_some_and(|l| l.starts_with("2: ") && l.contains("delimiter")));
    let names: Vec<_> = all
        .iter()
        .filter_map(|e| match e {
            PropsError::UnresolvedProperty { name } => Some(name.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(names, ["db.url"]);
    assert_eq!(all.into_iter().count(), 2);
}
