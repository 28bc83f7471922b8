//! Unit tests for the variable expanders.

use std::sync::Arc;

use rstest::{fixture, rstest};

use super::{
    NoOpVariableExpander, PatternVariableExpander, SimpleVariableExpander, VariableExpander,
};
use crate::error::{ExpansionError, ResolveError};
use crate::resolver::{MapResolver, Resolver};

#[fixture]
fn resolver() -> Arc<dyn Resolver> {
    Arc::new(MapResolver::from_iter([
        ("name", "world"),
        ("greeting", "hello ${name}"),
        ("empty", ""),
        ("loop", "${loop}"),
        ("ping", "${pong}"),
        ("pong", "${ping}"),
    ]))
}

#[rstest]
#[case("")]
#[case("plain text")]
#[case("$ {name}")]
#[case("{name}")]
#[case("cost: $5")]
fn text_without_prefix_is_unchanged(resolver: Arc<dyn Resolver>, #[case] input: &str) {
    let expander = SimpleVariableExpander::new(resolver);
    assert_eq!(expander.expand(input).expect("no variables"), input);
}

#[rstest]
#[case("${name}", "world")]
#[case("[${name}]", "[world]")]
#[case("${name} and ${name}", "world and world")]
#[case("${greeting}!", "hello world!")]
#[case("x${empty}y", "xy")]
fn substitutes_resolved_values(
    resolver: Arc<dyn Resolver>,
    #[case] input: &str,
    #[case] expected: &str,
) {
    let expander = SimpleVariableExpander::new(resolver);
    assert_eq!(expander.expand(input).expect("expansion"), expected);
}

#[rstest]
#[case("${")]
#[case("${}")]
#[case("${unterminated")]
#[case("a ${} b ${name}")]
fn malformed_references_are_left_untouched(resolver: Arc<dyn Resolver>, #[case] input: &str) {
    let expander = SimpleVariableExpander::new(resolver);
    assert_eq!(expander.expand(input).expect("not a variable"), input);
}

#[rstest]
fn scanning_stops_at_first_malformed_reference(resolver: Arc<dyn Resolver>) {
    let expander = SimpleVariableExpander::new(resolver);
    assert_eq!(
        expander.expand("${name} then ${").expect("expansion"),
        "world then ${"
    );
}

#[rstest]
fn unresolved_variable_reports_name_and_source(resolver: Arc<dyn Resolver>) {
    let expander = SimpleVariableExpander::new(resolver);
    let err = expander.expand("db=${db.host}").expect_err("unresolved");
    match err {
        ExpansionError::UnresolvedVariable { name, source_text } => {
            assert_eq!(name, "db.host");
            assert_eq!(source_text, "db=${db.host}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[rstest]
#[case("${loop}")]
#[case("${ping}")]
fn self_reference_hits_the_depth_cap(resolver: Arc<dyn Resolver>, #[case] input: &str) {
    let expander = SimpleVariableExpander::new(resolver).max_depth(8);
    let err = expander.expand(input).expect_err("cycle");
    assert!(matches!(err, ExpansionError::DepthExceeded { limit: 8, .. }));
}

#[rstest]
fn side_by_side_references_do_not_count_as_nesting(resolver: Arc<dyn Resolver>) {
    let input = vec!["${name}"; 65].join(",");
    let expected = vec!["world"; 65].join(",");
    let expander = SimpleVariableExpander::new(resolver);
    assert_eq!(expander.expand(&input).expect("independent references"), expected);
}

fn chain(links: usize) -> Arc<dyn Resolver> {
    let mut entries: Vec<(String, String)> = (0..links)
        .map(|n| (format!("v{n}"), format!("${{v{}}}", n + 1)))
        .collect();
    entries.push((format!("v{links}"), "end".to_owned()));
    Arc::new(MapResolver::from_iter(entries))
}

#[rstest]
#[case(3, true)]
#[case(4, false)]
fn nesting_is_capped_per_chain(#[case] links: usize, #[case] fits: bool) {
    // `${v0}` needs `links + 1` levels of substitution.
    let expander = SimpleVariableExpander::new(chain(links)).max_depth(4);
    let outcome = expander.expand("${v0} and ${v0}");
    if fits {
        assert_eq!(outcome.expect("within the cap"), "end and end");
    } else {
        assert!(matches!(
            outcome,
            Err(ExpansionError::DepthExceeded { limit: 4, .. })
        ));
    }
}

#[test]
fn resolver_failures_carry_the_source() {
    struct Offline;
    impl Resolver for Offline {
        fn resolve(&self, name: &str) -> Result<Option<String>, ResolveError> {
            Err(ResolveError::new(name, "offline"))
        }
    }
    let expander = SimpleVariableExpander::new(Arc::new(Offline));
    let err = expander.expand("${a}").expect_err("resolver failure");
    match err {
        ExpansionError::Resolver { source_text, source } => {
            assert_eq!(source_text, "${a}");
            assert_eq!(source.name(), "a");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[rstest]
fn custom_markers(resolver: Arc<dyn Resolver>) {
    let expander =
        SimpleVariableExpander::with_markers(resolver, "#{", "}#").expect("valid markers");
    assert_eq!(expander.expand("hi #{name}#").expect("expansion"), "hi world");
    assert_eq!(expander.expand("hi ${name}").expect("expansion"), "hi ${name}");
}

#[rstest]
#[case("", "}", "prefix")]
#[case("${", "", "suffix")]
fn empty_markers_are_rejected(
    resolver: Arc<dyn Resolver>,
    #[case] prefix: &str,
    #[case] suffix: &str,
    #[case] marker: &str,
) {
    let err = SimpleVariableExpander::with_markers(resolver, prefix, suffix)
        .expect_err("empty marker");
    assert!(matches!(err, ExpansionError::InvalidMarkers { marker: m } if m == marker));
}

#[test]
fn no_op_returns_input() {
    assert_eq!(
        NoOpVariableExpander.expand("${anything}").expect("identity"),
        "${anything}"
    );
}

#[rstest]
#[case("${name}", "world")]
#[case("say ${greeting}", "say hello ${name}")]
#[case("no variables", "no variables")]
fn pattern_expander_does_not_rescan(
    resolver: Arc<dyn Resolver>,
    #[case] input: &str,
    #[case] expected: &str,
) {
    let expander = PatternVariableExpander::new(resolver).expect("default pattern");
    assert_eq!(expander.expand(input).expect("expansion"), expected);
}

#[rstest]
fn pattern_expander_rejects_empty_names(resolver: Arc<dyn Resolver>) {
    let expander = PatternVariableExpander::new(resolver).expect("default pattern");
    let err = expander.expand("a ${} b").expect_err("empty name");
    assert!(matches!(err, ExpansionError::EmptyVariableName { .. }));
}

#[rstest]
fn pattern_expander_reports_unresolved(resolver: Arc<dyn Resolver>) {
    let expander = PatternVariableExpander::new(resolver).expect("default pattern");
    let err = expander.expand("${missing}").expect_err("unresolved");
    assert!(matches!(err, ExpansionError::UnresolvedVariable { name, .. } if name == "missing"));
}

#[rstest]
fn pattern_expander_custom_pattern(resolver: Arc<dyn Resolver>) {
    let expander =
        PatternVariableExpander::with_pattern(resolver, r"%\((\w+)\)").expect("valid pattern");
    assert_eq!(expander.expand("%(name)!").expect("expansion"), "world!");
}
