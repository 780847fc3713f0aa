//! Field → handler dispatch through `CheckFactory`.

mod common;

use std::str::FromStr;
use std::sync::Arc;

use bigdecimal::BigDecimal;
use chaincheck::prelude::*;
use common::{RecordingSink, init_tracing};
use pretty_assertions::assert_eq;
use rstest::rstest;

// ============================================================================
// FIXTURES
// ============================================================================

/// Single-field object built from an arbitrary descriptor.
#[derive(Debug)]
struct One(FieldDescriptor);

impl Checkable for One {
    fn fields(&self) -> Vec<FieldDescriptor> {
        vec![self.0.clone()]
    }
}

fn field<T: IntoValue + ?Sized>(name: &'static str, value: &T) -> FieldDescriptor {
    FieldDescriptor::of("One", name, value)
}

fn failures_of(object: &dyn Checkable) -> ValidationErrors {
    init_tracing();
    let mut chain = CheckChain::new().fail_fast(false);
    CheckFactory::with_config(&CheckConfig::default())
        .target(object)
        .create(&mut chain)
        .expect("no evaluation error");
    chain.failures().clone()
}

/// Host marker no built-in handler understands.
#[derive(Debug)]
struct CheckEven;

impl Marker for CheckEven {}

// ============================================================================
// FIRST MATCH
// ============================================================================

#[test]
fn unrecognized_markers_are_never_dispatched() {
    init_tracing();
    let object = One(field("count", &3).with_marker(CheckEven));
    let mut sink = RecordingSink::default();

    CheckFactory::with_config(&CheckConfig::default())
        .target(&object)
        .create(&mut sink)
        .expect("dispatch");

    assert!(sink.calls.is_empty());
    assert!(sink.reasons.is_empty());
}

#[test]
fn fields_without_markers_record_nothing() {
    let object = One(field("name", ""));
    assert!(failures_of(&object).is_empty());
}

#[test]
fn only_the_earlier_registered_handler_runs() {
    // The regex would fail, but not-null comes first in the registry.
    let object = One(
        field("name", "pear")
            .with_marker(CheckRegex::new("apple"))
            .with_marker(CheckNotNull),
    );
    assert!(failures_of(&object).is_empty());

    let mut sink = RecordingSink::default();
    CheckFactory::with_config(&CheckConfig::default())
        .target(&object)
        .create(&mut sink)
        .expect("dispatch");
    assert_eq!(sink.calls, ["is_not_null"]);
}

#[test]
fn registry_order_decides_precedence() {
    let mut config = CheckConfig::default();
    let regex = config
        .registry
        .remove(HandlerKind::of::<RegexHandler>())
        .expect("registered by default");
    config.registry.insert(0, regex);

    let object = One(
        field("name", "pear")
            .with_marker(CheckNotNull)
            .with_marker(CheckRegex::new("apple")),
    );
    let mut chain = CheckChain::new();
    CheckFactory::with_config(&config)
        .target(&object)
        .create(&mut chain)
        .expect("dispatch");

    assert_eq!(chain.failures().errors()[0].code, "matches");
}

// ============================================================================
// ONE MARKER: PASS / FAIL
// ============================================================================

#[rstest]
#[case::not_null(field("weight", &Some(3)).with_marker(CheckNotNull))]
#[case::not_blank(field("name", "apple").with_marker(CheckNotBlank::new()))]
#[case::regex(field("name", "apple 12").with_marker(CheckRegex::new(r"apple \d+")))]
#[case::size(field("tags", &vec!["red", "round"]).with_marker(CheckSize::between(1, 3).unwrap()))]
#[case::number(field("price", &7).with_marker(CheckNumberBetween::new(1, 10)))]
fn passing_marker_records_nothing(#[case] descriptor: FieldDescriptor) {
    assert!(failures_of(&One(descriptor)).is_empty());
}

#[rstest]
#[case::not_null(field("weight", &None::<u32>).with_marker(CheckNotNull), "not_null")]
#[case::not_blank(field("name", " \t").with_marker(CheckNotBlank::new()), "not_blank")]
#[case::regex(field("name", "apple 12b").with_marker(CheckRegex::new(r"apple \d+")), "matches")]
#[case::size(field("tags", &Vec::<String>::new()).with_marker(CheckSize::between(1, 3).unwrap()), "size_between")]
#[case::number(field("price", &11).with_marker(CheckNumberBetween::new(1, 10)), "between")]
fn failing_marker_records_one_failure_naming_the_field(
    #[case] descriptor: FieldDescriptor,
    #[case] code: &str,
) {
    let name = descriptor.name().to_owned();
    let failures = failures_of(&One(descriptor));

    assert_eq!(failures.len(), 1);
    assert_eq!(failures.errors()[0].code, code);
    assert!(
        failures.errors()[0].message.contains(&name),
        "message `{}` should name `{name}`",
        failures.errors()[0].message
    );
}

#[test]
fn default_messages() {
    let object = One(field("price", &0).with_marker(CheckNumberBetween::new(1, 10)));
    assert_eq!(
        failures_of(&object).errors()[0].message,
        "[price] must be between 1 and 10, was >0<"
    );

    let object = One(field("name", "").with_marker(CheckNotBlank::new()));
    assert_eq!(failures_of(&object).errors()[0].message, "[name] must not be blank");

    let object = One(field("weight", &None::<u32>).with_marker(CheckNotNull));
    assert_eq!(failures_of(&object).errors()[0].message, "[weight] must not be null");
}

#[test]
fn pattern_braces_are_not_placeholders() {
    let object = One(field("code", "nope").with_marker(CheckRegex::new(r"\{fieldValue}")));
    assert_eq!(
        failures_of(&object).errors()[0].message,
        r"[code] must match `\{fieldValue}`, was >nope<"
    );
}

#[test]
fn reason_override_replaces_default_template() {
    let object = One(
        field("name", "pear 1")
            .with_marker(CheckRegex::new(r"apple \d+").with_reason("{fieldValue} is no apple")),
    );
    assert_eq!(failures_of(&object).errors()[0].message, "pear 1 is no apple");
}

// ============================================================================
// SIZE
// ============================================================================

#[rstest]
#[case("ab", false)]
#[case("abc", true)]
#[case("abcde", true)]
#[case("abcdef", false)]
#[case("äöü", true)]
fn size_of_strings_counts_characters(#[case] value: &str, #[case] passes: bool) {
    let marker = CheckSize::between(3, 5).expect("ordered bounds");
    let object = One(field("name", value).with_marker(marker));
    assert_eq!(failures_of(&object).is_empty(), passes);
}

#[test]
fn size_of_collections_counts_elements() {
    let marker = CheckSize::between(3, 5).expect("ordered bounds");
    let six = One(field("tags", &[1, 2, 3, 4, 5, 6]).with_marker(marker.clone()));
    let four = One(field("tags", &vec![1, 2, 3, 4]).with_marker(marker));

    let failures = failures_of(&six);
    assert_eq!(failures.len(), 1);
    assert_eq!(failures.errors()[0].param("actual"), Some("6"));
    assert!(failures_of(&four).is_empty());
}

#[test]
fn inverted_size_bounds_fail_before_the_value_is_inspected() {
    assert!(CheckSize::between(5, 3).unwrap_err().is_configuration());

    let inverted = CheckSize {
        left: 5,
        right: 3,
        ..CheckSize::default()
    };
    // Null value and null-skip on: the marker is still rejected.
    let object = One(field("name", &None::<String>).with_marker(inverted));
    let mut sink = RecordingSink::null_skip();
    CheckFactory::with_config(&CheckConfig::default())
        .target(&object)
        .create(&mut sink)
        .expect("recording sink absorbs escalations");

    assert!(sink.calls.is_empty());
    assert_eq!(sink.escalated.len(), 1);
    assert!(sink.escalated[0].is_configuration());
    assert!(matches!(sink.escalated[0].root_cause(), CheckError::InvalidMarker { .. }));
}

// ============================================================================
// NUMBER BETWEEN
// ============================================================================

#[rstest]
#[case(0, false)]
#[case(1, true)]
#[case(5, true)]
#[case(10, true)]
#[case(11, false)]
fn number_between_is_inclusive(#[case] value: i32, #[case] passes: bool) {
    let object = One(field("age", &value).with_marker(CheckNumberBetween::new(1, 10)));
    assert_eq!(failures_of(&object).is_empty(), passes);
}

#[rstest]
#[case(0.49, false)]
#[case(0.5, true)]
#[case(9.5, true)]
#[case(9.51, false)]
fn number_between_prefers_string_bounds(#[case] value: f64, #[case] passes: bool) {
    let marker = CheckNumberBetween {
        left: 100,
        left_string: "0.5".into(),
        right_string: "9.5".into(),
        ..CheckNumberBetween::default()
    };
    let object = One(field("price", &value).with_marker(marker));
    assert_eq!(failures_of(&object).is_empty(), passes);
}

fn big(text: &str) -> BigDecimal {
    BigDecimal::from_str(text).expect("valid literal")
}

#[rstest]
#[case::float_above_i64(field("mass", &1e30_f64), CheckNumberBetween::new(0, 10), false)]
#[case::u128_inside_wide_bounds(
    field("mass", &10u128.pow(30)),
    CheckNumberBetween::with_strings("0", "1e33"),
    true
)]
#[case::i128_below_wide_bounds(
    field("mass", &-10i128.pow(34)),
    CheckNumberBetween::with_strings("-1e33", "1e33"),
    false
)]
#[case::digits_beyond_28_places(
    field("ratio", &big("1.00000000000000000000000000000001")),
    CheckNumberBetween::with_strings("0", "1"),
    false
)]
fn number_between_is_judged_at_any_magnitude(
    #[case] descriptor: FieldDescriptor,
    #[case] marker: CheckNumberBetween,
    #[case] passes: bool,
) {
    let failures = failures_of(&One(descriptor.with_marker(marker)));

    assert_eq!(failures.is_empty(), passes);
    if !passes {
        assert_eq!(failures.errors()[0].code, "between");
    }
}

#[test]
fn malformed_number_bound_is_escalated() {
    let marker = CheckNumberBetween::with_strings("cheap", "10");
    let object = One(field("price", &3).with_marker(marker));
    let mut chain = CheckChain::new();

    let err = CheckFactory::with_config(&CheckConfig::default())
        .target(&object)
        .create(&mut chain)
        .unwrap_err();

    assert!(err.is_configuration());
    assert!(matches!(err, CheckError::Evaluation { .. }));
    assert!(chain.failures().is_empty());
}

#[test]
fn non_finite_number_is_an_internal_error() {
    let object = One(field("price", &f64::NAN).with_marker(CheckNumberBetween::new(1, 10)));
    let mut chain = CheckChain::new();

    let err = CheckFactory::with_config(&CheckConfig::default())
        .target(&object)
        .create(&mut chain)
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Internal);
    assert!(matches!(err.root_cause(), CheckError::InvalidNumber { .. }));
}

// ============================================================================
// NULL SKIP
// ============================================================================

#[test]
fn null_with_null_skip_disabled_is_escalated() {
    init_tracing();
    let object = One(field("name", &None::<String>).with_marker(CheckRegex::new("apple")));
    let mut chain = CheckChain::new();

    let err = CheckFactory::with_config(&CheckConfig::default())
        .target(&object)
        .create(&mut chain)
        .unwrap_err();

    assert!(err.is_configuration());
    assert!(matches!(err.root_cause(), CheckError::NullNotSkipped { .. }));
    assert!(err.to_string().contains("One.name"));
    assert!(chain.failures().is_empty(), "escalation is not a soft failure");
}

#[test]
fn fail_fast_chain_absorbs_later_null_fields() {
    #[derive(Debug)]
    struct Two;

    impl Checkable for Two {
        fn fields(&self) -> Vec<FieldDescriptor> {
            vec![
                FieldDescriptor::of("Two", "a", "").with_marker(CheckNotBlank::new()),
                FieldDescriptor::of("Two", "b", &None::<String>).with_marker(CheckRegex::new("apple")),
            ]
        }
    }

    let mut chain = CheckChain::new();
    CheckFactory::with_config(&CheckConfig::default())
        .target(&Two)
        .create(&mut chain)
        .expect("stopped chain does not escalate");

    assert_eq!(
        chain.finish().unwrap_err().messages().collect::<Vec<_>>(),
        ["[a] must not be blank"]
    );
}

#[test]
fn null_with_null_skip_enabled_does_nothing() {
    let object = One(field("name", &None::<String>).with_marker(CheckRegex::new("apple")));
    let mut sink = RecordingSink::null_skip();

    CheckFactory::with_config(&CheckConfig::default())
        .target(&object)
        .create(&mut sink)
        .expect("dispatch");

    assert!(sink.calls.is_empty());
    assert!(sink.escalated.is_empty());

    let mut chain = CheckChain::new().null_skip(true);
    CheckFactory::with_config(&CheckConfig::default())
        .target(&object)
        .create(&mut chain)
        .expect("dispatch");
    assert!(chain.finish().is_ok());
}

#[test]
fn not_null_ignores_null_skip() {
    let object = One(field("weight", &None::<u32>).with_marker(CheckNotNull));
    let mut chain = CheckChain::new().null_skip(true);
    CheckFactory::with_config(&CheckConfig::default())
        .target(&object)
        .create(&mut chain)
        .expect("dispatch");

    assert_eq!(chain.failures().len(), 1);
}

#[test]
fn use_catch_records_escalations_and_continues() {
    #[derive(Debug)]
    struct Two;

    impl Checkable for Two {
        fn fields(&self) -> Vec<FieldDescriptor> {
            vec![
                FieldDescriptor::of("Two", "name", &None::<String>).with_marker(CheckNotBlank::new()),
                FieldDescriptor::of("Two", "price", &0).with_marker(CheckNumberBetween::new(1, 10)),
            ]
        }
    }

    let mut chain = CheckChain::new().use_catch(true).fail_fast(false);
    CheckFactory::with_config(&CheckConfig::default())
        .target(&Two)
        .create(&mut chain)
        .expect("errors are caught");

    let codes: Vec<_> = chain.failures().errors().iter().map(|e| e.code.as_ref()).collect();
    assert_eq!(codes, ["evaluation_error", "between"]);
}

// ============================================================================
// IGNORE SET
// ============================================================================

#[test]
fn ignoring_nothing_still_ignores_not_null() {
    let object = One(field("weight", &None::<u32>).with_marker(CheckNotNull));
    assert_eq!(failures_of(&object).len(), 1);

    let mut chain = CheckChain::new();
    CheckFactory::with_config(&CheckConfig::default())
        .add_ignore_handler([])
        .target(&object)
        .create(&mut chain)
        .expect("dispatch");
    assert!(chain.finish().is_ok());
}

#[test]
fn ignored_handlers_are_removed_not_retained() {
    #[derive(Debug)]
    struct Apple;

    impl Checkable for Apple {
        fn fields(&self) -> Vec<FieldDescriptor> {
            vec![
                FieldDescriptor::of("Apple", "name", "pear").with_marker(CheckRegex::new("apple")),
                FieldDescriptor::of("Apple", "price", &0).with_marker(CheckNumberBetween::new(1, 10)),
            ]
        }
    }

    let mut chain = CheckChain::new().fail_fast(false);
    CheckFactory::with_config(&CheckConfig::default())
        .add_ignore_handler([HandlerKind::of::<RegexHandler>()])
        .target(&Apple)
        .create(&mut chain)
        .expect("dispatch");

    // Regex is gone; number-between still runs.
    let codes: Vec<_> = chain.failures().errors().iter().map(|e| e.code.as_ref()).collect();
    assert_eq!(codes, ["between"]);
}

#[test]
fn ignored_first_match_falls_through_to_next_handler() {
    let object = One(
        field("name", "pear")
            .with_marker(CheckNotNull)
            .with_marker(CheckRegex::new("apple")),
    );
    let mut chain = CheckChain::new();
    CheckFactory::with_config(&CheckConfig::default())
        .add_ignore_handler([])
        .target(&object)
        .create(&mut chain)
        .expect("dispatch");

    assert_eq!(chain.failures().errors()[0].code, "matches");
}

// ============================================================================
// DECLARED TYPES
// ============================================================================

#[test]
fn empty_type_set_matches_every_declared_type() {
    let anything = MarkerHandler::with_types(NotBlankRule, Vec::new());
    assert!(anything.types().is_empty());

    for descriptor in [
        field("flag", &true).with_marker(CheckNotBlank::new()),
        field("count", &3u8).with_marker(CheckNotBlank::new()),
        field("tags", &vec!["x"]).with_marker(CheckNotBlank::new()),
        field("name", "x").with_marker(CheckNotBlank::new()),
    ] {
        assert!(anything.is_supported(&descriptor), "{}", descriptor.ident());
    }

    // The marker is still required.
    assert!(!anything.is_supported(&field("name", "x")));
}

#[test]
fn declared_type_outside_the_set_is_not_supported() {
    let handler = NotBlankHandler::default();
    assert!(!handler.is_supported(&field("count", &3).with_marker(CheckNotBlank::new())));
    assert!(handler.is_supported(&field("name", &None::<String>).with_marker(CheckNotBlank::new())));
}

#[test]
fn widened_type_set_reports_unsupported_values() {
    let mut config = CheckConfig::default();
    config.registry.replace(
        HandlerKind::of::<SizeHandler>(),
        Arc::new(MarkerHandler::with_types(SizeRule, vec![ValueType::Number])),
    );
    let object = One(field("count", &3).with_marker(CheckSize::default()));
    let mut chain = CheckChain::new();

    let err = CheckFactory::with_config(&config)
        .target(&object)
        .create(&mut chain)
        .unwrap_err();

    assert!(err.is_configuration());
    assert!(matches!(
        err.root_cause(),
        CheckError::UnsupportedValue { actual: ValueType::Number, .. }
    ));
}

// ============================================================================
// TARGETS
// ============================================================================

#[test]
fn targets_are_checked_in_order() {
    let first = One(field("a", "").with_marker(CheckNotBlank::new()));
    let second = One(field("b", "").with_marker(CheckNotBlank::new()));
    let mut chain = CheckChain::new().fail_fast(false);

    CheckFactory::with_config(&CheckConfig::default())
        .targets([&first as &dyn Checkable, &second])
        .create(&mut chain)
        .expect("dispatch");

    assert_eq!(
        chain.failures().messages().collect::<Vec<_>>(),
        ["[a] must not be blank", "[b] must not be blank"]
    );
}

#[test]
fn fail_fast_skips_later_fields() {
    let first = One(field("a", "").with_marker(CheckNotBlank::new()));
    let second = One(field("b", "").with_marker(CheckNotBlank::new()));
    let mut chain = CheckChain::new();

    CheckFactory::with_config(&CheckConfig::default())
        .target(&first)
        .target(&second)
        .create(&mut chain)
        .expect("dispatch");

    assert_eq!(chain.failures().len(), 1);
}
