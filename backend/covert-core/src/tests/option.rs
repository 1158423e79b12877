// Unit tests for typed configuration options
// Covers text parsing, JSON conversion, validation on set and lossless serialization

use crate::error::option::OptionError;
use crate::option::{ConfigOption, OptionSet, OptionValue, RenderHint, TypeTag};

use std::net::Ipv4Addr;

use serde_json::json;

fn option(value: serde_json::Value) -> ConfigOption {
    serde_json::from_value(value).expect("fixture option should decode")
}

// ============================================
// PARSING OPERATOR TEXT
// ============================================

/// **VALUE**: Verifies a number that is well-formed but too wide is reported as out of range.
///
/// **WHY THIS MATTERS**: Operators type port numbers by hand. 70000 is a plausible typo and
/// must be rejected with a message that says "does not fit", not "not a number".
///
/// **BUG THIS CATCHES**: Would catch silent truncation (70000 as u16 = 4464) or clamping to
/// 65535, both of which would open the channel on the wrong port.
#[test]
fn given_u16_text_too_large_when_parse_then_out_of_range() {
    // WHEN
    let result = OptionValue::parse(&TypeTag::U16, "70000");

    // THEN
    assert!(matches!(result, Err(OptionError::OutOfRange { .. })));
}

/// **VALUE**: Verifies non-numeric input is a parse error, distinct from out-of-range.
///
/// **BUG THIS CATCHES**: Would catch treating garbage as zero or as a range problem.
#[test]
fn given_u16_text_not_a_number_when_parse_then_parse_error() {
    let result = OptionValue::parse(&TypeTag::U16, "abc");
    assert!(matches!(result, Err(OptionError::Parse { .. })));
}

/// **VALUE**: Verifies the signed 8-bit bounds are exact.
///
/// **BUG THIS CATCHES**: Off-by-one in the width check (accepting -129 or rejecting -128).
#[test]
fn given_i8_bounds_when_parse_then_edges_accepted_and_beyond_rejected() {
    assert_eq!(
        OptionValue::parse(&TypeTag::I8, "-128").expect("lower bound fits"),
        OptionValue::I8(-128)
    );
    assert_eq!(
        OptionValue::parse(&TypeTag::I8, "127").expect("upper bound fits"),
        OptionValue::I8(127)
    );
    assert!(matches!(
        OptionValue::parse(&TypeTag::I8, "-129"),
        Err(OptionError::OutOfRange { .. })
    ));
    assert!(matches!(
        OptionValue::parse(&TypeTag::I8, "128"),
        Err(OptionError::OutOfRange { .. })
    ));
}

/// **VALUE**: Verifies negative input for an unsigned type is out of range, and a digit
/// string longer than any integer type is still "out of range" rather than "malformed".
#[test]
fn given_unsigned_negative_or_huge_when_parse_then_out_of_range() {
    assert!(matches!(
        OptionValue::parse(&TypeTag::U64, "-1"),
        Err(OptionError::OutOfRange { .. })
    ));
    assert!(matches!(
        OptionValue::parse(&TypeTag::U64, "999999999999999999999999999999999999999999"),
        Err(OptionError::OutOfRange { .. })
    ));
}

/// **VALUE**: Verifies booleans only accept the two literal spellings.
///
/// **BUG THIS CATCHES**: Would catch a lenient parser turning "yes" or "1" into true.
#[test]
fn given_bool_text_when_parse_then_only_true_and_false_accepted() {
    assert_eq!(
        OptionValue::parse(&TypeTag::Bool, "true").expect("true parses"),
        OptionValue::Bool(true)
    );
    assert_eq!(
        OptionValue::parse(&TypeTag::Bool, "false").expect("false parses"),
        OptionValue::Bool(false)
    );
    assert!(matches!(
        OptionValue::parse(&TypeTag::Bool, "yes"),
        Err(OptionError::Parse { .. })
    ));
}

/// **VALUE**: Verifies a malformed dotted quad is rejected.
#[test]
fn given_bad_ipv4_text_when_parse_then_parse_error() {
    assert!(matches!(
        OptionValue::parse(&TypeTag::Ipv4, "10.0.0.256"),
        Err(OptionError::Parse { .. })
    ));
    assert_eq!(
        OptionValue::parse(&TypeTag::Ipv4, "10.0.0.5").expect("valid address"),
        OptionValue::Ipv4(Ipv4Addr::new(10, 0, 0, 5))
    );
}

/// **VALUE**: Verifies octets are read as plain decimal, leading zeros included.
///
/// **BUG THIS CATCHES**: Would catch `010.0.0.1` being refused (or read as octal)
/// when an operator pads addresses for alignment.
#[test]
fn given_zero_padded_octets_when_parse_then_decimal_address() {
    assert_eq!(
        OptionValue::parse(&TypeTag::Ipv4, "010.000.0.001").expect("padded octets are valid"),
        OptionValue::Ipv4(Ipv4Addr::new(10, 0, 0, 1))
    );
}

#[test]
fn given_wrong_octet_count_or_junk_when_parse_ipv4_then_parse_error() {
    for input in ["1.2.3", "1.2.3.4.5", "1..2.3", "a.b.c.d", "1.2.3.+4", "0001.2.3.4", ""] {
        assert!(
            matches!(
                OptionValue::parse(&TypeTag::Ipv4, input),
                Err(OptionError::Parse { .. })
            ),
            "'{input}' should not parse"
        );
    }
}

/// **VALUE**: Verifies rendering a value and parsing it back yields the same value.
///
/// **WHY THIS MATTERS**: Text renderers show `render()` and send back what the operator
/// left in the field. An unchanged field must not change the value.
///
/// **BUG THIS CATCHES**: Would catch a renderer that formats numbers with separators or
/// booleans as "True".
#[test]
fn given_rendered_values_when_parsed_back_then_unchanged() {
    let cases = [
        (TypeTag::Ipv4, OptionValue::Ipv4(Ipv4Addr::new(192, 168, 1, 20))),
        (TypeTag::I8, OptionValue::I8(-7)),
        (TypeTag::U16, OptionValue::U16(65535)),
        (TypeTag::U64, OptionValue::U64(u64::MAX)),
        (TypeTag::ExactU64, OptionValue::ExactU64(42)),
        (TypeTag::Bool, OptionValue::Bool(true)),
        (TypeTag::Select, OptionValue::Select("datagram".to_string())),
    ];

    for (tag, value) in cases {
        let text = value.render();
        let parsed = OptionValue::parse(&tag, &text).expect("rendered text should parse");
        assert_eq!(parsed, value, "round trip through '{text}' changed the {tag} value");
    }
}

/// **VALUE**: Verifies unsupported tags cannot be parsed into.
#[test]
fn given_unsupported_tag_when_parse_then_unsupported_type() {
    let tag = TypeTag::from("f32");
    assert!(matches!(
        OptionValue::parse(&tag, "1.5"),
        Err(OptionError::UnsupportedType { .. })
    ));
}

// ============================================
// LOADING AND SETTING CONFIG OPTIONS
// ============================================

/// **VALUE**: Verifies a value of the wrong kind fails to load instead of being coerced.
///
/// **WHY THIS MATTERS**: Schema JSON is untrusted. A u16 published as a string must be
/// caught at the boundary, not discovered when the operator opens the channel.
#[test]
fn given_u16_option_with_string_value_when_deserialized_then_rejected() {
    let result: Result<ConfigOption, _> =
        serde_json::from_value(json!({ "Type": "u16", "Value": "8080" }));
    assert!(result.is_err());
}

/// **VALUE**: Verifies a rejected set leaves the option exactly as it was.
///
/// **BUG THIS CATCHES**: Would catch an implementation that stores first and validates after.
#[test]
fn given_u16_option_when_set_with_bool_then_type_mismatch_and_value_unchanged() {
    // GIVEN
    let mut port = option(json!({ "Type": "u16", "Value": 8080, "Display": { "Name": "Port" } }));

    // WHEN
    let result = port.set(OptionValue::Bool(true));

    // THEN
    assert!(matches!(result, Err(OptionError::TypeMismatch { .. })));
    assert_eq!(port.value(), &OptionValue::U16(8080));
}

/// **VALUE**: Verifies select options only accept listed choices.
#[test]
fn given_select_option_when_set_outside_range_then_invalid_choice() {
    let mut mode = option(json!({
        "Type": "select",
        "Value": "stream",
        "Range": ["stream", "datagram"]
    }));

    let result = mode.set_from_str("carrier-pigeon");

    assert!(matches!(result, Err(OptionError::InvalidChoice { .. })));
    assert_eq!(mode.render(), "stream");

    mode.set_from_str("datagram").expect("listed choice is accepted");
    assert_eq!(mode.value(), &OptionValue::Select("datagram".to_string()));
}

/// **VALUE**: Verifies a select option whose published value is not in its range is
/// rejected at load time.
#[test]
fn given_select_value_outside_published_range_when_deserialized_then_rejected() {
    let result: Result<ConfigOption, _> = serde_json::from_value(json!({
        "Type": "select",
        "Value": "other",
        "Range": ["stream"]
    }));
    assert!(result.is_err());
}

/// **VALUE**: Verifies exactu64 options only accept the value the service published.
///
/// **WHY THIS MATTERS**: These are protocol constants (magic numbers). Sending any other
/// value makes the service reject the open request.
#[test]
fn given_exactu64_option_when_set_to_other_value_then_out_of_range() {
    let mut magic = option(json!({ "Type": "exactu64", "Value": 42 }));

    assert!(matches!(
        magic.set_from_str("43"),
        Err(OptionError::OutOfRange { .. })
    ));
    magic
        .set_from_str("42")
        .expect("the published value is accepted");
    assert_eq!(magic.value(), &OptionValue::ExactU64(42));
}

/// **VALUE**: Verifies native JSON from a renderer goes through the same checks.
#[test]
fn given_native_json_when_set_json_then_kind_and_width_checked() {
    let mut verbose = option(json!({ "Type": "bool", "Value": false }));
    verbose.set_json(json!(true)).expect("a JSON bool is accepted");
    assert_eq!(verbose.value(), &OptionValue::Bool(true));
    assert!(matches!(
        verbose.set_json(json!("true")),
        Err(OptionError::TypeMismatch { .. })
    ));

    let mut port = option(json!({ "Type": "u16", "Value": 1 }));
    assert!(matches!(
        port.set_json(json!(1.5)),
        Err(OptionError::OutOfRange { .. })
    ));
    assert!(matches!(
        port.set_json(json!(70000)),
        Err(OptionError::OutOfRange { .. })
    ));
}

/// **VALUE**: Verifies an option with an unknown tag loads, shows as unsupported and
/// cannot be edited.
///
/// **WHY THIS MATTERS**: A newer service may add types. The client must still be able to
/// load the schema and pass those options through untouched.
#[test]
fn given_unknown_tag_when_loaded_then_kept_raw_and_not_editable() {
    let raw = json!({ "Type": "f32", "Value": 1.5, "Display": { "Name": "Gain" } });
    let mut gain = option(raw.clone());

    assert_eq!(gain.render_hint(), RenderHint::Unsupported);
    assert!(matches!(
        gain.set_from_str("2.0"),
        Err(OptionError::UnsupportedType { .. })
    ));
    assert!(matches!(
        gain.set_json(json!(2.0)),
        Err(OptionError::UnsupportedType { .. })
    ));
    assert_eq!(serde_json::to_value(&gain).expect("serializes"), raw);
}

/// **VALUE**: Verifies members the client does not model survive a round trip.
///
/// **BUG THIS CATCHES**: Would catch dropping display hints or a non-select `Range`
/// when the option is echoed back in an open request.
#[test]
fn given_extra_members_when_round_tripped_then_preserved() {
    let raw = json!({
        "Type": "u16",
        "Value": 8080,
        "Display": { "Name": "Port", "Description": "Listening port" },
        "Range": [1, 65535],
        "Hint": "advanced"
    });

    let port = option(raw.clone());

    assert_eq!(port.display_name(), "Port");
    assert_eq!(port.range(), None);
    assert_eq!(serde_json::to_value(&port).expect("serializes"), raw);
}

/// **VALUE**: Verifies the typed constructor applies the same checks as loading.
#[test]
fn given_typed_parts_when_constructed_then_validated() {
    let mode = ConfigOption::new(
        TypeTag::Select,
        OptionValue::Select("a".to_string()),
        "Mode",
        Some(vec!["a".to_string(), "b".to_string()]),
    )
    .expect("value is in range");
    assert_eq!(mode.range(), Some(&["a".to_string(), "b".to_string()][..]));

    let result = ConfigOption::new(TypeTag::U16, OptionValue::I8(1), "Port", None);
    assert!(matches!(result, Err(OptionError::TypeMismatch { .. })));
}

// ============================================
// OPTION SETS
// ============================================

/// **VALUE**: Verifies option sets refuse keys the schema does not define.
#[test]
fn given_option_set_when_setting_unknown_key_then_unknown_option() {
    let mut set: OptionSet = serde_json::from_value(json!({
        "shift": { "Type": "i8", "Value": 3 }
    }))
    .expect("fixture set should decode");

    assert!(matches!(
        set.set_from_str("rotate", "4"),
        Err(OptionError::UnknownOption { .. })
    ));
    set.set_from_str("shift", "-4").expect("shift is an i8");
    assert_eq!(
        set.get("shift").map(ConfigOption::value),
        Some(&OptionValue::I8(-4))
    );
    assert_eq!(set.keys().collect::<Vec<_>>(), vec!["shift"]);
}
