//! Property-based tests: round-trip guarantees over generated value trees.
//!
//! Strategies generate primitives (including the awkward strings: empty,
//! reserved words, numeric lookalikes, delimiter-laden), flat and nested
//! objects, and arrays that naturally fall into each of the encoder's
//! forms. Numbers are compared by value, since `5.0` legitimately reads
//! back as the integer `5`.

use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use toon_codec::{
    decode, encode_value, DecodeOptions, Delimiter, EncodeOptions, Map, Number, Value,
};

/// Structural equality with numbers compared by value.
fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x, y) {
            (Number::Big(bx), Number::Big(by)) => bx == by,
            _ => x.as_f64() == y.as_f64(),
        },
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| values_equal(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .zip(ys.iter())
                    .all(|((xk, xv), (yk, yv))| xk == yk && values_equal(xv, yv))
        }
        _ => a == b,
    }
}

fn arb_key() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::string::string_regex("[a-zA-Z_][a-zA-Z0-9_]{0,12}").unwrap(),
        prop::string::string_regex("[a-z]{1,6}[- ][a-z]{1,6}").unwrap(),
        Just("2nd".to_string()),
    ]
}

fn arb_string() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::string::string_regex("[a-zA-Z0-9 ]{0,24}").unwrap(),
        prop::string::string_regex("[a-zA-Z0-9:,|\\[\\]{}. ]{0,16}").unwrap(),
        Just(String::new()),
        Just("true".to_string()),
        Just("false".to_string()),
        Just("null".to_string()),
        Just("42".to_string()),
        Just("3.14".to_string()),
        Just("-1".to_string()),
        Just("05".to_string()),
        Just(" padded ".to_string()),
        Just("- item".to_string()),
        Just("-".to_string()),
        Just("line\nbreak".to_string()),
        Just("tab\there".to_string()),
        Just("back\\slash \"quote\"".to_string()),
        Just("café".to_string()),
        Just("你好".to_string()),
    ]
}

fn arb_number() -> impl Strategy<Value = Number> {
    prop_oneof![
        any::<i64>().prop_map(Number::Integer),
        (-1.0e12..1.0e12f64).prop_map(Number::Float),
        (0.0f64..1.0).prop_map(Number::Float),
        any::<i128>().prop_map(|i| Number::Big(i.into())),
    ]
}

fn arb_primitive() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        arb_number().prop_map(Value::Number),
        arb_string().prop_map(Value::String),
    ]
}

fn arb_value() -> impl Strategy<Value = Value> {
    arb_primitive().prop_recursive(3, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::vec((arb_key(), inner), 0..6)
                .prop_map(|entries| Value::Object(Map::from_iter(entries))),
        ]
    })
}

/// A uniform object array, to exercise the tabular form specifically.
fn arb_tabular() -> impl Strategy<Value = Value> {
    (
        prop::collection::vec(
            prop::string::string_regex("[a-z][a-z0-9]{0,6}").unwrap(),
            1..4,
        ),
        1..5usize,
    )
        .prop_flat_map(|(mut fields, rows)| {
            fields.sort();
            fields.dedup();
            let width = fields.len();
            prop::collection::vec(prop::collection::vec(arb_primitive(), width..=width), rows..=rows)
                .prop_map(move |rows| {
                    let arr = rows
                        .into_iter()
                        .map(|row| {
                            let mut obj = Map::new();
                            for (field, value) in fields.iter().zip(row) {
                                obj.insert(field.clone(), value);
                            }
                            Value::Object(obj)
                        })
                        .collect();
                    Value::Array(arr)
                })
        })
}

fn roundtrip(value: &Value, encode_options: &EncodeOptions) -> Result<(), TestCaseError> {
    let text = encode_value(value, encode_options);
    let back = decode(&text, &DecodeOptions::default())
        .map_err(|e| TestCaseError::fail(format!("decode failed: {}\non:\n{}", e, text)))?;
    prop_assert!(
        values_equal(value, &back),
        "roundtrip mismatch through:\n{}\noriginal: {:?}\ndecoded:  {:?}",
        text,
        value,
        back
    );
    Ok(())
}

proptest! {
    #[test]
    fn prop_roundtrip_default(value in arb_value()) {
        roundtrip(&value, &EncodeOptions::default())?;
    }

    #[test]
    fn prop_roundtrip_every_delimiter(value in arb_value()) {
        for delimiter in [Delimiter::Comma, Delimiter::Tab, Delimiter::Pipe] {
            roundtrip(&value, &EncodeOptions::new().with_delimiter(delimiter))?;
        }
    }

    #[test]
    fn prop_roundtrip_tabular(value in arb_tabular()) {
        roundtrip(&value, &EncodeOptions::default())?;
    }

    #[test]
    fn prop_emission_is_idempotent(value in arb_value()) {
        let options = EncodeOptions::default();
        let once = encode_value(&value, &options);
        let back = decode(&once, &DecodeOptions::default())
            .map_err(|e| TestCaseError::fail(format!("decode failed: {}\non:\n{}", e, once)))?;
        prop_assert_eq!(encode_value(&back, &options), once);
    }

    #[test]
    fn prop_strict_accepts_all_encoder_output(value in arb_value()) {
        let text = encode_value(&value, &EncodeOptions::default());
        prop_assert!(decode(&text, &DecodeOptions::default()).is_ok(), "rejected:\n{}", text);
        // And lenient mode agrees with strict mode on it.
        let lenient = DecodeOptions::new().with_strict(false);
        prop_assert_eq!(
            decode(&text, &DecodeOptions::default()).unwrap(),
            decode(&text, &lenient).unwrap()
        );
    }

    #[test]
    fn prop_output_has_clean_lines(value in arb_value()) {
        let text = encode_value(&value, &EncodeOptions::default());
        prop_assert!(!text.ends_with('\n'));
        for line in text.lines() {
            prop_assert_eq!(line, line.trim_end());
        }
    }

    #[test]
    fn prop_floats_never_emit_exponents(f in any::<f64>()) {
        let value = Value::Number(Number::Float(f));
        let text = encode_value(&value, &EncodeOptions::default());
        prop_assert!(!text.contains('e') && !text.contains('E'), "got {}", text);
    }

    #[test]
    fn prop_signed_zero_normalizes(sign in any::<bool>()) {
        let zero = if sign { 0.0 } else { -0.0 };
        let text = encode_value(&Value::Number(Number::Float(zero)), &EncodeOptions::default());
        prop_assert_eq!(text, "0");
    }
}
