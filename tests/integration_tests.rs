use serde::Serialize;
use toon_codec::{
    decode, encode, encode_value, to_value, toon, DecodeOptions, Delimiter, EncodeOptions,
    KeyFolding, PathExpansion, Value,
};

fn enc(value: &Value) -> String {
    encode_value(value, &EncodeOptions::default())
}

fn dec(text: &str) -> Value {
    decode(text, &DecodeOptions::default()).unwrap()
}

fn assert_roundtrip(value: &Value) {
    let text = enc(value);
    let back = dec(&text);
    assert_eq!(&back, value, "roundtrip failed through:\n{}", text);
}

#[test]
fn simple_tabular() {
    let value = toon!({
        "users": [
            {"id": 1, "name": "Alice", "role": "admin"},
            {"id": 2, "name": "Bob", "role": "user"}
        ]
    });
    assert_eq!(
        enc(&value),
        "users[2]{id,name,role}:\n  1,Alice,admin\n  2,Bob,user"
    );
    assert_roundtrip(&value);
}

#[test]
fn inline_primitives_with_pipe_delimiter() {
    let value = toon!({"items": ["a", "b", "c"]});
    let options = EncodeOptions::new().with_delimiter(Delimiter::Pipe);
    assert_eq!(encode_value(&value, &options), "items[3|]: a|b|c");
    assert_eq!(dec("items[3|]: a|b|c"), value);
}

#[test]
fn nested_single_key_folding() {
    let value = toon!({"a": {"b": {"c": 1}}});

    let options = EncodeOptions::new().with_key_folding(KeyFolding::Safe);
    assert_eq!(encode_value(&value, &options), "a.b.c: 1");

    let options = options.with_flatten_depth(2);
    assert_eq!(encode_value(&value, &options), "a.b:\n  c: 1");

    // Folded output expands back to the original tree.
    let decode_options = DecodeOptions::new().with_expand_paths(PathExpansion::Safe);
    assert_eq!(decode("a.b.c: 1", &decode_options).unwrap(), value);
}

#[test]
fn path_expansion_conflict() {
    let text = "a: 1\na.b: 2";
    let strict = DecodeOptions::new().with_expand_paths(PathExpansion::Safe);
    let err = decode(text, &strict).unwrap_err();
    assert_eq!(err.kind(), toon_codec::ErrorKind::PathExpansion);

    let lenient = strict.with_strict(false);
    assert_eq!(decode(text, &lenient).unwrap(), toon!({"a": {"b": 2}}));
}

#[test]
fn quoting_triggers() {
    let value = toon!({"items": ["a,b", "c"]});
    assert_eq!(enc(&value), "items[2]: \"a,b\",c");
    assert_roundtrip(&value);

    let value = toon!({"k": "true"});
    assert_eq!(enc(&value), "k: \"true\"");
    assert_roundtrip(&value);

    let value = toon!({"k": "42"});
    assert_eq!(enc(&value), "k: \"42\"");
    assert_roundtrip(&value);
}

#[test]
fn list_item_with_tabular_first_field() {
    let value = toon!({
        "items": [{
            "users": [{"id": 1, "name": "Ada"}, {"id": 2, "name": "Bob"}],
            "status": "active"
        }]
    });
    let expected = "items[1]:\n  - users[2]{id,name}:\n      1,Ada\n      2,Bob\n    status: active";
    assert_eq!(enc(&value), expected);
    assert_eq!(dec(expected), value);
}

#[test]
fn wire_format_example() {
    let value = toon!({
        "users": [
            {"id": 1, "name": "Alice", "role": "admin"},
            {"id": 2, "name": "Bob", "role": "user"}
        ],
        "numbers": [1, 2, 3],
        "empty": [],
        "server": {"host": "localhost", "port": 8080}
    });
    let expected = "users[2]{id,name,role}:\n  1,Alice,admin\n  2,Bob,user\n\
                    numbers[3]: 1,2,3\n\
                    empty[0]:\n\
                    server:\n  host: localhost\n  port: 8080";
    assert_eq!(enc(&value), expected);
    assert_eq!(dec(expected), value);
}

#[test]
fn crlf_input_is_accepted() {
    let value = dec("a: 1\r\nb: 2\r\n");
    assert_eq!(value, toon!({"a": 1, "b": 2}));
}

#[test]
fn heterogeneous_lists() {
    let value = toon!({
        "mixed": [1, "two", {"x": 1, "y": [2, 3]}, [4, 5], null, {}]
    });
    assert_roundtrip(&value);
}

#[test]
fn deeply_nested_structures() {
    let value = toon!({
        "a": {
            "b": {
                "c": [{"d": [{"e": 1, "f": "g"}], "h": 2}]
            }
        }
    });
    assert_roundtrip(&value);
}

#[test]
fn arrays_of_primitive_arrays() {
    let value = toon!({"matrix": [[1, 2], [3, 4], []]});
    assert_eq!(enc(&value), "matrix[3]:\n  - [2]: 1,2\n  - [2]: 3,4\n  - [0]:");
    assert_roundtrip(&value);
}

#[test]
fn root_level_arrays() {
    let value = toon!([1, 2, 3]);
    assert_eq!(enc(&value), "[3]: 1,2,3");
    assert_roundtrip(&value);

    let value = toon!([{"a": 1}, {"a": 2}]);
    assert_eq!(enc(&value), "[2]{a}:\n  1\n  2");
    assert_roundtrip(&value);

    let value = toon!([]);
    assert_eq!(enc(&value), "[0]:");
    assert_roundtrip(&value);
}

#[test]
fn unicode_content() {
    let value = toon!({"greeting": "こんにちは", "emoji": "👋 hello", "café": 1});
    assert_eq!(enc(&value), "greeting: こんにちは\nemoji: 👋 hello\n\"café\": 1");
    assert_roundtrip(&value);
}

#[test]
fn escape_sequences_roundtrip() {
    let value = toon!({"text": "line1\nline2\t\"quoted\"\\end"});
    assert_roundtrip(&value);
}

#[test]
fn empty_strings_and_whitespace() {
    let value = toon!({"empty": "", "padded": " x ", "inner": "a b"});
    assert_eq!(enc(&value), "empty: \"\"\npadded: \" x \"\ninner: a b");
    assert_roundtrip(&value);
}

#[test]
fn leading_zero_strings_stay_strings() {
    let value = toon!({"zip": "007"});
    // Not a numeric literal, so no quotes are needed and it reads back as
    // a string.
    assert_eq!(enc(&value), "zip: 007");
    assert_roundtrip(&value);
}

#[test]
fn numbers_roundtrip_by_value() {
    let value = toon!({"a": 0, "b": 3.5, "c": (-7), "d": 1000000.0, "e": 0.25});
    assert_eq!(enc(&value), "a: 0\nb: 3.5\nc: -7\nd: 1000000\ne: 0.25");
}

#[test]
fn big_integers_are_verbatim() {
    let huge = "98765432109876543210";
    let text = format!("n: {}", huge);
    let value = dec(&text);
    assert_eq!(enc(&value), text);
}

#[test]
fn delimiter_closure() {
    let value = toon!({
        "users": [{"id": 1, "note": "a,b"}, {"id": 2, "note": "c|d"}],
        "tags": ["x", "y"]
    });
    for delimiter in [Delimiter::Comma, Delimiter::Tab, Delimiter::Pipe] {
        let options = EncodeOptions::new().with_delimiter(delimiter);
        let text = encode_value(&value, &options);
        assert_eq!(
            decode(&text, &DecodeOptions::default()).unwrap(),
            value,
            "delimiter {:?} failed through:\n{}",
            delimiter,
            text
        );
    }
}

#[test]
fn idempotent_emission() {
    let value = toon!({
        "users": [{"id": 1, "name": "Ada"}],
        "tags": ["a", "b"],
        "nested": {"deep": {"x": 1}}
    });
    let once = enc(&value);
    let twice = enc(&dec(&once));
    assert_eq!(once, twice);
}

#[test]
fn serde_types_encode_directly() {
    #[derive(Serialize)]
    struct Order {
        id: u32,
        total: f64,
        lines: Vec<Line>,
    }
    #[derive(Serialize)]
    struct Line {
        sku: String,
        qty: u32,
    }

    let order = Order {
        id: 7,
        total: 19.5,
        lines: vec![
            Line { sku: "A-1".to_string(), qty: 2 },
            Line { sku: "B-2".to_string(), qty: 1 },
        ],
    };
    let text = encode(&order, &EncodeOptions::default()).unwrap();
    assert_eq!(
        text,
        "id: 7\ntotal: 19.5\nlines[2]{sku,qty}:\n  A-1,2\n  B-2,1"
    );
    assert_eq!(dec(&text), to_value(&order).unwrap());
}

#[test]
fn quoted_keys_roundtrip() {
    let value = toon!({"user-id": 1, "2nd": 2, "with space": 3, "": 4});
    assert_eq!(
        enc(&value),
        "\"user-id\": 1\n\"2nd\": 2\n\"with space\": 3\n\"\": 4"
    );
    assert_roundtrip(&value);
}

#[test]
fn dotted_keys_without_expansion_stay_literal() {
    let value = dec("a.b: 1");
    assert_eq!(value, toon!({"a.b": 1}));
}

#[test]
fn folding_roundtrips_through_expansion() {
    let value = toon!({
        "config": {"server": {"port": 8080}},
        "other": 1
    });
    let encode_options = EncodeOptions::new().with_key_folding(KeyFolding::Safe);
    let text = encode_value(&value, &encode_options);
    assert_eq!(text, "config.server.port: 8080\nother: 1");

    let decode_options = DecodeOptions::new().with_expand_paths(PathExpansion::Safe);
    assert_eq!(decode(&text, &decode_options).unwrap(), value);
}

#[test]
fn four_space_indentation() {
    let value = toon!({"server": {"host": "localhost"}});
    let encode_options = EncodeOptions::new().with_indent(4);
    let text = encode_value(&value, &encode_options);
    assert_eq!(text, "server:\n    host: localhost");

    let decode_options = DecodeOptions::new().with_indent(4);
    assert_eq!(decode(&text, &decode_options).unwrap(), value);
}

#[test]
fn lenient_mode_accepts_everything_strict_does() {
    let strict = DecodeOptions::default();
    let lenient = DecodeOptions::new().with_strict(false);
    let docs = [
        "users[2]{id,name}:\n  1,Ada\n  2,Bob",
        "numbers[3]: 1,2,3",
        "items[2]:\n  - a\n  - b: 1\n    c: 2",
        "server:\n  host: localhost",
        "[2]: x,y",
        "hello",
        "",
    ];
    for doc in docs {
        let a = decode(doc, &strict).unwrap();
        let b = decode(doc, &lenient).unwrap();
        assert_eq!(a, b, "modes disagree on {:?}", doc);
    }
}
