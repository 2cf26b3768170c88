use typemut_ir::json::{parse_plain, parse_tagged, ValueError};
use typemut_ir::types::{Kind, Value};

#[test]
fn test_plain_numbers_split_into_integer_and_float() {
    let v = parse_plain("[1, 1.0, -3, 2.5]").unwrap();
    assert_eq!(
        v,
        Value::Sequence(vec![
            Value::Integer(1),
            Value::Float(1.0),
            Value::Integer(-3),
            Value::Float(2.5),
        ])
    );
}

#[test]
fn test_plain_object_becomes_string_keyed_mapping() {
    let v = parse_plain(r#"{"b": [true], "a": "x"}"#).unwrap();
    let Value::Mapping(map) = v else {
        panic!("expected mapping");
    };
    assert_eq!(map.len(), 2);
    assert_eq!(map.get(&Value::from("a")), Some(&Value::from("x")));
    assert_eq!(
        map.get(&Value::from("b")),
        Some(&Value::Sequence(vec![Value::Boolean(true)]))
    );
}

#[test]
fn test_plain_null_is_unsupported() {
    let err = parse_plain("[1, null]").unwrap_err();
    assert!(matches!(err, ValueError::UnsupportedType { ref found } if found == "null"));
}

#[test]
fn test_invalid_json_is_json_error() {
    assert!(matches!(parse_plain("[1,"), Err(ValueError::Json(_))));
}

#[test]
fn test_tagged_roundtrip_preserves_tuple_set_and_keys() {
    let v = Value::Sequence(vec![
        Value::Tuple(vec![Value::Integer(1), Value::from("a")]),
        Value::set_from(vec![Value::Float(0.5), Value::Float(f64::NAN)]),
        Value::mapping_from(vec![(Value::Integer(3), Value::Boolean(true))]),
    ]);
    let text = serde_json::to_string(&v).unwrap();
    let back: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(back, v);
    assert_eq!(parse_tagged(&text).unwrap(), v);
}

#[test]
fn test_tagged_unknown_kind_is_unsupported() {
    let err = parse_tagged(r#"{"kind": "complex", "value": [1, 2]}"#).unwrap_err();
    assert!(matches!(err, ValueError::UnsupportedType { ref found } if found == "complex"));
}

#[test]
fn test_tagged_wrong_content_is_malformed() {
    let err = parse_tagged(r#"{"kind": "integer", "value": "seven"}"#).unwrap_err();
    assert!(matches!(
        err,
        ValueError::Malformed {
            kind: Kind::Integer,
            ..
        }
    ));
}

#[test]
fn test_to_json_renders_mapping_forms() {
    let string_keys = Value::mapping_from(vec![(Value::from("a"), Value::Integer(1))]);
    assert_eq!(string_keys.to_json(), serde_json::json!({"a": 1}));

    let int_keys = Value::mapping_from(vec![(Value::Integer(1), Value::from("a"))]);
    assert_eq!(int_keys.to_json(), serde_json::json!([[1, "a"]]));
}

#[test]
fn test_to_json_non_finite_floats() {
    assert_eq!(Value::Float(f64::INFINITY).to_json(), serde_json::json!("inf"));
    assert_eq!(Value::Float(f64::NAN).to_json(), serde_json::json!("nan"));
}
