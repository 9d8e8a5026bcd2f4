use json2::{
    from_slice, from_str, from_str_with, from_value, parse, to_bytes, to_string, to_string_with,
    to_value, value, Array, Binary, DecodeOptions, EncodeOptions, Error, Number, Object, Path,
    PathSegment, Value,
};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct User {
    id: u32,
    name: String,
    active: bool,
    tags: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Product {
    sku: String,
    price: f64,
    quantity: u32,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Order {
    order_id: u32,
    customer: User,
    items: Vec<Product>,
    total: f64,
}

fn buffer(bytes: &[u8]) -> Value {
    Value::from(Binary::Buffer(bytes.to_vec()))
}

fn key_is(path: &Path, name: &str) -> bool {
    matches!(path.key(), Some(PathSegment::Key(key)) if key == name)
}

#[test]
fn test_serialize_buffer() {
    let input = buffer(b"Hello");
    let bytes = to_bytes(&input).unwrap();
    assert_eq!(bytes.len(), 45);
    assert_eq!(from_slice(&bytes).unwrap(), input);
}

#[test]
fn test_serialize_large_buffer() {
    let input = buffer(&[0; 51]);
    let bytes = to_bytes(&input).unwrap();
    assert_eq!(bytes.len(), 128);
    assert_eq!(from_slice(&bytes).unwrap(), input);
}

#[test]
fn test_serialize_uint8_array() {
    let input = Value::from(Binary::Uint8Array(b"Hello".to_vec()));
    let bytes = to_bytes(&input).unwrap();
    assert_eq!(bytes.len(), 49);
    assert_eq!(from_slice(&bytes).unwrap(), input);
}

#[test]
fn test_serialize_null() {
    let bytes = to_bytes(&Value::Null).unwrap();
    assert_eq!(bytes, b"null");
    assert_eq!(from_slice(&bytes).unwrap(), Value::Null);
}

#[test]
fn test_stringify_buffer() {
    assert_eq!(
        to_string(&buffer(b"Hello")).unwrap(),
        r#"{"data":[72,101,108,108,111],"type":"Buffer"}"#
    );
}

#[test]
fn test_stringify_large_buffers() {
    for size in [51, 52] {
        let zeros = vec!["0"; size].join(",");
        assert_eq!(
            to_string(&buffer(&vec![0; size])).unwrap(),
            format!(r#"{{"data":[{}],"type":"Buffer"}}"#, zeros)
        );
    }
}

#[test]
fn test_stringify_uint8_array() {
    assert_eq!(
        to_string(&Value::from(Binary::Uint8Array(b"Hello".to_vec()))).unwrap(),
        r#"{"data":[72,101,108,108,111],"type":"Uint8Array"}"#
    );
}

#[test]
fn test_stringify_null_entry() {
    assert_eq!(to_string(&value!({ "empty": null })).unwrap(), r#"{"empty":null}"#);
}

#[test]
fn test_stringify_is_standard_text() {
    let data = value!({
        "text": "line\nbreak \"quoted\" \u{1}",
        "numbers": [0, 7, 1.5, 1e21],
        "nested": { "z": [], "a": {} },
    });
    let text = to_string(&data).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed["text"], "line\nbreak \"quoted\" \u{1}");
    assert_eq!(parsed["numbers"][2], 1.5);
    assert_eq!(
        text,
        r#"{"nested":{"a":{},"z":[]},"numbers":[0,7,1.5,1e+21],"text":"line\nbreak \"quoted\" \u0001"}"#
    );
}

#[test]
fn test_sorted_keys_are_deterministic() {
    let first = value!({ "b": 1, "a": { "d": 2, "c": 3 } });
    let second = value!({ "a": { "c": 3, "d": 2 }, "b": 1 });
    assert_eq!(to_string(&first).unwrap(), to_string(&second).unwrap());
}

#[test]
fn test_unordered_keeps_insertion_order() {
    let data = value!({ "b": 1, "a": 2 });
    let text = to_string_with(&data, &EncodeOptions::new().unordered(), |_: &Path, v: Value| {
        Ok(v)
    })
    .unwrap();
    assert_eq!(text, r#"{"b":1,"a":2}"#);
}

#[test]
fn test_nested_binary_in_sorted_output() {
    let data = Object::new();
    data.insert("zeta", Value::from(Binary::Int16Array(vec![-2, 300])));
    data.insert("alpha", Value::from(Binary::DataView(vec![1])));
    assert_eq!(
        to_string(&Value::Object(data)).unwrap(),
        r#"{"alpha":{"data":[1],"type":"DataView"},"zeta":{"data":[-2,300],"type":"Int16Array"}}"#
    );
}

#[test]
fn test_window_over_numeric_view() {
    let window = Binary::Uint32Array(vec![1]).window();
    assert_eq!(
        to_string(&Value::from(window)).unwrap(),
        r#"{"data":[1,0,0,0],"type":"DataView"}"#
    );
}

#[test]
fn test_repeats_become_markers() {
    let root = Object::new();
    root.insert("self", Value::Object(root.clone()));
    assert_eq!(to_string(&Value::Object(root)).unwrap(), r#"{"self":"[Circular]"}"#);

    let shared = Array::from(vec![Value::from(1)]);
    let data = Object::new();
    data.insert("x", Value::Array(shared.clone()));
    data.insert("y", Value::Array(shared));
    assert_eq!(
        to_string(&Value::Object(data)).unwrap(),
        r#"{"x":[1],"y":"[Circular]"}"#
    );
}

#[test]
fn test_dates_and_specials() {
    let when = chrono::DateTime::parse_from_rfc3339("2024-01-15T10:30:00Z")
        .unwrap()
        .with_timezone(&chrono::Utc);
    let data = Object::new();
    data.insert("when", Value::from(when));
    data.insert("inf", Value::from(f64::INFINITY));
    data.insert("nan", Value::Number(Number::NaN));
    data.insert("gone", Value::Undefined);
    data.insert("list", Value::from(vec![Value::Undefined]));

    assert_eq!(
        to_string(&Value::Object(data)).unwrap(),
        r#"{"inf":null,"list":[null],"nan":null,"when":"2024-01-15T10:30:00.000Z"}"#
    );
    assert_eq!(to_string(&Value::Undefined).unwrap(), "null");
}

#[test]
fn test_transform_replaces_nodes() {
    let data = value!({ "keep": 1, "drop": 2, "swap": "x" });
    let text = to_string_with(&data, &EncodeOptions::new(), |path: &Path, v: Value| {
        if key_is(path, "drop") {
            Ok(Value::Undefined)
        } else if key_is(path, "swap") {
            Ok(value!([1, 2]))
        } else {
            Ok(v)
        }
    })
    .unwrap();
    assert_eq!(text, r#"{"keep":1,"swap":[1,2]}"#);
}

#[test]
fn test_transform_keys_are_sorted() {
    let data = value!({ "b": 1 });
    let text = to_string_with(&data, &EncodeOptions::new(), |path: &Path, v: Value| {
        if path.is_root() {
            if let Value::Object(obj) = &v {
                obj.insert("a", Value::from(0));
            }
        }
        Ok(v)
    })
    .unwrap();
    assert_eq!(text, r#"{"a":0,"b":1}"#);
    assert_eq!(data.as_object().unwrap().keys(), vec!["b"]);
}

#[test]
fn test_transform_error_propagates() {
    let err = to_string_with(&value!([1, 2]), &EncodeOptions::new(), |path: &Path, v: Value| {
        if path.depth() == 1 {
            Err(Error::custom("no numbers"))
        } else {
            Ok(v)
        }
    })
    .unwrap_err();
    assert!(matches!(err, Error::Custom(msg) if msg == "no numbers"));
}

#[test]
fn test_parse_buffer_and_views() {
    assert_eq!(from_str(&to_string(&buffer(b"Hello")).unwrap()).unwrap(), buffer(b"Hello"));

    let view = Value::from(Binary::DataView(b"Hello".to_vec()));
    assert_eq!(from_str(&to_string(&view).unwrap()).unwrap(), view);

    let bytes = to_bytes(&buffer(b"Hello")).unwrap();
    assert_eq!(parse(&bytes).unwrap(), buffer(b"Hello"));
}

#[test]
fn test_parse_unknown_tag_passes_through() {
    let value = from_str(r#"{"data":[1,2],"type":"Int24Array"}"#).unwrap();
    let obj = value.as_object().unwrap();
    assert_eq!(obj.get("type"), Some(Value::from("Int24Array")));
    assert_eq!(obj.get("data").unwrap().as_array().unwrap().len(), 2);

    let text = r#"{"data":[1,2,3],"type":"Unknown"}"#;
    let value = from_str(text).unwrap();
    assert!(value.is_object());
    assert_eq!(to_string(&value).unwrap(), text);
}

#[test]
fn test_parse_coerces_elements() {
    let value = from_str(
        r#"{"data":[-1,256,1.7,"x",null,1e400],"type":"Uint8Array"}"#,
    )
    .unwrap();
    assert_eq!(value.as_binary(), Some(&Binary::Uint8Array(vec![255, 0, 1, 0, 0, 0])));

    let clamped = from_str(r#"{"data":[-5,300,1.5,2.5],"type":"Uint8ClampedArray"}"#).unwrap();
    assert_eq!(
        clamped.as_binary(),
        Some(&Binary::Uint8ClampedArray(vec![0, 255, 2, 2]))
    );
}

#[test]
fn test_reviver_runs_after_standard_reviver() {
    let text = r#"{"payload":{"data":[1,2,3],"type":"Buffer"},"note":"hi"}"#;
    let value = from_str_with(text, &DecodeOptions::new(), |path: &Path, v: Value| {
        if key_is(path, "payload") {
            let len = v.as_binary().map_or(0, Binary::len);
            return Ok(Value::from(len as u64));
        }
        Ok(v)
    })
    .unwrap();
    assert_eq!(value.as_object().unwrap().get("payload"), Some(Value::from(3u64)));
}

#[test]
fn test_reviver_undefined_deletes() {
    let value = from_str_with(r#"{"a":1,"b":2}"#, &DecodeOptions::new(), |path: &Path, v| {
        if key_is(path, "a") {
            Ok(Value::Undefined)
        } else {
            Ok(v)
        }
    })
    .unwrap();
    assert_eq!(to_string(&value).unwrap(), r#"{"b":2}"#);
}

#[test]
fn test_reviver_error_propagates() {
    let err = from_str_with("[1]", &DecodeOptions::new(), |_: &Path, _: Value| {
        Err(Error::custom("nope"))
    })
    .unwrap_err();
    assert!(matches!(err, Error::Custom(msg) if msg == "nope"));
}

#[test]
fn test_indent_above_maximum_is_clamped() {
    let data = value!([1]);
    let at_max = to_string_with(&data, &EncodeOptions::new().with_indent(10), |_: &Path, v: Value| {
        Ok(v)
    })
    .unwrap();
    let above = to_string_with(&data, &EncodeOptions::new().with_indent(11), |_: &Path, v: Value| {
        Ok(v)
    })
    .unwrap();
    assert_eq!(above, at_max);
    assert_eq!(above, "[\n          1\n]");
}

#[test]
fn test_simple_struct() {
    let user = User {
        id: 123,
        name: "Alice".to_string(),
        active: true,
        tags: vec!["admin".to_string(), "developer".to_string()],
    };

    let text = to_string(&to_value(&user).unwrap()).unwrap();
    let user_back: User = from_value(&from_str(&text).unwrap()).unwrap();
    assert_eq!(user, user_back);
}

#[test]
fn test_nested_struct() {
    let order = Order {
        order_id: 12345,
        customer: User {
            id: 123,
            name: "Alice".to_string(),
            active: true,
            tags: vec!["vip".to_string()],
        },
        items: vec![
            Product {
                sku: "WIDGET-001".to_string(),
                price: 29.99,
                quantity: 2,
            },
            Product {
                sku: "GADGET-002".to_string(),
                price: 49.99,
                quantity: 1,
            },
        ],
        total: 109.97,
    };

    let text = to_string(&to_value(&order).unwrap()).unwrap();
    assert!(text.starts_with(r#"{"customer":{"active":true,"id":123"#));
    let order_back: Order = from_value(&from_str(&text).unwrap()).unwrap();
    assert_eq!(order, order_back);
}

#[test]
fn test_non_string_map_keys_rejected() {
    let mut map = std::collections::BTreeMap::new();
    map.insert(vec![1u8], 1);
    assert!(matches!(to_value(&map), Err(Error::UnsupportedType(_))));
}
