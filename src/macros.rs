/// Builds a [`Value`](crate::Value) tree from a literal.
///
/// Every array and object the macro builds is a fresh node. Any other
/// expression is converted with `Value::from`, so existing nodes (and
/// therefore shared references) can be spliced in by wrapping them in
/// parentheses.
///
/// ```rust
/// use json2::{to_string, value, Value};
///
/// let shared = value!({ "x": 1 });
/// let data = value!({ "b": [1, "two", null], "a": (shared.clone()) });
/// assert_eq!(to_string(&data).unwrap(), r#"{"a":{"x":1},"b":[1,"two",null]}"#);
/// ```
#[macro_export]
macro_rules! value {
    (null) => {
        $crate::Value::Null
    };

    (true) => {
        $crate::Value::Bool(true)
    };

    (false) => {
        $crate::Value::Bool(false)
    };

    ([]) => {
        $crate::Value::Array($crate::Array::new())
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::Array($crate::Array::from(vec![$($crate::value!($elem)),*]))
    };

    ({}) => {
        $crate::Value::Object($crate::Object::new())
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let object = $crate::Object::new();
        $(
            object.insert($key, $crate::value!($value));
        )*
        $crate::Value::Object(object)
    }};

    ($other:expr) => {
        $crate::Value::from($other)
    };
}
