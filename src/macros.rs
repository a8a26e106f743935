/// Builds a [`ValueMap`](crate::ValueMap) from a JSON-like literal.
///
/// Objects become nested maps and arrays become ordinal-keyed lists. Any other
/// single token tree becomes a scalar via `Value::from`; wrap longer
/// expressions in parentheses.
///
/// # Examples
///
/// ```rust
/// use serde_prose::value_map;
///
/// let count = 2;
/// let map = value_map!({
///     "author": "Plato",
///     "refs": [
///         { "title": "Republic" },
///         { "title": "Meno" }
///     ],
///     "count": (count + 1)
/// });
///
/// assert_eq!(map.ordinals("refs"), vec!["0", "1"]);
/// assert_eq!(map.get_value("refs.1.title").unwrap().to_string(), "Meno");
/// assert_eq!(map.get_value("count").unwrap().to_string(), "3");
/// ```
#[macro_export]
macro_rules! value_map {
    (@value { $($inner:tt)* }) => {
        $crate::Value::Map($crate::value_map!({ $($inner)* }))
    };

    (@value [ $($elem:tt),* $(,)? ]) => {{
        let mut list = $crate::ValueMap::new();
        $(
            list.push($crate::value_map!(@value $elem));
        )*
        $crate::Value::Map(list)
    }};

    (@value $scalar:expr) => {
        $crate::Value::from($scalar)
    };

    ({}) => {
        $crate::ValueMap::new()
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut map = $crate::ValueMap::new();
        $(
            map.insert($key, $crate::value_map!(@value $value));
        )*
        map
    }};
}

#[cfg(test)]
mod tests {
    use crate::{Scalar, Value, ValueMap};

    #[test]
    fn test_value_map_scalars() {
        let map = value_map!({
            "text": "hello",
            "int": 42,
            "float": 3.5,
            "flag": true,
            "letter": 'x'
        });
        assert_eq!(map.get("text"), Some(&Value::from("hello")));
        assert_eq!(map.get_value("int"), Some(&Scalar::Integer(42)));
        assert_eq!(map.get_value("float"), Some(&Scalar::Float(3.5)));
        assert_eq!(map.get_value("flag"), Some(&Scalar::Bool(true)));
        assert_eq!(map.get_value("letter"), Some(&Scalar::Char('x')));
    }

    #[test]
    fn test_value_map_nesting() {
        assert_eq!(value_map!({}), ValueMap::new());

        let map = value_map!({
            "outer": { "inner": { "leaf": 1 } },
            "empty": []
        });
        assert_eq!(map.get_value("outer.inner.leaf"), Some(&Scalar::Integer(1)));
        assert_eq!(map.get_value_map("empty"), Some(&ValueMap::new()));
    }
}
