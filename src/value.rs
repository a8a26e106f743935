//! Scalar and value representation.
//!
//! A [`ValueMap`] maps field names to a [`Value`], which is either a
//! [`Scalar`] payload or a nested [`ValueMap`]. Scalars are a tagged union so
//! equality and merging stay exhaustive; the pipelines only ever look at their
//! textual form.
//!
//! ## Creating Values
//!
//! ```rust
//! use serde_prose::{Scalar, Value};
//!
//! let text = Value::from("Plato");
//! let number = Value::from(42);
//! let flag = Value::from(true);
//!
//! assert!(text.is_scalar());
//! assert_eq!(number.as_scalar(), Some(&Scalar::Integer(42)));
//! assert_eq!(flag.to_string(), "true");
//! ```
//!
//! ## Extracting Values
//!
//! Extraction always yields [`Scalar::Text`]; the `TryFrom` conversions parse
//! the text form when the requested type differs.
//!
//! ```rust
//! use serde_prose::Value;
//! use std::convert::TryFrom;
//!
//! let extracted = Value::from("42");
//! assert_eq!(i64::try_from(extracted).unwrap(), 42);
//! ```

use crate::ValueMap;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use url::Url;

/// An opaque payload held at a leaf of a [`ValueMap`].
#[derive(Clone, Debug, PartialEq)]
pub enum Scalar {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Char(char),
    DateTime(DateTime<Utc>),
    Url(Url),
}

impl Scalar {
    /// Returns the text if this is a [`Scalar::Text`].
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Short description of the payload kind, used in error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Scalar::Text(_) => "text",
            Scalar::Integer(_) => "integer",
            Scalar::Float(_) => "float",
            Scalar::Bool(_) => "boolean",
            Scalar::Char(_) => "character",
            Scalar::DateTime(_) => "date-time",
            Scalar::Url(_) => "url",
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Text(s) => f.write_str(s),
            Scalar::Integer(i) => write!(f, "{}", i),
            Scalar::Float(fl) => write!(f, "{}", fl),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Char(c) => write!(f, "{}", c),
            Scalar::DateTime(dt) => f.write_str(&dt.to_rfc3339()),
            Scalar::Url(url) => f.write_str(url.as_str()),
        }
    }
}

/// Either a scalar payload or a nested scope.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Scalar(Scalar),
    Map(ValueMap),
}

impl Value {
    #[inline]
    #[must_use]
    pub const fn is_scalar(&self) -> bool {
        matches!(self, Value::Scalar(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_map(&self) -> bool {
        matches!(self, Value::Map(_))
    }

    #[inline]
    #[must_use]
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Value::Scalar(s) => Some(s),
            Value::Map(_) => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_map(&self) -> Option<&ValueMap> {
        match self {
            Value::Map(map) => Some(map),
            Value::Scalar(_) => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_map_mut(&mut self) -> Option<&mut ValueMap> {
        match self {
            Value::Map(map) => Some(map),
            Value::Scalar(_) => None,
        }
    }

    /// If the value is a text scalar, returns it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_prose::Value;
    ///
    /// assert_eq!(Value::from("hello").as_str(), Some("hello"));
    /// assert_eq!(Value::from(42).as_str(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        self.as_scalar().and_then(Scalar::as_str)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Scalar(s) => write!(f, "{}", s),
            Value::Map(map) => write!(f, "{}", map),
        }
    }
}

impl Serialize for Scalar {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Scalar::Text(s) => serializer.serialize_str(s),
            Scalar::Integer(i) => serializer.serialize_i64(*i),
            Scalar::Float(f) => serializer.serialize_f64(*f),
            Scalar::Bool(b) => serializer.serialize_bool(*b),
            Scalar::Char(c) => serializer.serialize_char(*c),
            Scalar::DateTime(dt) => serializer.serialize_str(&dt.to_rfc3339()),
            Scalar::Url(url) => serializer.serialize_str(url.as_str()),
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Scalar(s) => s.serialize(serializer),
            Value::Map(map) => map.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a scalar, a sequence or a map")
            }

            fn visit_bool<E>(self, value: bool) -> Result<Value, E> {
                Ok(Value::from(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Value, E> {
                Ok(Value::from(value))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Value, E> {
                if value <= i64::MAX as u64 {
                    Ok(Value::from(value as i64))
                } else {
                    Ok(Value::Scalar(Scalar::Text(value.to_string())))
                }
            }

            fn visit_f64<E>(self, value: f64) -> Result<Value, E> {
                Ok(Value::from(value))
            }

            fn visit_char<E>(self, value: char) -> Result<Value, E> {
                Ok(Value::from(value))
            }

            fn visit_str<E>(self, value: &str) -> Result<Value, E> {
                Ok(Value::from(value))
            }

            fn visit_string<E>(self, value: String) -> Result<Value, E> {
                Ok(Value::from(value))
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Deserialize::deserialize(deserializer)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut list = ValueMap::new();
                let mut index = 0usize;
                // Absent elements keep their position so ordinals line up.
                while let Some(elem) = seq.next_element::<Option<Value>>()? {
                    if let Some(value) = elem {
                        list.insert(index.to_string(), value);
                    }
                    index += 1;
                }
                Ok(Value::Map(list))
            }

            fn visit_map<A>(self, mut access: A) -> Result<Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut map = ValueMap::new();
                while let Some((key, value)) = access.next_entry::<String, Option<Value>>()? {
                    if let Some(value) = value {
                        map.insert(key, value);
                    }
                }
                Ok(Value::Map(map))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

// TryFrom implementations parse the textual form of any scalar
impl TryFrom<Value> for i64 {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Scalar(Scalar::Integer(i)) => Ok(i),
            Value::Scalar(s) => s
                .to_string()
                .trim()
                .parse()
                .map_err(|_| crate::Error::type_mismatch("integer", &format!("{} `{}`", s.kind(), s))),
            Value::Map(_) => Err(crate::Error::type_mismatch("integer", "map")),
        }
    }
}

impl TryFrom<Value> for f64 {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Scalar(Scalar::Float(f)) => Ok(f),
            Value::Scalar(Scalar::Integer(i)) => Ok(i as f64),
            Value::Scalar(s) => s
                .to_string()
                .trim()
                .parse()
                .map_err(|_| crate::Error::type_mismatch("float", &format!("{} `{}`", s.kind(), s))),
            Value::Map(_) => Err(crate::Error::type_mismatch("float", "map")),
        }
    }
}

impl TryFrom<Value> for bool {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Scalar(Scalar::Bool(b)) => Ok(b),
            Value::Scalar(s) => s
                .to_string()
                .trim()
                .parse()
                .map_err(|_| crate::Error::type_mismatch("boolean", &format!("{} `{}`", s.kind(), s))),
            Value::Map(_) => Err(crate::Error::type_mismatch("boolean", "map")),
        }
    }
}

impl TryFrom<Value> for String {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Scalar(Scalar::Text(s)) => Ok(s),
            Value::Scalar(s) => Ok(s.to_string()),
            Value::Map(_) => Err(crate::Error::type_mismatch("text", "map")),
        }
    }
}

// From implementations for creating values from primitives
macro_rules! impl_from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Scalar {
                fn from(value: $ty) -> Self {
                    Scalar::Integer(value as i64)
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for Scalar {
    fn from(value: f32) -> Self {
        Scalar::Float(value as f64)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

impl From<char> for Scalar {
    fn from(value: char) -> Self {
        Scalar::Char(value)
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Text(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<DateTime<Utc>> for Scalar {
    fn from(value: DateTime<Utc>) -> Self {
        Scalar::DateTime(value)
    }
}

impl From<Url> for Scalar {
    fn from(value: Url) -> Self {
        Scalar::Url(value)
    }
}

macro_rules! impl_value_from_scalar {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Scalar(value.into())
                }
            }
        )*
    };
}

impl_value_from_scalar!(
    i8, i16, i32, i64, u8, u16, u32, f32, f64, bool, char, String, &str, DateTime<Utc>, Url,
    Scalar
);

impl From<ValueMap> for Value {
    fn from(value: ValueMap) -> Self {
        Value::Map(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::convert::TryFrom;

    #[test]
    fn test_tryfrom_parses_text() {
        assert_eq!(i64::try_from(Value::from(" 42 ")).unwrap(), 42);
        assert_eq!(f64::try_from(Value::from("3.5")).unwrap(), 3.5);
        assert!(bool::try_from(Value::from("true")).unwrap());
        assert!(i64::try_from(Value::from("forty")).is_err());
        assert!(i64::try_from(Value::Map(ValueMap::new())).is_err());
    }

    #[test]
    fn test_tryfrom_native_payloads() {
        assert_eq!(i64::try_from(Value::from(7u8)).unwrap(), 7);
        assert_eq!(f64::try_from(Value::from(2)).unwrap(), 2.0);
        assert_eq!(String::try_from(Value::from(1.5)).unwrap(), "1.5");
    }

    #[test]
    fn test_display_uses_natural_form() {
        let dt = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        assert_eq!(Scalar::from(dt).to_string(), "2024-01-15T10:30:00+00:00");

        let url = Url::parse("https://example.com/a?b=c").unwrap();
        assert_eq!(Scalar::from(url).to_string(), "https://example.com/a?b=c");

        assert_eq!(Scalar::from('x').to_string(), "x");
        assert_eq!(Scalar::from(-3i32).to_string(), "-3");
    }

    #[test]
    fn test_scalar_kinds_are_distinct() {
        assert_ne!(Scalar::from("1"), Scalar::from(1));
        assert_eq!(Scalar::from(1).kind(), "integer");
    }
}
