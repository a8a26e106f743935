//! Serde deserialization out of a [`ValueMap`].
//!
//! Extraction yields text only, so every typed request coerces the scalar's
//! textual form: `"42"` satisfies an `u8`, `"true"` a `bool`, and
//! `"2024-01-15T10:30:00Z"` a `chrono::DateTime<Utc>`. A failed coercion is an
//! [`Error::TypeMismatch`].
//!
//! Ordinal-keyed maps stand in for sequences; keys the target type does not
//! know are skipped and missing `Option` fields become `None`.
//!
//! ## Examples
//!
//! ```rust
//! use serde::Deserialize;
//! use serde_prose::{from_value_map, ValueMap};
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Entry {
//!     title: String,
//!     year: u16,
//!     note: Option<String>,
//! }
//!
//! let mut map = ValueMap::new();
//! map.put("title", "Meno");
//! map.put("year", "380");
//! map.put("ignored", "x");
//!
//! let entry: Entry = from_value_map(map).unwrap();
//! assert_eq!(entry, Entry { title: "Meno".to_string(), year: 380, note: None });
//! ```

use crate::map::is_ordinal;
use crate::{Error, Result, Scalar, Value, ValueMap};
use serde::de::{self, DeserializeOwned, IntoDeserializer};
use serde::forward_to_deserialize_any;
use std::str::FromStr;

/// Deserializes an instance of `T` from a [`ValueMap`].
///
/// # Errors
///
/// Returns [`Error::TypeMismatch`] when a value cannot be coerced into the
/// requested type, and [`Error::Custom`] for errors raised by `T` itself
/// (e.g. a missing required field).
pub fn from_value_map<T>(map: ValueMap) -> Result<T>
where
    T: DeserializeOwned,
{
    T::deserialize(ValueDeserializer::new(Value::Map(map)))
}

/// Deserializes an instance of `T` from a single [`Value`].
pub fn from_value<T>(value: Value) -> Result<T>
where
    T: DeserializeOwned,
{
    T::deserialize(ValueDeserializer::new(value))
}

/// Whether a map is shaped like a list: non-empty with only ordinal keys.
fn is_list(map: &ValueMap) -> bool {
    !map.is_empty() && map.keys().all(|k| is_ordinal(k))
}

/// List entries in numeric order.
fn list_values(mut map: ValueMap) -> Vec<Value> {
    map.ordinals("")
        .iter()
        .filter_map(|key| map.remove(key))
        .collect()
}

/// Deserializer over an owned [`Value`].
pub struct ValueDeserializer {
    value: Value,
}

impl ValueDeserializer {
    #[must_use]
    pub fn new(value: Value) -> Self {
        ValueDeserializer { value }
    }

    /// Parses the scalar's trimmed textual form.
    fn parse<T: FromStr>(self, expected: &str) -> Result<T> {
        match self.value {
            Value::Scalar(scalar) => {
                let text = scalar.to_string();
                text.trim()
                    .parse()
                    .map_err(|_| Error::type_mismatch(expected, &format!("`{}`", text)))
            }
            Value::Map(_) => Err(Error::type_mismatch(expected, "map")),
        }
    }

    fn into_map(self, expected: &str) -> Result<ValueMap> {
        match self.value {
            Value::Map(map) => Ok(map),
            Value::Scalar(scalar) => Err(Error::type_mismatch(expected, scalar.kind())),
        }
    }
}

macro_rules! deserialize_parsed {
    ($($method:ident => $visit:ident($ty:ty)),* $(,)?) => {
        $(
            fn $method<V>(self, visitor: V) -> Result<V::Value>
            where
                V: de::Visitor<'de>,
            {
                visitor.$visit(self.parse::<$ty>(stringify!($ty))?)
            }
        )*
    };
}

impl<'de> de::Deserializer<'de> for ValueDeserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Scalar(Scalar::Text(s)) => visitor.visit_string(s),
            Value::Scalar(Scalar::Integer(i)) => visitor.visit_i64(i),
            Value::Scalar(Scalar::Float(f)) => visitor.visit_f64(f),
            Value::Scalar(Scalar::Bool(b)) => visitor.visit_bool(b),
            Value::Scalar(Scalar::Char(c)) => visitor.visit_char(c),
            Value::Scalar(scalar) => visitor.visit_string(scalar.to_string()),
            Value::Map(map) if is_list(&map) => {
                visitor.visit_seq(SeqDeserializer::new(list_values(map)))
            }
            Value::Map(map) => visitor.visit_map(MapDeserializer::new(map)),
        }
    }

    deserialize_parsed! {
        deserialize_bool => visit_bool(bool),
        deserialize_i8 => visit_i8(i8),
        deserialize_i16 => visit_i16(i16),
        deserialize_i32 => visit_i32(i32),
        deserialize_i64 => visit_i64(i64),
        deserialize_i128 => visit_i128(i128),
        deserialize_u8 => visit_u8(u8),
        deserialize_u16 => visit_u16(u16),
        deserialize_u32 => visit_u32(u32),
        deserialize_u64 => visit_u64(u64),
        deserialize_u128 => visit_u128(u128),
        deserialize_f32 => visit_f32(f32),
        deserialize_f64 => visit_f64(f64),
    }

    fn deserialize_char<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Scalar(Scalar::Char(c)) => visitor.visit_char(c),
            Value::Scalar(scalar) => {
                let text = scalar.to_string();
                let mut chars = text.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => visitor.visit_char(c),
                    _ => Err(Error::type_mismatch("char", &format!("`{}`", text))),
                }
            }
            Value::Map(_) => Err(Error::type_mismatch("char", "map")),
        }
    }

    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_string(visitor)
    }

    fn deserialize_string<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Scalar(Scalar::Text(s)) => visitor.visit_string(s),
            Value::Scalar(scalar) => visitor.visit_string(scalar.to_string()),
            Value::Map(_) => Err(Error::type_mismatch("string", "map")),
        }
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_some(self)
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_unit()
    }

    fn deserialize_unit_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_unit()
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let map = self.into_map("sequence")?;
        visitor.visit_seq(SeqDeserializer::new(list_values(map)))
    }

    fn deserialize_tuple<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let map = self.into_map("map")?;
        visitor.visit_map(MapDeserializer::new(map))
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_map(visitor)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Scalar(scalar) => visitor.visit_enum(EnumDeserializer {
                variant: scalar.to_string(),
                value: None,
            }),
            Value::Map(map) if map.len() == 1 => {
                let Some((variant, value)) = map.into_iter().next() else {
                    return Err(Error::type_mismatch("enum", "empty map"));
                };
                visitor.visit_enum(EnumDeserializer {
                    variant,
                    value: Some(value),
                })
            }
            Value::Map(_) => Err(Error::type_mismatch("enum", "map with several keys")),
        }
    }

    forward_to_deserialize_any! {
        bytes byte_buf identifier ignored_any
    }
}

struct SeqDeserializer {
    iter: std::vec::IntoIter<Value>,
}

impl SeqDeserializer {
    fn new(vec: Vec<Value>) -> Self {
        SeqDeserializer {
            iter: vec.into_iter(),
        }
    }
}

impl<'de> de::SeqAccess<'de> for SeqDeserializer {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)).map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

struct MapDeserializer {
    iter: indexmap::map::IntoIter<String, Value>,
    value: Option<Value>,
}

impl MapDeserializer {
    fn new(map: ValueMap) -> Self {
        MapDeserializer {
            iter: map.into_iter(),
            value: None,
        }
    }
}

impl<'de> de::MapAccess<'de> for MapDeserializer {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some((key, value)) => {
                self.value = Some(value);
                seed.deserialize(ValueDeserializer::new(Value::from(key)))
                    .map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        match self.value.take() {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)),
            None => Err(Error::custom("next_value_seed called before next_key_seed")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

struct EnumDeserializer {
    variant: String,
    value: Option<Value>,
}

impl<'de> de::EnumAccess<'de> for EnumDeserializer {
    type Error = Error;
    type Variant = VariantDeserializer;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant)>
    where
        V: de::DeserializeSeed<'de>,
    {
        let name: de::value::StringDeserializer<Error> = self.variant.into_deserializer();
        let variant = seed.deserialize(name)?;
        Ok((variant, VariantDeserializer { value: self.value }))
    }
}

struct VariantDeserializer {
    value: Option<Value>,
}

impl<'de> de::VariantAccess<'de> for VariantDeserializer {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        match self.value {
            None => Ok(()),
            Some(_) => Err(Error::type_mismatch("unit variant", "variant with a value")),
        }
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.value {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)),
            None => Err(Error::type_mismatch("newtype variant", "unit variant")),
        }
    }

    fn tuple_variant<V>(self, _len: usize, _visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(Error::unsupported_type("tuple variants"))
    }

    fn struct_variant<V>(self, _fields: &'static [&'static str], _visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(Error::unsupported_type("struct variants"))
    }
}
