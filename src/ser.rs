//! Serde serialization into a [`ValueMap`].
//!
//! Host data reaches the pipelines through [`to_value_map`]:
//!
//! - structs and maps become nested [`ValueMap`]s,
//! - sequences, tuples and byte strings become ordinal-keyed maps
//!   (`tags.0`, `tags.1`, ...),
//! - `None` and unit values are omitted,
//! - unit variants become text, newtype variants become a single-key map.
//!
//! ## Examples
//!
//! ```rust
//! use serde::Serialize;
//! use serde_prose::to_value_map;
//!
//! #[derive(Serialize)]
//! struct Book {
//!     title: String,
//!     tags: Vec<String>,
//!     subtitle: Option<String>,
//! }
//!
//! let book = Book {
//!     title: "Republic".to_string(),
//!     tags: vec!["politics".to_string(), "justice".to_string()],
//!     subtitle: None,
//! };
//! let map = to_value_map(&book).unwrap();
//! assert_eq!(map.to_string(), "(tags=(0=politics,1=justice),title=Republic)");
//! ```

use crate::{Error, Result, Scalar, Value, ValueMap};
use serde::ser::{self, Serialize};

/// Serializes `value` into a [`ValueMap`].
///
/// # Errors
///
/// Returns [`Error::UnsupportedType`] if the top-level value is not a struct
/// or map, or contains a tuple or struct enum variant.
pub fn to_value_map<T>(value: &T) -> Result<ValueMap>
where
    T: ?Sized + Serialize,
{
    match to_value(value)? {
        Some(Value::Map(map)) => Ok(map),
        Some(Value::Scalar(scalar)) => Err(Error::unsupported_type(&format!(
            "top-level {} (expected a struct or map)",
            scalar.kind()
        ))),
        None => Err(Error::unsupported_type("top-level unit (expected a struct or map)")),
    }
}

/// Serializes `value` into a [`Value`]; `None` for values that are omitted.
pub fn to_value<T>(value: &T) -> Result<Option<Value>>
where
    T: ?Sized + Serialize,
{
    value.serialize(ValueSerializer)
}

fn scalar(scalar: impl Into<Scalar>) -> Result<Option<Value>> {
    Ok(Some(Value::Scalar(scalar.into())))
}

/// Serializer producing an optional [`Value`].
pub struct ValueSerializer;

/// Collects sequence elements under consecutive ordinals.
pub struct SerializeList {
    list: ValueMap,
    index: usize,
}

pub struct SerializeMap {
    map: ValueMap,
    current_key: Option<String>,
}

impl ser::Serializer for ValueSerializer {
    type Ok = Option<Value>;
    type Error = Error;

    type SerializeSeq = SerializeList;
    type SerializeTuple = SerializeList;
    type SerializeTupleStruct = SerializeList;
    type SerializeTupleVariant = ser::Impossible<Option<Value>, Error>;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeMap;
    type SerializeStructVariant = ser::Impossible<Option<Value>, Error>;

    fn serialize_bool(self, v: bool) -> Result<Option<Value>> {
        scalar(v)
    }

    fn serialize_i8(self, v: i8) -> Result<Option<Value>> {
        scalar(v)
    }

    fn serialize_i16(self, v: i16) -> Result<Option<Value>> {
        scalar(v)
    }

    fn serialize_i32(self, v: i32) -> Result<Option<Value>> {
        scalar(v)
    }

    fn serialize_i64(self, v: i64) -> Result<Option<Value>> {
        scalar(v)
    }

    fn serialize_u8(self, v: u8) -> Result<Option<Value>> {
        scalar(v)
    }

    fn serialize_u16(self, v: u16) -> Result<Option<Value>> {
        scalar(v)
    }

    fn serialize_u32(self, v: u32) -> Result<Option<Value>> {
        scalar(v)
    }

    fn serialize_u64(self, v: u64) -> Result<Option<Value>> {
        match i64::try_from(v) {
            Ok(i) => scalar(i),
            Err(_) => scalar(v.to_string()),
        }
    }

    fn serialize_f32(self, v: f32) -> Result<Option<Value>> {
        scalar(v)
    }

    fn serialize_f64(self, v: f64) -> Result<Option<Value>> {
        scalar(v)
    }

    fn serialize_char(self, v: char) -> Result<Option<Value>> {
        scalar(v)
    }

    fn serialize_str(self, v: &str) -> Result<Option<Value>> {
        scalar(v)
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Option<Value>> {
        let mut list = ValueMap::with_capacity(v.len());
        for &b in v {
            list.push(b);
        }
        Ok(Some(Value::Map(list)))
    }

    fn serialize_none(self) -> Result<Option<Value>> {
        Ok(None)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Option<Value>>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Option<Value>> {
        Ok(None)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Option<Value>> {
        Ok(None)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Option<Value>> {
        scalar(variant)
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Option<Value>>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Option<Value>>
    where
        T: ?Sized + Serialize,
    {
        match to_value(value)? {
            Some(inner) => {
                let mut map = ValueMap::with_capacity(1);
                map.insert(variant, inner);
                Ok(Some(Value::Map(map)))
            }
            None => scalar(variant),
        }
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeList> {
        Ok(SerializeList::new(len.unwrap_or_default()))
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeList> {
        Ok(SerializeList::new(len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SerializeList> {
        Ok(SerializeList::new(len))
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(Error::unsupported_type(&format!(
            "tuple variant {}::{}",
            name, variant
        )))
    }

    fn serialize_map(self, len: Option<usize>) -> Result<SerializeMap> {
        Ok(SerializeMap::new(len.unwrap_or_default()))
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<SerializeMap> {
        Ok(SerializeMap::new(len))
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(Error::unsupported_type(&format!(
            "struct variant {}::{}",
            name, variant
        )))
    }
}

impl SerializeList {
    fn new(len: usize) -> Self {
        SerializeList {
            list: ValueMap::with_capacity(len),
            index: 0,
        }
    }

    fn push<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        // Omitted elements still take their position.
        if let Some(value) = to_value(value)? {
            self.list.insert(self.index.to_string(), value);
        }
        self.index += 1;
        Ok(())
    }

    fn finish(self) -> Result<Option<Value>> {
        Ok(Some(Value::Map(self.list)))
    }
}

impl SerializeMap {
    fn new(len: usize) -> Self {
        SerializeMap {
            map: ValueMap::with_capacity(len),
            current_key: None,
        }
    }
}

impl ser::SerializeSeq for SerializeList {
    type Ok = Option<Value>;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Option<Value>> {
        self.finish()
    }
}

impl ser::SerializeTuple for SerializeList {
    type Ok = Option<Value>;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Option<Value>> {
        self.finish()
    }
}

impl ser::SerializeTupleStruct for SerializeList {
    type Ok = Option<Value>;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Option<Value>> {
        self.finish()
    }
}

impl ser::SerializeMap for SerializeMap {
    type Ok = Option<Value>;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        match to_value(key)? {
            Some(Value::Scalar(key)) => {
                self.current_key = Some(key.to_string());
                Ok(())
            }
            _ => Err(Error::unsupported_type("map keys must be scalars")),
        }
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .current_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called without serialize_key"))?;
        if let Some(value) = to_value(value)? {
            self.map.insert(key, value);
        }
        Ok(())
    }

    fn end(self) -> Result<Option<Value>> {
        Ok(Some(Value::Map(self.map)))
    }
}

impl ser::SerializeStruct for SerializeMap {
    type Ok = Option<Value>;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        if let Some(value) = to_value(value)? {
            self.map.insert(key, value);
        }
        Ok(())
    }

    fn end(self) -> Result<Option<Value>> {
        Ok(Some(Value::Map(self.map)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde::Serialize;
    use std::collections::BTreeMap;
    use url::Url;

    #[derive(Serialize)]
    enum Shape {
        Point,
        Circle(f64),
        Rect { w: u32, h: u32 },
    }

    #[derive(Serialize)]
    struct Citation {
        title: String,
        year: u16,
        url: Url,
        published: chrono::DateTime<Utc>,
    }

    #[test]
    fn test_nested_struct_and_typed_scalars() {
        let citation = Citation {
            title: "Meno".to_string(),
            year: 380,
            url: Url::parse("https://example.org/meno").unwrap(),
            published: Utc.with_ymd_and_hms(2020, 5, 1, 0, 0, 0).unwrap(),
        };
        let map = to_value_map(&citation).unwrap();
        assert_eq!(map.get_value("year"), Some(&Scalar::Integer(380)));
        assert_eq!(
            map.get_value("url").map(ToString::to_string).as_deref(),
            Some("https://example.org/meno")
        );
        assert_eq!(
            map.get_value("published").map(ToString::to_string).as_deref(),
            Some("2020-05-01T00:00:00Z")
        );
    }

    #[test]
    fn test_sequences_keep_positions() {
        let mut outer = BTreeMap::new();
        outer.insert("list", vec![Some(1), None, Some(3)]);
        let map = to_value_map(&outer).unwrap();
        assert_eq!(map.ordinals("list"), vec!["0", "2"]);
    }

    #[test]
    fn test_enum_variants() {
        let mut outer = BTreeMap::new();
        outer.insert("a", Shape::Point);
        outer.insert("b", Shape::Circle(1.5));
        let map = to_value_map(&outer).unwrap();
        assert_eq!(map.to_string(), "(a=Point,b=(Circle=1.5))");

        let mut bad = BTreeMap::new();
        bad.insert("c", Shape::Rect { w: 1, h: 2 });
        assert!(matches!(to_value_map(&bad), Err(Error::UnsupportedType(_))));
    }

    #[test]
    fn test_top_level_must_be_a_map() {
        assert!(matches!(to_value_map(&42), Err(Error::UnsupportedType(_))));
        assert!(matches!(to_value_map(&()), Err(Error::UnsupportedType(_))));
    }

    #[test]
    fn test_large_u64_falls_back_to_text() {
        let mut outer = BTreeMap::new();
        outer.insert("big", u64::MAX);
        let map = to_value_map(&outer).unwrap();
        assert_eq!(
            map.get_value("big"),
            Some(&Scalar::Text(u64::MAX.to_string()))
        );
    }
}
