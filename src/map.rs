//! The recursive value tree.
//!
//! [`ValueMap`] wraps an [`IndexMap`] from field names to [`Value`]s. Names
//! passed to the path-taking methods are dotted: `refs.0.title` addresses the
//! `title` key of the `0` scope of the `refs` scope.
//!
//! Lists are ordinary maps whose keys are base-10 ordinals (`"0"`, `"1"`, ...).
//! [`ValueMap::add`] appends after the largest ordinal present, so removing an
//! entry never renumbers the others.
//!
//! ## Examples
//!
//! ```rust
//! use serde_prose::ValueMap;
//!
//! let mut map = ValueMap::new();
//! map.put("author.name", "Plato");
//! map.add_value("tags", "philosophy");
//! map.add_value("tags", "dialogue");
//!
//! assert_eq!(map.get_value("author.name").map(|s| s.to_string()), Some("Plato".to_string()));
//! assert_eq!(map.ordinals("tags"), vec!["0", "1"]);
//! assert_eq!(map.to_string(), "(author=(name=Plato),tags=(0=philosophy,1=dialogue))");
//! ```

use crate::{Scalar, Value};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;

/// A map of field names to values, addressable by dotted path.
///
/// Equality ignores insertion order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValueMap(IndexMap<String, Value>);

/// Returns `true` if `key` is a list ordinal, i.e. non-empty ASCII digits.
#[must_use]
pub fn is_ordinal(key: &str) -> bool {
    !key.is_empty() && key.bytes().all(|b| b.is_ascii_digit())
}

/// Numeric order on ordinal keys of any length.
fn ordinal_cmp(a: &str, b: &str) -> Ordering {
    let (ta, tb) = (a.trim_start_matches('0'), b.trim_start_matches('0'));
    ta.len()
        .cmp(&tb.len())
        .then_with(|| ta.cmp(tb))
        .then_with(|| a.len().cmp(&b.len()))
}

/// Named keys lexically first, then ordinals numerically.
fn display_cmp(a: &str, b: &str) -> Ordering {
    match (is_ordinal(a), is_ordinal(b)) {
        (true, true) => ordinal_cmp(a, b),
        (false, false) => a.cmp(b),
        (false, true) => Ordering::Less,
        (true, false) => Ordering::Greater,
    }
}

impl ValueMap {
    #[must_use]
    pub fn new() -> Self {
        ValueMap(IndexMap::new())
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        ValueMap(IndexMap::with_capacity(capacity))
    }

    /// Inserts directly under `key`, without path splitting.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// The value directly under `key`, without path splitting.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Stores a value at a dotted path, creating intermediate scopes.
    ///
    /// A scalar found where an intermediate scope belongs is replaced by a map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_prose::ValueMap;
    ///
    /// let mut map = ValueMap::new();
    /// map.put("a", "scalar");
    /// map.put("a.b.c", 1);
    /// assert!(map.get_value_map("a.b").is_some());
    /// assert!(map.get_value("a").is_none());
    /// ```
    pub fn put(&mut self, path: &str, value: impl Into<Value>) {
        let (parent, key) = split_last(path);
        self.scope_mut(parent).0.insert(key.to_string(), value.into());
    }

    /// Stores a sub-map at a dotted path.
    pub fn put_map(&mut self, path: &str, map: ValueMap) {
        self.put(path, Value::Map(map));
    }

    /// Appends a list entry under `path` and returns its ordinal.
    pub fn add(&mut self, path: &str, map: ValueMap) -> String {
        self.scope_mut(path).push(Value::Map(map))
    }

    /// Appends a scalar list entry under `path` and returns its ordinal.
    pub fn add_value(&mut self, path: &str, value: impl Into<Scalar>) -> String {
        self.scope_mut(path).push(Value::Scalar(value.into()))
    }

    /// Appends `value` to this map under the next free ordinal.
    pub fn push(&mut self, value: impl Into<Value>) -> String {
        let next = self
            .0
            .keys()
            .filter(|k| is_ordinal(k))
            .filter_map(|k| k.parse::<usize>().ok())
            .max()
            .map_or(0, |max| max + 1);
        let key = next.to_string();
        self.0.insert(key.clone(), value.into());
        key
    }

    /// The value at a dotted path.
    #[must_use]
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut value = self.0.get(segments.next()?)?;
        for segment in segments {
            value = value.as_map()?.0.get(segment)?;
        }
        Some(value)
    }

    /// The scalar at a dotted path; `None` if the key holds a map or is missing.
    #[must_use]
    pub fn get_value(&self, path: &str) -> Option<&Scalar> {
        self.lookup(path)?.as_scalar()
    }

    /// The map at a dotted path; `None` if the key holds a scalar or is missing.
    ///
    /// The empty path addresses this map.
    #[must_use]
    pub fn get_value_map(&self, path: &str) -> Option<&ValueMap> {
        if path.is_empty() {
            return Some(self);
        }
        self.lookup(path)?.as_map()
    }

    pub fn get_value_map_mut(&mut self, path: &str) -> Option<&mut ValueMap> {
        if path.is_empty() {
            return Some(self);
        }
        let mut segments = path.split('.');
        let mut map = self.0.get_mut(segments.next()?)?.as_map_mut()?;
        for segment in segments {
            map = map.0.get_mut(segment)?.as_map_mut()?;
        }
        Some(map)
    }

    /// Ordinal keys under `path`, in numeric order, whatever their values.
    #[must_use]
    pub fn ordinals(&self, path: &str) -> Vec<String> {
        let Some(scope) = self.get_value_map(path) else {
            return Vec::new();
        };
        let mut keys: Vec<String> = scope.0.keys().filter(|k| is_ordinal(k)).cloned().collect();
        keys.sort_by(|a, b| ordinal_cmp(a, b));
        keys
    }

    /// The ordinal-keyed sub-maps under `path`, in numeric order.
    #[must_use]
    pub fn value_maps_at(&self, path: &str) -> Vec<&ValueMap> {
        let Some(scope) = self.get_value_map(path) else {
            return Vec::new();
        };
        self.ordinals(path)
            .iter()
            .filter_map(|key| scope.0.get(key)?.as_map())
            .collect()
    }

    /// All sub-map children of this map, in iteration order.
    #[must_use]
    pub fn value_maps(&self) -> Vec<&ValueMap> {
        self.0.values().filter_map(Value::as_map).collect()
    }

    #[must_use]
    pub fn field_names(&self) -> Vec<&str> {
        self.0.keys().map(String::as_str).collect()
    }

    /// Removes the entry at a dotted path, keeping the order of its siblings.
    pub fn remove(&mut self, path: &str) -> Option<Value> {
        let (parent, key) = split_last(path);
        self.get_value_map_mut(parent)?.0.shift_remove(key)
    }

    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.lookup(path).is_some()
    }

    /// Merges `other` into this map.
    ///
    /// Maps present on both sides merge recursively; any other collision is
    /// won by `other`. Keys only this map holds are kept.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_prose::ValueMap;
    ///
    /// let mut a = ValueMap::new();
    /// a.put("name", "A");
    /// a.put("other", "X");
    /// let mut b = ValueMap::new();
    /// b.put("name", "B");
    ///
    /// a.merge(b);
    /// assert_eq!(a.to_string(), "(name=B,other=X)");
    /// ```
    pub fn merge(&mut self, other: ValueMap) {
        for (key, value) in other.0 {
            if let Value::Map(incoming) = value {
                if let Some(Value::Map(existing)) = self.0.get_mut(&key) {
                    existing.merge(incoming);
                    continue;
                }
                self.0.insert(key, Value::Map(incoming));
            } else {
                self.0.insert(key, value);
            }
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> indexmap::map::Keys<'_, String, Value> {
        self.0.keys()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.0.iter()
    }

    /// The scope at `path`, created or converted to a map as needed.
    fn scope_mut(&mut self, path: &str) -> &mut ValueMap {
        if path.is_empty() {
            return self;
        }
        let (head, rest) = path.split_once('.').unwrap_or((path, ""));
        let slot = self
            .0
            .entry(head.to_string())
            .or_insert_with(|| Value::Map(ValueMap::new()));
        if slot.is_scalar() {
            *slot = Value::Map(ValueMap::new());
        }
        match slot {
            Value::Map(map) => map.scope_mut(rest),
            Value::Scalar(_) => unreachable!("scope slot holds a map"),
        }
    }
}

/// Splits `a.b.c` into `("a.b", "c")`; a plain key has an empty parent.
fn split_last(path: &str) -> (&str, &str) {
    path.rsplit_once('.').unwrap_or(("", path))
}

impl fmt::Display for ValueMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut entries: Vec<_> = self.0.iter().collect();
        entries.sort_by(|(a, _), (b, _)| display_cmp(a, b));
        f.write_str("(")?;
        for (i, (key, value)) in entries.into_iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}={}", key, value)?;
        }
        f.write_str(")")
    }
}

impl IntoIterator for ValueMap {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValueMap {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(String, Value)> for ValueMap {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        ValueMap(IndexMap::from_iter(iter))
    }
}

impl Serialize for ValueMap {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(self.0.iter())
    }
}

impl<'de> Deserialize<'de> for ValueMap {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{Error, Unexpected};

        match Value::deserialize(deserializer)? {
            Value::Map(map) => Ok(map),
            Value::Scalar(scalar) => Err(D::Error::invalid_type(
                Unexpected::Other(scalar.kind()),
                &"a map",
            )),
        }
    }
}
