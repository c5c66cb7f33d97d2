//! Flat attribute mapping.
//!
//! `FlatMap` is an insertion-ordered mapping whose string-keyed entries
//! double as attributes. Reading an attribute that was never set is an
//! error: nothing is ever created on read. It is also the storage each
//! hierarchical node keeps its entries in.

use indexmap::IndexMap;
use serde_json::Value;

use super::key::Key;
use crate::error::CacheError;


/// Mapping from [`Key`] to `V`, addressable as attributes by name.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatMap<V = Value> {
    entries: IndexMap<Key, V>,
}

impl<V> FlatMap<V> {
    /// Create an empty map.
    pub fn new() -> Self {
        FlatMap { entries: IndexMap::new() }
    }

    /// Attribute read. Fails with [`CacheError::MissingAttribute`] if unset.
    pub fn get(&self, key: &str) -> Result<&V, CacheError> {
        self.try_get(key).ok_or_else(|| CacheError::MissingAttribute {
            key: key.to_owned(),
        })
    }

    /// Attribute read that returns `None` instead of failing.
    pub fn try_get(&self, key: &str) -> Option<&V> {
        self.entries.get(&Key::from(key))
    }

    /// Mapping-style read by any key.
    pub fn get_key(&self, key: &Key) -> Result<&V, CacheError> {
        self.try_get_key(key).ok_or_else(|| CacheError::MissingAttribute {
            key: key.to_string(),
        })
    }

    pub fn try_get_key(&self, key: &Key) -> Option<&V> {
        self.entries.get(key)
    }

    /// Attribute write. Returns the previous value, if any.
    ///
    /// Overwriting keeps the entry's original position.
    pub fn set(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        self.entries.insert(Key::Name(key.into()), value)
    }

    /// Mapping-style write by any key.
    pub fn set_key(&mut self, key: Key, value: V) -> Option<V> {
        self.entries.insert(key, value)
    }

    pub fn contains_key(&self, key: impl Into<Key>) -> bool {
        self.entries.contains_key(&key.into())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &Key> + '_ {
        self.entries.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.entries.values()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Key, &V)> + '_ {
        self.entries.iter()
    }
}

impl<V> Default for FlatMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Keyword-style construction: `FlatMap::from_iter([("title", json!("Home"))])`.
impl<K: Into<Key>, V> FromIterator<(K, V)> for FlatMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        FlatMap {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl<'a, V> IntoIterator for &'a FlatMap<V> {
    type Item = (&'a Key, &'a V);
    type IntoIter = indexmap::map::Iter<'a, Key, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn set_then_get() {
        let mut cache = FlatMap::new();
        cache.set("whatever", json!("whatever"));
        assert_eq!(cache.get("whatever").unwrap(), &json!("whatever"));
    }

    #[test]
    fn missing_attribute_is_not_found() {
        let cache: FlatMap = FlatMap::new();
        let err = cache.get("missing").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err, CacheError::MissingAttribute { key: "missing".into() });
    }

    #[test]
    fn missing_attribute_never_creates() {
        let cache: FlatMap = FlatMap::new();
        assert!(cache.get("section").is_err());
        assert!(cache.get("section").is_err());
        assert!(cache.is_empty());
        assert!(!cache.contains_key("section"));
    }

    #[test]
    fn overwrite_returns_previous_and_keeps_position() {
        let mut cache = FlatMap::new();
        cache.set("a", json!(1));
        cache.set("b", json!(2));
        let old = cache.set("a", json!(3));
        assert_eq!(old, Some(json!(1)));
        let entries: Vec<(String, Value)> = cache
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        assert_eq!(
            entries,
            vec![("a".to_string(), json!(3)), ("b".to_string(), json!(2))]
        );
    }

    #[test]
    fn attribute_and_mapping_views_agree() {
        let mut cache = FlatMap::new();
        cache.set("title", json!("Home"));
        assert_eq!(cache.get_key(&Key::from("title")).unwrap(), &json!("Home"));

        cache.set_key(Key::from("draft"), json!(true));
        assert_eq!(cache.get("draft").unwrap(), &json!(true));
    }

    #[test]
    fn non_string_keys_live_alongside_names() {
        let mut cache = FlatMap::new();
        cache.set_key(Key::Index(0), json!("zero"));
        assert_eq!(cache.try_get_key(&Key::Index(0)), Some(&json!("zero")));
        assert!(cache.try_get("0").is_none());
        assert!(cache.get_key(&Key::Index(1)).is_err());
    }

    #[test]
    fn keyword_construction() {
        let cache: FlatMap = [("title", json!("Home")), ("count", json!(3))]
            .into_iter()
            .collect();
        assert_eq!(cache.len(), 2);
        let keys: Vec<String> = cache.keys().map(|k| k.to_string()).collect();
        assert_eq!(keys, vec!["title", "count"]);
        assert_eq!(cache.values().count(), 2);
    }

    #[test]
    fn iterate_by_reference() {
        let cache: FlatMap = [("x", json!(1))].into_iter().collect();
        let mut seen = 0;
        for (key, value) in &cache {
            assert_eq!(key.as_name(), Some("x"));
            assert_eq!(value, &json!(1));
            seen += 1;
        }
        assert_eq!(seen, 1);
    }
}
