//! Ordered identifier → record mapping used by every analysis payload.
//!
//! The server emits JSON objects keyed by subject id (or PK parameter name for
//! bioequivalence). Rendering picks "the first subject" in several places, so
//! document order is preserved instead of collecting into a hash map. The
//! reserved `summary` key carries aggregate statistics with a different shape
//! and is dropped during decoding.

use std::fmt;
use std::marker::PhantomData;

use serde::de::{IgnoredAny, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Reserved key holding cross-subject aggregates; never iterated as a subject.
pub const SUMMARY_KEY: &str = "summary";

/// Insertion-ordered map from subject/parameter id to a record.
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectMap<T> {
    entries: Vec<(String, T)>,
}

impl<T> Default for SubjectMap<T> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<T> SubjectMap<T> {
    /// Empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace `key`. A replaced key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: T) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// First entry in document order.
    pub fn first(&self) -> Option<(&str, &T)> {
        self.entries.first().map(|(k, v)| (k.as_str(), v))
    }

    /// The entry named by `key`, or the first entry when `key` is `None`.
    pub fn select(&self, key: Option<&str>) -> Option<(&str, &T)> {
        match key {
            Some(key) => {
                self.entries.iter().find(|(k, _)| k == key).map(|(k, v)| (k.as_str(), v))
            }
            None => self.first(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> + '_ {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl<T> FromIterator<(String, T)> for SubjectMap<T> {
    fn from_iter<I: IntoIterator<Item = (String, T)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl<T: Serialize> Serialize for SubjectMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for SubjectMap<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SubjectMapVisitor<T>(PhantomData<T>);

        impl<'de, T: Deserialize<'de>> Visitor<'de> for SubjectMapVisitor<T> {
            type Value = SubjectMap<T>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object keyed by subject or parameter id")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut map = SubjectMap::new();
                while let Some(key) = access.next_key::<String>()? {
                    if key == SUMMARY_KEY {
                        access.next_value::<IgnoredAny>()?;
                        continue;
                    }
                    let value = access.next_value::<T>()?;
                    map.insert(key, value);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(SubjectMapVisitor(PhantomData))
    }
}
