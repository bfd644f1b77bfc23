//! Key/value metadata attached to gateways and systems

use std::collections::BTreeMap;

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// Metadata map.
///
/// The API transports it as a list of `{"key": .., "value": ..}` pairs; in
/// memory it is a sorted map so lookups and re-encoding are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata(pub BTreeMap<String, String>);

#[derive(Serialize, Deserialize)]
struct MetadataEntry {
    #[serde(alias = "Key")]
    key: String,
    #[serde(alias = "Value", default)]
    value: String,
}

impl Metadata {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for Metadata {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let entries: Vec<MetadataEntry> = self
            .0
            .iter()
            .map(|(key, value)| MetadataEntry { key: key.clone(), value: value.clone() })
            .collect();
        entries.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Metadata {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = Option::<Vec<MetadataEntry>>::deserialize(deserializer)?.unwrap_or_default();
        Ok(Self(entries.into_iter().map(|entry| (entry.key, entry.value)).collect()))
    }
}

impl FromIterator<(String, String)> for Metadata {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
