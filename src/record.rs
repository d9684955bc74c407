//! Input model of the `*_data.json` metadata files
//!
//! Provider records are kept as ordered JSON objects so that folding and
//! re-serializing never loses fields the renderer does not know about.
//! Typed views ([`VolumeRecord`], [`ProviderRecord::volume_groups`]) are
//! derived on demand and tolerate missing or oddly shaped fields.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::vocab::{
    is_resource_key, BIBLIOGRAPHIC_INFO_KEY, LIST_OF_VOLUMES_KEY, MISSING_PLACEHOLDER,
    PROVIDER_KEY,
};

/// One parsed metadata file
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct MetadataDocument {
    /// Provider name to record; names may recur across files
    #[serde(rename = "Provider", default)]
    pub provider: Option<IndexMap<String, ProviderRecord>>,
}

impl MetadataDocument {
    /// Parse a document from JSON text
    ///
    /// Only a top-level object can carry providers; any other well-formed
    /// JSON value yields a document without a `Provider` key.
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        let mut root = match serde_json::from_str::<Value>(content)? {
            Value::Object(root) => root,
            _ => return Ok(Self::default()),
        };
        let provider = match root.remove(PROVIDER_KEY) {
            None | Some(Value::Null) => None,
            Some(providers) => Some(serde_json::from_value(providers)?),
        };
        Ok(Self { provider })
    }
}

/// Metadata of one provider: bibliographic info, volume lists and
/// possibly nested `Resource-N` layers
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ProviderRecord(Map<String, Value>);

impl ProviderRecord {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Build a record from a JSON value; `None` unless it is an object
    pub fn from_value(value: &Value) -> Option<Self> {
        value.as_object().cloned().map(Self)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Shallow update: every top-level key of `other` overwrites the same
    /// key here. Existing keys keep their position, new keys are appended.
    pub fn update(&mut self, other: ProviderRecord) {
        for (key, value) in other.0 {
            self.0.insert(key, value);
        }
    }

    /// The `Bibliographic Info` mapping, if present and an object
    pub fn bibliographic_info(&self) -> Option<&Map<String, Value>> {
        self.0.get(BIBLIOGRAPHIC_INFO_KEY).and_then(Value::as_object)
    }

    /// Volume lists grouped by title, in document order
    ///
    /// Returns `None` when the record has no `List of Volumes` object.
    /// Entries that are not objects are dropped from their group.
    pub fn volume_groups(&self) -> Option<Vec<(String, Vec<VolumeRecord>)>> {
        let lists = self.0.get(LIST_OF_VOLUMES_KEY).and_then(Value::as_object)?;
        let groups: Vec<(String, Vec<VolumeRecord>)> = lists
            .iter()
            .map(|(title, volumes)| {
                let volumes = volumes
                    .as_array()
                    .map(|arr| {
                        arr.iter()
                            .filter_map(VolumeRecord::from_value)
                            .collect::<Vec<_>>()
                    })
                    .unwrap_or_default();
                (title.clone(), volumes)
            })
            .collect();
        Some(groups)
    }

    /// Nested `Resource-*` layers carried by this record, in key order
    pub fn nested_resources(&self) -> Vec<(String, ProviderRecord)> {
        self.0
            .iter()
            .filter(|(key, _)| is_resource_key(key))
            .filter_map(|(key, value)| {
                ProviderRecord::from_value(value).map(|record| (key.clone(), record))
            })
            .collect()
    }
}

impl From<Map<String, Value>> for ProviderRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// One entry of a volume list; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct VolumeRecord {
    #[serde(rename = "Volume", default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<Value>,
    #[serde(rename = "Year", default, skip_serializing_if = "Option::is_none")]
    pub year: Option<Value>,
    #[serde(rename = "URL", default, skip_serializing_if = "Option::is_none")]
    pub url: Option<Value>,
    #[serde(rename = "METS", default, skip_serializing_if = "Option::is_none")]
    pub mets: Option<Value>,
}

impl VolumeRecord {
    pub fn from_value(value: &Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        serde_json::from_value(value.clone()).ok()
    }

    /// Volume label, or the placeholder when absent
    pub fn volume_label(&self) -> String {
        label_or_placeholder(self.volume.as_ref())
    }

    /// Year label, or the placeholder when absent
    pub fn year_label(&self) -> String {
        label_or_placeholder(self.year.as_ref())
    }

    /// Source link; an empty string counts as absent
    pub fn source_url(&self) -> Option<String> {
        self.url
            .as_ref()
            .map(display_scalar)
            .filter(|url| !url.is_empty())
    }

    /// METS identifier, if present
    pub fn mets_id(&self) -> Option<String> {
        self.mets.as_ref().map(display_scalar)
    }
}

fn label_or_placeholder(value: Option<&Value>) -> String {
    value
        .map(display_scalar)
        .unwrap_or_else(|| MISSING_PLACEHOLDER.to_string())
}

/// Plain text of a JSON value: strings unquoted, anything else as JSON
pub fn display_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
