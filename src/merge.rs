//! Provider folding for volume metadata
//!
//! Providers are combined by name. The first encounter of a name is stored
//! as-is; the second demotes the stored record to `Resource-1` and adds the
//! new one as `Resource-2`; every further encounter adds `Resource-N`, with
//! N the folder-wide encounter count of that provider.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::record::{MetadataDocument, ProviderRecord};
use crate::vocab::{resource_key, PROVIDER_KEY};

/// Combined entry of a provider name
///
/// A name seen once stays `Flat`. A name seen twice or more is `Layered`
/// and holds only `Resource-1..N` records; the two shapes never mix.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ProviderEntry {
    Flat(ProviderRecord),
    Layered(IndexMap<String, ProviderRecord>),
}

impl ProviderEntry {
    pub fn is_layered(&self) -> bool {
        matches!(self, ProviderEntry::Layered(_))
    }

    /// Resource layers of a layered entry
    pub fn layers(&self) -> Option<&IndexMap<String, ProviderRecord>> {
        match self {
            ProviderEntry::Flat(_) => None,
            ProviderEntry::Layered(layers) => Some(layers),
        }
    }

    /// Add `record` as `Resource-{n}`
    ///
    /// A flat entry is demoted to `Resource-1` first. If the slot is already
    /// taken the record is shallow-merged into it (key overwrite).
    /// Returns `true` when an existing slot was merged into.
    pub fn add_resource(&mut self, n: usize, record: ProviderRecord) -> bool {
        let mut layers = match std::mem::replace(self, ProviderEntry::Layered(IndexMap::new())) {
            ProviderEntry::Flat(first) => {
                let mut layers = IndexMap::new();
                layers.insert(resource_key(1), first);
                layers
            }
            ProviderEntry::Layered(layers) => layers,
        };

        let key = resource_key(n);
        let merged = match layers.get_mut(&key) {
            Some(existing) => {
                existing.update(record);
                true
            }
            None => {
                layers.insert(key, record);
                false
            }
        };

        *self = ProviderEntry::Layered(layers);
        merged
    }
}

/// What a single fold step did to the combined state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FoldOutcome {
    /// First encounter, stored flat
    Inserted,
    /// Added as a new resource layer
    Layered { slot: String },
    /// Merged into an already existing resource layer
    MergedIntoSlot { slot: String },
}

/// Providers of one folder, combined in first-seen order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CombinedState {
    providers: IndexMap<String, ProviderEntry>,
    encounters: HashMap<String, usize>,
}

impl CombinedState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one provider record into the state
    pub fn fold(&mut self, name: &str, record: ProviderRecord) -> FoldOutcome {
        let count = self.encounters.entry(name.to_string()).or_insert(0);
        *count += 1;
        let n = *count;

        match self.providers.get_mut(name) {
            None => {
                self.providers
                    .insert(name.to_string(), ProviderEntry::Flat(record));
                FoldOutcome::Inserted
            }
            Some(entry) => {
                let slot = resource_key(n);
                if entry.add_resource(n, record) {
                    FoldOutcome::MergedIntoSlot { slot }
                } else {
                    FoldOutcome::Layered { slot }
                }
            }
        }
    }

    /// Fold every provider of a document, in document order
    ///
    /// Returns the outcomes; empty when the document has no `Provider` key.
    pub fn fold_document(&mut self, document: MetadataDocument) -> Vec<FoldOutcome> {
        document
            .provider
            .unwrap_or_default()
            .into_iter()
            .map(|(name, record)| self.fold(&name, record))
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<&ProviderEntry> {
        self.providers.get(name)
    }

    /// Providers in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &ProviderEntry)> {
        self.providers.iter()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// How often a provider name was folded so far
    pub fn encounters(&self, name: &str) -> usize {
        self.encounters.get(name).copied().unwrap_or(0)
    }

    /// The state in the shape of a metadata document
    pub fn to_value(&self) -> Value {
        json!({ PROVIDER_KEY: self.providers })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> ProviderRecord {
        ProviderRecord::from_value(&value).unwrap()
    }

    fn doc(value: Value) -> MetadataDocument {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_single_encounter_stays_flat() {
        let alpha = record(json!({
            "Bibliographic Info": {"Title": "Annalen", "Place": "Leipzig"},
            "List of Volumes": {"Annalen": [{"Volume": "1", "Year": "1850"}]}
        }));
        let mut state = CombinedState::new();
        assert_eq!(state.fold("Alpha", alpha.clone()), FoldOutcome::Inserted);

        assert_eq!(state.get("Alpha"), Some(&ProviderEntry::Flat(alpha)));
        assert_eq!(state.encounters("Alpha"), 1);
    }

    #[test]
    fn test_second_encounter_restructures() {
        let first = record(json!({"Bibliographic Info": {"Title": "First"}}));
        let second = record(json!({"Bibliographic Info": {"Title": "Second"}}));

        let mut state = CombinedState::new();
        state.fold_document(doc(json!({"Provider": {"Alpha": first.clone()}})));
        let outcomes = state.fold_document(doc(json!({"Provider": {"Alpha": second.clone()}})));

        assert_eq!(
            outcomes,
            vec![FoldOutcome::Layered {
                slot: "Resource-2".to_string()
            }]
        );
        let layers = state.get("Alpha").unwrap().layers().unwrap();
        let keys: Vec<_> = layers.keys().cloned().collect();
        assert_eq!(keys, vec!["Resource-1", "Resource-2"]);
        assert_eq!(layers["Resource-1"], first);
        assert_eq!(layers["Resource-2"], second);
    }

    #[test]
    fn test_third_encounter_appends() {
        let mut state = CombinedState::new();
        for title in ["One", "Two", "Three"] {
            state.fold("Alpha", record(json!({"Bibliographic Info": {"Title": title}})));
        }

        let layers = state.get("Alpha").unwrap().layers().unwrap();
        let keys: Vec<_> = layers.keys().cloned().collect();
        assert_eq!(keys, vec!["Resource-1", "Resource-2", "Resource-3"]);
        assert_eq!(
            layers["Resource-1"].get("Bibliographic Info"),
            Some(&json!({"Title": "One"}))
        );
        assert_eq!(
            layers["Resource-2"].get("Bibliographic Info"),
            Some(&json!({"Title": "Two"}))
        );
        assert_eq!(
            layers["Resource-3"].get("Bibliographic Info"),
            Some(&json!({"Title": "Three"}))
        );
        assert_eq!(state.encounters("Alpha"), 3);
    }

    #[test]
    fn test_same_slot_merges_field_by_field() {
        let mut entry = ProviderEntry::Flat(record(json!({"Bibliographic Info": {"Title": "First"}})));
        assert!(!entry.add_resource(
            2,
            record(json!({
                "Bibliographic Info": {"Title": "Second"},
                "List of Volumes": {"Second": [{"Volume": "1"}]}
            }))
        ));

        // Another fragment for the same slot
        assert!(entry.add_resource(
            2,
            record(json!({"Bibliographic Info": {"Title": "Second, corrected"}}))
        ));

        let layers = entry.layers().unwrap();
        assert_eq!(layers.len(), 2);
        let slot = &layers["Resource-2"];
        assert_eq!(
            slot.get("Bibliographic Info"),
            Some(&json!({"Title": "Second, corrected"}))
        );
        assert_eq!(
            slot.get("List of Volumes"),
            Some(&json!({"Second": [{"Volume": "1"}]}))
        );
    }

    #[test]
    fn test_counter_is_per_provider() {
        let mut state = CombinedState::new();
        state.fold_document(doc(json!({"Provider": {"Alpha": {}, "Beta": {}}})));
        state.fold_document(doc(json!({"Provider": {"Beta": {"x": 1}}})));

        assert!(!state.get("Alpha").unwrap().is_layered());
        assert!(state.get("Beta").unwrap().is_layered());
        assert_eq!(state.encounters("Alpha"), 1);
        assert_eq!(state.encounters("Beta"), 2);
        assert_eq!(state.encounters("Gamma"), 0);
    }

    #[test]
    fn test_first_seen_order() {
        let mut state = CombinedState::new();
        state.fold_document(doc(json!({"Provider": {"Zeta": {}, "Alpha": {}}})));
        state.fold_document(doc(json!({"Provider": {"Mu": {}, "Zeta": {}}})));

        let names: Vec<_> = state.iter().map(|(name, _)| name.clone()).collect();
        assert_eq!(names, vec!["Zeta", "Alpha", "Mu"]);
    }

    #[test]
    fn test_document_without_provider() {
        let mut state = CombinedState::new();
        let outcomes = state.fold_document(doc(json!({"Unrelated": true})));
        assert!(outcomes.is_empty());
        assert!(state.is_empty());
    }

    #[test]
    fn test_to_value_shape() {
        let mut state = CombinedState::new();
        state.fold("Alpha", record(json!({"a": 1})));
        state.fold("Alpha", record(json!({"a": 2})));
        state.fold("Beta", record(json!({"b": 1})));

        assert_eq!(
            state.to_value(),
            json!({
                "Provider": {
                    "Alpha": {"Resource-1": {"a": 1}, "Resource-2": {"a": 2}},
                    "Beta": {"b": 1}
                }
            })
        );
    }
}
