//! Labeled training corpus and per-label metadata.
//!
//! A [`CorpusStore`] is the immutable input to an engine build: an ordered list
//! of [`TrainingRecord`]s plus a label → [`LabelMetadata`] mapping. Record order
//! is significant: vocabulary indices, corpus matrix rows and tie-breaking
//! between equally scored labels all follow it.

pub mod loader;

use std::collections::BTreeMap;

use ahash::AHashSet;
use serde::{Deserialize, Deserializer, Serialize};

/// Category and severity reported when a label has no metadata.
pub const UNKNOWN: &str = "Unknown";

/// A single labeled example.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingRecord {
    /// Free-text symptom description.
    #[serde(rename = "symptoms", alias = "text")]
    pub text: String,
    /// Condition label.
    #[serde(rename = "disease", alias = "label")]
    pub label: String,
}

impl TrainingRecord {
    /// Create a new training record.
    pub fn new<T: Into<String>, L: Into<String>>(text: T, label: L) -> Self {
        TrainingRecord {
            text: text.into(),
            label: label.into(),
        }
    }
}

/// Descriptive metadata attached to a label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelMetadata {
    /// The label this metadata describes (filled from the map key on load).
    #[serde(default, skip_serializing)]
    pub label: String,
    #[serde(
        default = "LabelMetadata::default_unknown",
        deserialize_with = "deserialize_unknown_if_blank"
    )]
    pub category: String,
    #[serde(default, deserialize_with = "deserialize_empty_if_null")]
    pub description: String,
    #[serde(
        default = "LabelMetadata::default_unknown",
        deserialize_with = "deserialize_unknown_if_blank"
    )]
    pub severity: String,
    /// Advice on when and where to seek care.
    #[serde(
        default,
        rename = "seek_care",
        deserialize_with = "deserialize_empty_if_null"
    )]
    pub care_advice: String,
}

impl LabelMetadata {
    /// Metadata with every field at its documented default.
    pub fn unknown<S: Into<String>>(label: S) -> Self {
        LabelMetadata {
            label: label.into(),
            category: UNKNOWN.to_string(),
            description: String::new(),
            severity: UNKNOWN.to_string(),
            care_advice: String::new(),
        }
    }

    fn default_unknown() -> String {
        UNKNOWN.to_string()
    }

    /// Replace blank category and severity with [`UNKNOWN`].
    fn fill_defaults(&mut self) {
        for field in [&mut self.category, &mut self.severity] {
            if field.trim().is_empty() {
                *field = UNKNOWN.to_string();
            }
        }
    }
}

fn deserialize_unknown_if_blank<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(LabelMetadata::default_unknown))
}

fn deserialize_empty_if_null<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// The labeled training corpus.
#[derive(Debug, Clone, Default)]
pub struct CorpusStore {
    records: Vec<TrainingRecord>,
    metadata: BTreeMap<String, LabelMetadata>,
}

impl CorpusStore {
    /// Create a corpus from records and a label → metadata mapping.
    pub fn new<I>(records: Vec<TrainingRecord>, metadata: I) -> Self
    where
        I: IntoIterator<Item = (String, LabelMetadata)>,
    {
        let metadata = metadata
            .into_iter()
            .map(|(label, mut meta)| {
                meta.label = label.clone();
                meta.fill_defaults();
                (label, meta)
            })
            .collect();

        CorpusStore { records, metadata }
    }

    /// Create a corpus without any label metadata.
    pub fn from_records(records: Vec<TrainingRecord>) -> Self {
        Self::new(records, std::iter::empty())
    }

    /// All records, in load order.
    pub fn records(&self) -> &[TrainingRecord] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the corpus has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct labels in order of first appearance.
    pub fn labels(&self) -> Vec<&str> {
        let mut seen = AHashSet::new();
        self.records
            .iter()
            .filter(|record| seen.insert(record.label.as_str()))
            .map(|record| record.label.as_str())
            .collect()
    }

    /// Metadata for a label, if any was loaded.
    pub fn metadata(&self, label: &str) -> Option<&LabelMetadata> {
        self.metadata.get(label)
    }

    /// Metadata for a label, falling back to the documented defaults.
    pub fn metadata_or_default(&self, label: &str) -> LabelMetadata {
        self.metadata
            .get(label)
            .cloned()
            .unwrap_or_else(|| LabelMetadata::unknown(label))
    }

    /// The full label → metadata mapping.
    pub fn metadata_map(&self) -> &BTreeMap<String, LabelMetadata> {
        &self.metadata
    }

    /// Labels used by records that have no metadata entry.
    pub fn labels_without_metadata(&self) -> Vec<&str> {
        self.labels()
            .into_iter()
            .filter(|label| !self.metadata.contains_key(*label))
            .collect()
    }

    /// A corpus over a subset of this corpus's records, sharing its metadata.
    pub fn subset(&self, indices: &[usize]) -> CorpusStore {
        let records = indices
            .iter()
            .filter_map(|&i| self.records.get(i).cloned())
            .collect();

        CorpusStore {
            records,
            metadata: self.metadata.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CorpusStore {
        let mut flu = LabelMetadata::unknown("flu");
        flu.category = "Respiratory".to_string();
        CorpusStore::new(
            vec![
                TrainingRecord::new("fever cough", "flu"),
                TrainingRecord::new("rash itching", "allergy"),
                TrainingRecord::new("fever chills", "flu"),
            ],
            vec![("flu".to_string(), flu)],
        )
    }

    #[test]
    fn test_labels_in_first_seen_order() {
        assert_eq!(sample().labels(), vec!["flu", "allergy"]);
    }

    #[test]
    fn test_metadata_defaults() {
        let corpus = sample();
        assert_eq!(corpus.metadata("flu").unwrap().category, "Respiratory");
        assert_eq!(corpus.metadata("flu").unwrap().label, "flu");

        let allergy = corpus.metadata_or_default("allergy");
        assert_eq!(allergy.category, UNKNOWN);
        assert_eq!(allergy.severity, UNKNOWN);
        assert!(allergy.description.is_empty());
        assert!(allergy.care_advice.is_empty());
        assert_eq!(corpus.labels_without_metadata(), vec!["allergy"]);
    }

    #[test]
    fn test_blank_category_and_severity_reported_as_unknown() {
        let mut flu = LabelMetadata::unknown("flu");
        flu.category = String::new();
        flu.severity = " ".to_string();
        let corpus = CorpusStore::new(
            vec![TrainingRecord::new("fever cough", "flu")],
            vec![("flu".to_string(), flu)],
        );

        let flu = corpus.metadata("flu").unwrap();
        assert_eq!(flu.category, UNKNOWN);
        assert_eq!(flu.severity, UNKNOWN);
    }

    #[test]
    fn test_subset_keeps_order_and_metadata() {
        let corpus = sample();
        let subset = corpus.subset(&[2, 0, 99]);
        assert_eq!(subset.len(), 2);
        assert_eq!(subset.records()[0].text, "fever chills");
        assert!(subset.metadata("flu").is_some());
    }

    #[test]
    fn test_record_serde_names() {
        let record: TrainingRecord =
            serde_json::from_str(r#"{"symptoms": "sore throat", "disease": "Strep"}"#).unwrap();
        assert_eq!(record, TrainingRecord::new("sore throat", "Strep"));

        let aliased: TrainingRecord =
            serde_json::from_str(r#"{"text": "sore throat", "label": "Strep"}"#).unwrap();
        assert_eq!(aliased, record);
    }
}
