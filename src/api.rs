//! Request and response shapes for prediction clients.
//!
//! These types carry the JSON field names used by the web front end
//! (`symptoms`, `medical_history`, `ehr_context`, ...). Validation of user
//! input happens here; the engine accepts any text.
//!
//! # Examples
//!
//! ```
//! use differential::api::{self, PredictRequest};
//! use differential::corpus::{CorpusStore, TrainingRecord};
//! use differential::engine::{ClassifierConfig, SymptomEngine};
//!
//! let corpus = CorpusStore::from_records(vec![
//!     TrainingRecord::new("fever cough sore throat", "Influenza"),
//!     TrainingRecord::new("fever cough body aches", "Influenza"),
//!     TrainingRecord::new("sore throat sneezing", "Common Cold"),
//! ]);
//! let engine = SymptomEngine::from_corpus(corpus, ClassifierConfig::default()).unwrap();
//!
//! let request: PredictRequest =
//!     serde_json::from_str(r#"{"symptoms": "fever and cough", "age": "34"}"#).unwrap();
//! let response = api::predict(&engine, &request).unwrap();
//!
//! assert_eq!(response.predictions[0].label, "Influenza");
//! assert_eq!(response.ehr_context.unwrap().age, Some(34));
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::classifier::{QueryContext, RankedPrediction};
use crate::corpus::CorpusStore;
use crate::engine::SymptomEngine;
use crate::error::{DifferentialError, Result};

/// Shortest accepted symptom description, in characters, after trimming.
pub const MIN_SYMPTOM_LENGTH: usize = 3;

/// Text attached to every prediction response.
pub const DISCLAIMER: &str = "This is an AI-based screening tool for informational purposes only. \
     It is NOT a substitute for professional medical advice, diagnosis, or treatment.";

/// Medical history given either as one string or a list of entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MedicalHistory {
    Single(String),
    List(Vec<String>),
}

impl MedicalHistory {
    /// Non-blank entries, in order.
    pub fn entries(&self) -> Vec<String> {
        let entries: Vec<&String> = match self {
            MedicalHistory::Single(entry) => vec![entry],
            MedicalHistory::List(entries) => entries.iter().collect(),
        };
        entries
            .into_iter()
            .filter(|entry| !entry.trim().is_empty())
            .cloned()
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

/// A prediction request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictRequest {
    pub symptoms: String,
    #[serde(
        default,
        deserialize_with = "deserialize_lenient_age",
        skip_serializing_if = "Option::is_none"
    )]
    pub age: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sex: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medical_history: Option<MedicalHistory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_k: Option<usize>,
}

impl PredictRequest {
    pub fn new<S: Into<String>>(symptoms: S) -> Self {
        PredictRequest {
            symptoms: symptoms.into(),
            ..Default::default()
        }
    }

    /// The trimmed symptom text, rejected when too short.
    pub fn validated_symptoms(&self) -> Result<&str> {
        let symptoms = self.symptoms.trim();
        if symptoms.chars().count() < MIN_SYMPTOM_LENGTH {
            return Err(DifferentialError::invalid_query(
                "Please provide a more detailed symptom description.",
            ));
        }
        Ok(symptoms)
    }

    /// The context fields that were actually provided. Blank strings count as absent.
    pub fn ehr_context(&self) -> Option<EhrContext> {
        let sex = self
            .sex
            .as_deref()
            .map(str::trim)
            .filter(|sex| !sex.is_empty())
            .map(str::to_string);
        let medical_history = self
            .medical_history
            .clone()
            .filter(|history| !history.is_empty());

        if self.age.is_none() && sex.is_none() && medical_history.is_none() {
            return None;
        }

        Some(EhrContext {
            age: self.age,
            sex,
            medical_history,
        })
    }
}

/// The context fields echoed back in a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EhrContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sex: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medical_history: Option<MedicalHistory>,
}

impl From<&EhrContext> for QueryContext {
    fn from(ehr: &EhrContext) -> Self {
        QueryContext {
            age: ehr.age,
            sex: ehr.sex.clone(),
            history: ehr
                .medical_history
                .as_ref()
                .map(MedicalHistory::entries)
                .unwrap_or_default(),
        }
    }
}

/// A prediction response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    pub predictions: Vec<RankedPrediction>,
    pub input_symptoms: String,
    pub ehr_context: Option<EhrContext>,
    pub disclaimer: String,
}

/// Validate `request` and run it against `engine`.
pub fn predict(engine: &SymptomEngine, request: &PredictRequest) -> Result<PredictResponse> {
    let symptoms = request.validated_symptoms()?;
    let top_k = request.top_k.unwrap_or(engine.config().default_top_k);
    let ehr_context = request.ehr_context();
    let context = ehr_context.as_ref().map(QueryContext::from);

    let predictions = engine.predict(symptoms, top_k, context.as_ref())?;
    log::debug!(
        "predicted {} labels for a {}-character description (top_k={})",
        predictions.len(),
        symptoms.chars().count(),
        top_k
    );

    Ok(PredictResponse {
        predictions,
        input_symptoms: symptoms.to_string(),
        ehr_context,
        disclaimer: DISCLAIMER.to_string(),
    })
}

/// A label in the disease catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiseaseEntry {
    pub name: String,
    pub severity: String,
}

/// Every label the engine can predict, grouped by category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiseaseCatalog {
    pub total: usize,
    /// Category → labels, each list sorted by name.
    pub categories: BTreeMap<String, Vec<DiseaseEntry>>,
}

impl DiseaseCatalog {
    /// Build the catalog for a corpus's distinct labels.
    pub fn from_corpus(corpus: &CorpusStore) -> Self {
        let mut labels = corpus.labels();
        labels.sort_unstable();

        let mut categories: BTreeMap<String, Vec<DiseaseEntry>> = BTreeMap::new();
        for label in &labels {
            let metadata = corpus.metadata_or_default(label);
            categories
                .entry(metadata.category)
                .or_default()
                .push(DiseaseEntry {
                    name: label.to_string(),
                    severity: metadata.severity,
                });
        }

        DiseaseCatalog {
            total: labels.len(),
            categories,
        }
    }
}

/// The catalog for the engine's current snapshot, empty when none is loaded.
pub fn diseases(engine: &SymptomEngine) -> DiseaseCatalog {
    engine
        .snapshot()
        .map(|snapshot| DiseaseCatalog::from_corpus(snapshot.corpus()))
        .unwrap_or_default()
}

fn deserialize_lenient_age<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|value| match value {
        serde_json::Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        serde_json::Value::String(text) => text.trim().parse::<i64>().ok(),
        _ => None,
    }))
}
