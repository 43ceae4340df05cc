//! JSON corpus loading.
//!
//! The corpus bundle format is:
//!
//! ```json
//! {
//!   "training_data": [{"symptoms": "fever cough", "disease": "Influenza"}],
//!   "disease_info": {
//!     "Influenza": {
//!       "category": "Respiratory",
//!       "description": "A viral respiratory infection.",
//!       "severity": "Moderate",
//!       "seek_care": "Rest and fluids"
//!     }
//!   }
//! }
//! ```
//!
//! `disease_info` may be omitted, as may any field inside an entry.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::corpus::{CorpusStore, LabelMetadata, TrainingRecord};
use crate::error::{DifferentialError, Result};

/// On-disk shape of a corpus.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CorpusBundle {
    pub training_data: Vec<TrainingRecord>,
    #[serde(default)]
    pub disease_info: BTreeMap<String, LabelMetadata>,
}

impl CorpusBundle {
    /// Validate the bundle and convert it into a corpus store.
    pub fn into_store(self) -> Result<CorpusStore> {
        if let Some(position) = self
            .training_data
            .iter()
            .position(|record| record.label.trim().is_empty())
        {
            return Err(DifferentialError::corpus(format!(
                "training record {position} has an empty label"
            )));
        }

        let store = CorpusStore::new(self.training_data, self.disease_info);
        for label in store.labels_without_metadata() {
            log::warn!("label '{label}' has no metadata; defaults will be reported");
        }

        Ok(store)
    }
}

impl From<&CorpusStore> for CorpusBundle {
    fn from(store: &CorpusStore) -> Self {
        CorpusBundle {
            training_data: store.records().to_vec(),
            disease_info: store.metadata_map().clone(),
        }
    }
}

impl CorpusStore {
    /// Parse a corpus bundle from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let bundle: CorpusBundle = serde_json::from_str(json)?;
        bundle.into_store()
    }

    /// Parse a corpus bundle from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let bundle: CorpusBundle = serde_json::from_reader(reader)?;
        bundle.into_store()
    }

    /// Load a corpus bundle from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let store = Self::from_reader(BufReader::new(file))?;
        log::info!(
            "loaded {} training records ({} labels) from {}",
            store.len(),
            store.labels().len(),
            path.display()
        );
        Ok(store)
    }
}
