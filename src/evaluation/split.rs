//! Deterministic stratified train/test split.

use ahash::AHashMap;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::corpus::TrainingRecord;
use crate::error::{DifferentialError, Result};

/// Record indices of each side of a split, ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrainTestSplit {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Split `records` per label so each label keeps its share in both sides.
///
/// A label with `n` records sends `round(n * test_ratio)` of them to the test
/// side, capped at `n - 1` so every label keeps at least one training record.
/// Which records are held out is decided by a `StdRng` seeded with `seed`,
/// visiting labels in first-appearance order.
pub fn stratified_split(
    records: &[TrainingRecord],
    test_ratio: f64,
    seed: u64,
) -> Result<TrainTestSplit> {
    if !test_ratio.is_finite() || !(0.0..1.0).contains(&test_ratio) {
        return Err(DifferentialError::invalid_config(format!(
            "test_ratio must be within [0, 1), got {test_ratio}"
        )));
    }

    let mut order: Vec<&str> = Vec::new();
    let mut groups: AHashMap<&str, Vec<usize>> = AHashMap::new();
    for (index, record) in records.iter().enumerate() {
        groups
            .entry(record.label.as_str())
            .or_insert_with(|| {
                order.push(record.label.as_str());
                Vec::new()
            })
            .push(index);
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut split = TrainTestSplit::default();

    for label in order {
        let Some(mut indices) = groups.remove(label) else {
            continue;
        };
        let n = indices.len();
        let n_test = ((n as f64 * test_ratio).round() as usize).min(n.saturating_sub(1));

        indices.shuffle(&mut rng);
        split.test.extend_from_slice(&indices[..n_test]);
        split.train.extend_from_slice(&indices[n_test..]);
    }

    split.train.sort_unstable();
    split.test.sort_unstable();
    Ok(split)
}
