//! Vector similarity and score normalization.

/// Dot product over the common prefix of two slices.
pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Euclidean norm.
pub fn norm(a: &[f64]) -> f64 {
    dot(a, a).sqrt()
}

/// Cosine similarity of two equal-length vectors.
///
/// Returns 0.0 when either vector has zero norm or the lengths differ.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() {
        return 0.0;
    }
    cosine_with_norms(a, norm(a), b, norm(b))
}

/// Cosine similarity with precomputed norms.
pub fn cosine_with_norms(a: &[f64], a_norm: f64, b: &[f64], b_norm: f64) -> f64 {
    let denominator = a_norm * b_norm;
    if denominator == 0.0 {
        return 0.0;
    }
    dot(a, b) / denominator
}

/// Softmax over `scores` scaled by `temperature`.
///
/// Computes `exp((s - max) * temperature)` normalized to sum to 1. A
/// temperature of 0 yields a uniform distribution; larger values sharpen it.
/// An empty input yields an empty output.
pub fn softmax_with_temperature(scores: &[f64], temperature: f64) -> Vec<f64> {
    if scores.is_empty() {
        return Vec::new();
    }

    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scores
        .iter()
        .map(|s| ((s - max) * temperature).exp())
        .collect();
    let sum: f64 = exps.iter().sum();

    exps.into_iter().map(|e| e / sum).collect()
}
