use ndarray::{Array1, ArrayView1};
use tracing::debug;

/// Uniform distribution over `len` outcomes.
pub fn uniform(len: usize) -> Array1<f32> {
    if len == 0 {
        return Array1::zeros(0);
    }
    Array1::from_elem(len, 1.0 / len as f32)
}

/// Numerically stable softmax.
///
/// The maximum score is subtracted before exponentiating. If any normalised
/// entry is NaN or infinite the computation is discarded and the uniform
/// distribution is returned instead; this function never fails.
pub fn safe_softmax(scores: ArrayView1<f32>) -> Array1<f32> {
    if scores.is_empty() {
        return Array1::zeros(0);
    }

    let max = scores.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    let exp_values = scores.mapv(|x| (x - max).exp());
    let sum = exp_values.sum();
    let probs = exp_values / sum;

    if probs.iter().any(|p| !p.is_finite()) {
        debug!(len = scores.len(), "softmax produced non-finite values, using uniform");
        return uniform(scores.len());
    }

    probs
}
