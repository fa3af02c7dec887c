use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TabularPpoError};

/// Additive constant keeping the KL log ratio finite; not a tunable
pub const KL_EPSILON: f32 = 1e-10;

/// KL divergence of `trained` from `reference`:
/// `sum_a p(a) * ln((p(a) + eps) / (q(a) + eps))`.
pub fn kl_divergence(trained: ArrayView1<f32>, reference: ArrayView1<f32>) -> f32 {
    debug_assert_eq!(trained.len(), reference.len());
    trained
        .iter()
        .zip(reference.iter())
        .map(|(&p, &q)| p * ((p + KL_EPSILON) / (q + KL_EPSILON)).ln())
        .sum()
}

/// Penalises divergence of the trained policy from a fixed reference policy by
/// folding `beta * KL` into each step reward.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct KlRegularizer {
    beta: f32,
}

impl KlRegularizer {
    pub fn new(beta: f32) -> Result<Self> {
        if !beta.is_finite() || beta < 0.0 {
            return Err(TabularPpoError::invalid_parameter(
                "beta".to_string(),
                format!("must be finite and non-negative, got {}", beta),
            ));
        }
        Ok(KlRegularizer { beta })
    }

    /// Regulariser with `beta = 0`: rewards pass through untouched
    pub fn disabled() -> Self {
        KlRegularizer { beta: 0.0 }
    }

    pub fn beta(&self) -> f32 {
        self.beta
    }

    /// `raw_reward - beta * kl`
    pub fn shape_reward(&self, raw_reward: f32, kl: f32) -> f32 {
        raw_reward - self.beta * kl
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_identical_distributions_have_zero_kl() {
        let p = array![0.1, 0.2, 0.3, 0.4];
        assert_abs_diff_eq!(kl_divergence(p.view(), p.view()), 0.0, epsilon = 1e-7);
    }

    #[test]
    fn test_kl_matches_closed_form() {
        let p = array![0.5, 0.5];
        let q = array![0.9, 0.1];
        let expected = 0.5 * (0.5f32 / 0.9).ln() + 0.5 * (0.5f32 / 0.1).ln();
        assert_abs_diff_eq!(kl_divergence(p.view(), q.view()), expected, epsilon = 1e-5);
        assert!(kl_divergence(p.view(), q.view()) > 0.0);
    }

    #[test]
    fn test_kl_is_asymmetric() {
        let p = array![0.7, 0.2, 0.1];
        let q = array![0.2, 0.3, 0.5];
        let forward = kl_divergence(p.view(), q.view());
        let backward = kl_divergence(q.view(), p.view());
        assert!((forward - backward).abs() > 1e-3);
    }

    #[test]
    fn test_zero_probabilities_stay_finite() {
        let p = array![1.0, 0.0];
        let q = array![0.0, 1.0];
        let kl = kl_divergence(p.view(), q.view());
        assert!(kl.is_finite());
        assert!(kl > 0.0);
    }

    #[test]
    fn test_shape_reward() {
        let reg = KlRegularizer::new(0.1).unwrap();
        assert_abs_diff_eq!(reg.shape_reward(-1.0, 0.5), -1.05, epsilon = 1e-6);
        assert_eq!(KlRegularizer::disabled().shape_reward(-1.0, 100.0), -1.0);
    }

    #[test]
    fn test_negative_beta_rejected() {
        assert!(KlRegularizer::new(-0.1).is_err());
        assert!(KlRegularizer::new(f32::NAN).is_err());
        assert!(KlRegularizer::new(0.0).is_ok());
    }
}
