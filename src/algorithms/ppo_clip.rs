use serde::{Deserialize, Serialize};
use tracing::debug;

use super::rollout::Trajectory;
use crate::error::{Result, TabularPpoError};
use crate::policy::TabularPolicy;
use crate::types::State;

/// Additive constant protecting the probability ratio and the log score
pub const RATIO_EPSILON: f32 = 1e-10;

/// Pieces of the clipped surrogate for one timestep
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClipObjective {
    pub ratio: f32,
    pub clipped_ratio: f32,
    pub surrogate: f32,
}

/// Pessimistic PPO-clip surrogate `min(r * A, clamp(r, 1 - eps, 1 + eps) * A)`
pub fn clipped_surrogate(ratio: f32, advantage: f32, epsilon: f32) -> ClipObjective {
    let clipped_ratio = ratio.clamp(1.0 - epsilon, 1.0 + epsilon);
    let surrogate = (ratio * advantage).min(clipped_ratio * advantage);
    ClipObjective { ratio, clipped_ratio, surrogate }
}

/// Summary of one episode's update pass
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct UpdateStats {
    pub steps: usize,
    /// Steps whose ratio fell outside the clip band
    pub clipped_steps: usize,
    pub mean_surrogate: f32,
    pub mean_abs_update: f32,
}

/// Per-timestep PPO-clip update of a tabular policy.
///
/// Timesteps are processed strictly in order and each one re-queries the policy,
/// so a step sees the weight changes made by every earlier step of the same
/// episode. Only the weight of the taken action in the visited state moves.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PpoClipUpdate {
    epsilon: f32,
    learning_rate: f32,
}

impl PpoClipUpdate {
    pub fn new(epsilon: f32, learning_rate: f32) -> Result<Self> {
        if !(epsilon > 0.0 && epsilon < 1.0) {
            return Err(TabularPpoError::invalid_parameter(
                "epsilon".to_string(),
                format!("must lie in (0, 1), got {}", epsilon),
            ));
        }
        if !learning_rate.is_finite() {
            return Err(TabularPpoError::invalid_parameter(
                "learning_rate".to_string(),
                format!("must be finite, got {}", learning_rate),
            ));
        }
        Ok(PpoClipUpdate { epsilon, learning_rate })
    }

    pub fn epsilon(&self) -> f32 {
        self.epsilon
    }

    pub fn learning_rate(&self) -> f32 {
        self.learning_rate
    }

    /// Objective and weight delta for a single timestep given the current and
    /// behaviour probabilities of the taken action
    pub fn step_delta(&self, current_prob: f32, behavior_prob: f32, advantage: f32) -> (ClipObjective, f32) {
        let ratio = current_prob / (behavior_prob + RATIO_EPSILON);
        let objective = clipped_surrogate(ratio, advantage, self.epsilon);
        let pseudo_gradient = -objective.surrogate * (current_prob + RATIO_EPSILON).ln();
        (objective, self.learning_rate * pseudo_gradient)
    }

    /// Apply the update for every timestep of `trajectory`, in order
    pub fn apply<S: State>(
        &self,
        policy: &mut TabularPolicy,
        trajectory: &Trajectory<S>,
        advantages: &[f32],
    ) -> Result<UpdateStats> {
        if trajectory.is_empty() {
            return Err(TabularPpoError::EmptyTrajectory(
                "nothing to update from".to_string(),
            ));
        }
        if advantages.len() != trajectory.len() {
            return Err(TabularPpoError::dimension_mismatch(
                trajectory.len().to_string(),
                advantages.len().to_string(),
            ));
        }

        let mut stats = UpdateStats { steps: trajectory.len(), ..UpdateStats::default() };
        let mut surrogate_sum = 0.0;
        let mut update_sum = 0.0;

        for (step, &advantage) in trajectory.steps.iter().zip(advantages.iter()) {
            let state_index = policy.row_index(&step.state);
            let current_prob = policy.action_probabilities(&step.state)[step.action];

            let (objective, delta) = self.step_delta(current_prob, step.behavior_prob, advantage);
            policy.add_to_weight(state_index, step.action, delta);

            if objective.clipped_ratio != objective.ratio {
                stats.clipped_steps += 1;
            }
            surrogate_sum += objective.surrogate;
            update_sum += delta.abs();
        }

        stats.mean_surrogate = surrogate_sum / stats.steps as f32;
        stats.mean_abs_update = update_sum / stats.steps as f32;

        debug!(
            steps = stats.steps,
            clipped = stats.clipped_steps,
            mean_surrogate = stats.mean_surrogate,
            mean_abs_update = stats.mean_abs_update,
            "ppo-clip update applied"
        );

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::rollout::TrajectoryStep;
    use crate::types::GridState;
    use approx::assert_abs_diff_eq;
    use ndarray::Array2;

    fn step(state: GridState, action: usize, behavior_prob: f32) -> TrajectoryStep<GridState> {
        TrajectoryStep { state, action, reward: 0.0, raw_reward: 0.0, behavior_prob, kl: 0.0 }
    }

    #[test]
    fn test_ratio_on_band_edge_is_unclipped() {
        let obj = clipped_surrogate(1.2, 1.0, 0.2);
        assert_abs_diff_eq!(obj.clipped_ratio, 1.2, epsilon = 1e-6);
        assert_abs_diff_eq!(obj.surrogate, 1.2, epsilon = 1e-6);
    }

    #[test]
    fn test_clipping_binds_for_large_ratio() {
        let obj = clipped_surrogate(1.5, 1.0, 0.2);
        assert_abs_diff_eq!(obj.clipped_ratio, 1.2, epsilon = 1e-6);
        assert_abs_diff_eq!(obj.surrogate, 1.2, epsilon = 1e-6);
    }

    #[test]
    fn test_negative_advantage_takes_pessimistic_bound() {
        let obj = clipped_surrogate(0.7, -1.0, 0.2);
        assert_abs_diff_eq!(obj.clipped_ratio, 0.8, epsilon = 1e-6);
        assert_abs_diff_eq!(obj.surrogate, -0.8, epsilon = 1e-6);
    }

    #[test]
    fn test_step_delta_formula() {
        let rule = PpoClipUpdate::new(0.2, 0.01).unwrap();
        let (obj, delta) = rule.step_delta(0.25, 0.25, 2.0);
        assert_abs_diff_eq!(obj.ratio, 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(obj.surrogate, 2.0, epsilon = 1e-6);
        // -2 * ln(0.25) * 0.01
        assert_abs_diff_eq!(delta, 0.01 * 2.0 * 4.0f32.ln(), epsilon = 1e-6);
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(PpoClipUpdate::new(0.0, 0.01).is_err());
        assert!(PpoClipUpdate::new(1.0, 0.01).is_err());
        assert!(PpoClipUpdate::new(0.2, f32::INFINITY).is_err());
    }

    #[test]
    fn test_apply_touches_only_taken_actions() {
        let mut policy = TabularPolicy::from_weights(2, Array2::zeros((4, 4))).unwrap();
        let rule = PpoClipUpdate::new(0.2, 0.01).unwrap();
        let mut trajectory = Trajectory::new();
        trajectory.push(step(GridState::new(0, 1), 3, 0.25));

        let stats = rule.apply(&mut policy, &trajectory, &[1.0]).unwrap();
        assert_eq!(stats.steps, 1);
        assert_eq!(stats.clipped_steps, 0);

        let weights = policy.weights();
        assert!(weights[[1, 3]] > 0.0);
        let changed = weights.iter().filter(|&&w| w != 0.0).count();
        assert_eq!(changed, 1);
        assert_eq!(policy.shape(), (4, 4));
    }

    #[test]
    fn test_sequential_updates_see_earlier_changes() {
        // Same state-action twice: the second step must use the shifted probability
        let mut policy = TabularPolicy::from_weights(1, Array2::zeros((1, 4))).unwrap();
        let rule = PpoClipUpdate::new(0.2, 0.5).unwrap();
        let mut trajectory = Trajectory::new();
        trajectory.push(step(GridState::new(0, 0), 0, 0.25));
        trajectory.push(step(GridState::new(0, 0), 0, 0.25));

        rule.apply(&mut policy, &trajectory, &[1.0, 1.0]).unwrap();

        let (_, first) = rule.step_delta(0.25, 0.25, 1.0);
        let mut shifted = Array2::zeros((1, 4));
        shifted[[0, 0]] = first;
        let shifted_policy = TabularPolicy::from_weights(1, shifted).unwrap();
        let p = shifted_policy.action_probabilities(&GridState::new(0, 0))[0];
        let (_, second) = rule.step_delta(p, 0.25, 1.0);

        assert_abs_diff_eq!(policy.weights()[[0, 0]], first + second, epsilon = 1e-6);
        assert!(second < first);
    }

    #[test]
    fn test_apply_rejects_bad_inputs() {
        let mut policy = TabularPolicy::from_weights(1, Array2::zeros((1, 4))).unwrap();
        let rule = PpoClipUpdate::new(0.2, 0.01).unwrap();
        let empty: Trajectory<GridState> = Trajectory::new();
        assert!(matches!(
            rule.apply(&mut policy, &empty, &[]),
            Err(TabularPpoError::EmptyTrajectory(_))
        ));

        let mut trajectory = Trajectory::new();
        trajectory.push(step(GridState::new(0, 0), 0, 0.25));
        assert!(matches!(
            rule.apply(&mut policy, &trajectory, &[1.0, 2.0]),
            Err(TabularPpoError::DimensionMismatch { .. })
        ));
    }
}
