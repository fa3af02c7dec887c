use rand::Rng;
use tracing::trace;

use super::kl::{kl_divergence, KlRegularizer};
use crate::environment::Environment;
use crate::policy::TabularPolicy;
use crate::types::State;

/// One timestep of an episode
#[derive(Clone, Debug, PartialEq)]
pub struct TrajectoryStep<S> {
    pub state: S,
    pub action: usize,
    /// Environment reward minus the KL penalty
    pub reward: f32,
    /// Environment reward before shaping
    pub raw_reward: f32,
    /// Probability of `action` under the trained policy when it was sampled
    pub behavior_prob: f32,
    /// KL divergence of the trained from the reference distribution at `state`
    pub kl: f32,
}

/// Ordered record of one episode, rebuilt every episode and never persisted
#[derive(Clone, Debug, PartialEq)]
pub struct Trajectory<S> {
    pub steps: Vec<TrajectoryStep<S>>,
}

impl<S> Trajectory<S> {
    pub fn new() -> Self {
        Trajectory { steps: Vec::new() }
    }

    pub fn push(&mut self, step: TrajectoryStep<S>) {
        self.steps.push(step);
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Shaped rewards in time order
    pub fn rewards(&self) -> Vec<f32> {
        self.steps.iter().map(|s| s.reward).collect()
    }

    pub fn total_reward(&self) -> f32 {
        self.steps.iter().map(|s| s.reward).sum()
    }

    pub fn total_raw_reward(&self) -> f32 {
        self.steps.iter().map(|s| s.raw_reward).sum()
    }

    pub fn mean_kl(&self) -> f32 {
        if self.steps.is_empty() {
            return 0.0;
        }
        self.steps.iter().map(|s| s.kl).sum::<f32>() / self.steps.len() as f32
    }
}

impl<S> Default for Trajectory<S> {
    fn default() -> Self {
        Self::new()
    }
}

/// Run exactly one episode with the trained policy acting.
///
/// Every step samples an action, steps the environment, and records the shaped
/// reward together with the trained policy's probability of the sampled action.
/// The loop ends only when the environment reports `done`.
pub fn run_episode<E, R>(
    env: &mut E,
    reference: &TabularPolicy,
    trained: &TabularPolicy,
    regularizer: &KlRegularizer,
    rng: &mut R,
) -> Trajectory<E::State>
where
    E: Environment,
    R: Rng,
{
    let mut trajectory = Trajectory::new();
    let mut state = env.reset();

    loop {
        let action = trained.sample_action(&state, rng);
        let transition = env.step(action);

        let reference_probs = reference.action_probabilities(&state);
        let trained_probs = trained.action_probabilities(&state);
        let kl = kl_divergence(trained_probs.view(), reference_probs.view());
        let reward = regularizer.shape_reward(transition.reward, kl);

        trace!(
            state = state.index(trained.grid_size()),
            action,
            raw_reward = transition.reward,
            reward,
            kl,
            "rollout step"
        );

        trajectory.push(TrajectoryStep {
            state,
            action,
            reward,
            raw_reward: transition.reward,
            behavior_prob: trained_probs[action],
            kl,
        });

        state = transition.next_state;
        if transition.done {
            break;
        }
    }

    trajectory
}
