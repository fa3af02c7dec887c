//! # Environment Module
//!
//! The training loop consumes environments through the [`Environment`] trait and never
//! looks at their reward or termination rules. Implementations must be deterministic
//! given state and action, return finite rewards, and terminate every episode in a
//! finite number of steps: the rollout engine imposes no step limit of its own.
//!
//! [`GridWorld`] is the bundled navigation task.

pub mod grid_world;

pub use grid_world::GridWorld;

use crate::types::State;

/// Outcome of a single environment step
#[derive(Clone, Debug, PartialEq)]
pub struct Transition<S> {
    pub next_state: S,
    pub reward: f32,
    pub done: bool,
}

impl<S> Transition<S> {
    pub fn new(next_state: S, reward: f32, done: bool) -> Self {
        Transition { next_state, reward, done }
    }
}

/// Single-agent episodic environment with a discrete action space
pub trait Environment {
    type State: State;

    /// Start a new episode and return its initial state
    fn reset(&mut self) -> Self::State;

    /// Apply `action` (in `0..action_size()`) to the current state
    fn step(&mut self, action: usize) -> Transition<Self::State>;

    /// Number of discrete actions
    fn action_size(&self) -> usize;

    /// Side length of the square state table; states index rows via `State::index`
    fn grid_size(&self) -> usize;

    /// Total number of distinct states
    fn state_size(&self) -> usize {
        self.grid_size() * self.grid_size()
    }
}
