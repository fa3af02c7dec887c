//! # Training Algorithm Module
//!
//! REINFORCE with a PPO-style clipped surrogate and a KL penalty against a fixed
//! reference policy, specialised to tabular softmax policies.
//!
//! ## Per-episode pipeline
//!
//! 1. [`rollout::run_episode`] plays one episode with the trained policy. At every step
//!    the KL divergence of the trained distribution from the reference distribution is
//!    subtracted from the reward (scaled by `beta`, see [`kl::KlRegularizer`]).
//! 2. [`advantage::ReturnEstimate`] computes discounted returns backwards and centres
//!    them on the episode mean to get advantages.
//! 3. [`ppo_clip::PpoClipUpdate`] walks the trajectory in order, recomputing the current
//!    probability of each taken action, clipping the probability ratio to
//!    `[1 - epsilon, 1 + epsilon]`, and adding `lr * -surrogate * ln(p)` to that
//!    single weight.
//!
//! The stages never overlap, and the update in step 3 is sequential: later timesteps
//! observe the weight changes made by earlier ones within the same episode. This departs
//! from batched PPO on purpose.
//!
//! ## Example Usage
//!
//! ```rust
//! use tabular_ppo::algorithms::{run_episode, KlRegularizer, PpoClipUpdate, ReturnEstimate};
//! use tabular_ppo::environment::GridWorld;
//! use tabular_ppo::policy::TabularPolicy;
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut rng = StdRng::seed_from_u64(0);
//! let mut env = GridWorld::new(4);
//! let reference = TabularPolicy::new(4, 4, &mut rng).unwrap();
//! let mut policy = TabularPolicy::new(4, 4, &mut rng).unwrap();
//!
//! let regularizer = KlRegularizer::new(0.1).unwrap();
//! let update = PpoClipUpdate::new(0.2, 0.01).unwrap();
//!
//! let trajectory = run_episode(&mut env, &reference, &policy, &regularizer, &mut rng);
//! let estimate = ReturnEstimate::compute(&trajectory.rewards(), 0.99);
//! update.apply(&mut policy, &trajectory, &estimate.advantages).unwrap();
//! ```

pub mod advantage;
pub mod kl;
pub mod ppo_clip;
pub mod rollout;

pub use advantage::{centered_advantages, discounted_returns, ReturnEstimate};
pub use kl::{kl_divergence, KlRegularizer, KL_EPSILON};
pub use ppo_clip::{clipped_surrogate, ClipObjective, PpoClipUpdate, UpdateStats, RATIO_EPSILON};
pub use rollout::{run_episode, Trajectory, TrajectoryStep};
