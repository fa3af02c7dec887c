//! # tabular-ppo - Policy-Gradient Training for Tabular Grid Policies
//!
//! Trains a tabular softmax policy to walk a grid world towards its goal using
//! REINFORCE with a PPO-style clipped surrogate objective and a KL penalty against
//! a fixed reference policy.
//!
//! ## Key Features
//!
//! - **Tabular policies**: one row of preference scores per grid cell, safe softmax over actions
//! - **KL-regularised rewards**: each step reward is reduced by `beta * KL(trained || reference)`
//! - **PPO-clip updates**: probability ratios clipped to `[1 - epsilon, 1 + epsilon]`,
//!   applied per timestep in episode order
//! - **Reproducible**: every random draw goes through an injected, seedable generator
//! - **Persistence**: weight tables saved and restored by name
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tabular_ppo::config::TrainingConfigBuilder;
//! use tabular_ppo::environment::GridWorld;
//! use tabular_ppo::persistence::ModelStore;
//! use tabular_ppo::trainer::Trainer;
//!
//! let config = TrainingConfigBuilder::new()
//!     .grid_size(8)
//!     .episodes(1000)
//!     .seed(42)
//!     .build()
//!     .unwrap();
//!
//! let env = GridWorld::new(config.grid_size);
//! let mut trainer = Trainer::with_fresh_policies(env, config).unwrap();
//! trainer.train().unwrap();
//!
//! ModelStore::new("models").save(trainer.policy(), "rl_policy").unwrap();
//! ```
//!
//! ## Module Organization
//!
//! - [`activations`] - Safe softmax with uniform fallback
//! - [`algorithms`] - Rollout, KL regulariser, return/advantage estimation, PPO-clip update
//! - [`config`] - Training configuration and builder
//! - [`environment`] - Environment trait and the grid world
//! - [`error`] - Error types and result handling
//! - [`logging`] - Tracing subscriber setup
//! - [`metrics`] - Per-episode statistics
//! - [`persistence`] - Saving and loading weight tables
//! - [`policy`] - Tabular softmax policy
//! - [`trainer`] - Episode loop
//! - [`types`] - Grid states and actions

pub mod activations;
pub mod algorithms;
pub mod config;
pub mod environment;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod persistence;
pub mod policy;
pub mod trainer;
pub mod types;

pub use config::{TrainingConfig, TrainingConfigBuilder};
pub use environment::{Environment, GridWorld, Transition};
pub use error::{Result, TabularPpoError};
pub use policy::TabularPolicy;
pub use trainer::Trainer;
pub use types::{GridAction, GridState};
