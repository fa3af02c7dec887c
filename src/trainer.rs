use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::algorithms::{run_episode, KlRegularizer, PpoClipUpdate, ReturnEstimate};
use crate::config::TrainingConfig;
use crate::environment::Environment;
use crate::error::{Result, TabularPpoError};
use crate::metrics::{EpisodeStats, MetricsTracker};
use crate::policy::TabularPolicy;

/// Episode loop for REINFORCE with PPO-clip and a KL penalty.
///
/// Owns the environment, the fixed reference policy, and the trained policy.
/// Episodes run strictly one after another: each rollout uses the weights left
/// by the previous episode's update.
pub struct Trainer<E: Environment> {
    env: E,
    reference: TabularPolicy,
    policy: TabularPolicy,
    config: TrainingConfig,
    regularizer: KlRegularizer,
    update_rule: PpoClipUpdate,
    rng: StdRng,
    metrics: MetricsTracker,
    episodes_run: usize,
}

impl<E: Environment> Trainer<E> {
    /// Create a trainer; the config and both policies must match the environment's table shape
    pub fn new(
        env: E,
        reference: TabularPolicy,
        policy: TabularPolicy,
        config: TrainingConfig,
    ) -> Result<Self> {
        config.validate()?;
        check_config_matches(&config, &env)?;

        let expected = (env.state_size(), env.action_size());
        for (name, p) in [("reference", &reference), ("policy", &policy)] {
            if p.shape() != expected || p.grid_size() != env.grid_size() {
                return Err(TabularPpoError::dimension_mismatch(
                    format!("{} table {:?}", name, expected),
                    format!("{:?}", p.shape()),
                ));
            }
        }

        let regularizer = KlRegularizer::new(config.beta)?;
        let update_rule = PpoClipUpdate::new(config.epsilon, config.learning_rate)?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Trainer {
            env,
            reference,
            policy,
            config,
            regularizer,
            update_rule,
            rng,
            metrics: MetricsTracker::default(),
            episodes_run: 0,
        })
    }

    /// Create fresh reference and trained policies from the config's seed and
    /// build a trainer around them
    pub fn with_fresh_policies(env: E, config: TrainingConfig) -> Result<Self> {
        config.validate()?;
        check_config_matches(&config, &env)?;
        let mut init_rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(1)),
            None => StdRng::from_entropy(),
        };
        let reference = TabularPolicy::new(env.grid_size(), env.action_size(), &mut init_rng)?;
        let policy = TabularPolicy::new(env.grid_size(), env.action_size(), &mut init_rng)?;
        Self::new(env, reference, policy, config)
    }

    pub fn policy(&self) -> &TabularPolicy {
        &self.policy
    }

    pub fn reference(&self) -> &TabularPolicy {
        &self.reference
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    pub fn metrics(&self) -> &MetricsTracker {
        &self.metrics
    }

    pub fn episodes_run(&self) -> usize {
        self.episodes_run
    }

    /// Rollout, return estimation, then the sequential weight update, for one episode
    pub fn train_episode(&mut self) -> Result<EpisodeStats> {
        let trajectory = run_episode(
            &mut self.env,
            &self.reference,
            &self.policy,
            &self.regularizer,
            &mut self.rng,
        );

        let estimate = ReturnEstimate::compute(&trajectory.rewards(), self.config.gamma);
        let update = self
            .update_rule
            .apply(&mut self.policy, &trajectory, &estimate.advantages)?;

        self.episodes_run += 1;
        let stats = EpisodeStats {
            episode: self.episodes_run,
            raw_reward: trajectory.total_raw_reward(),
            shaped_reward: trajectory.total_reward(),
            steps: trajectory.len(),
            mean_kl: trajectory.mean_kl(),
            clipped_steps: update.clipped_steps,
        };
        self.metrics.record_episode(&stats);

        if self.config.log_interval > 0 && stats.episode % self.config.log_interval == 0 {
            info!(
                episode = stats.episode,
                total_reward = stats.shaped_reward,
                raw_reward = stats.raw_reward,
                steps = stats.steps,
                mean_kl = stats.mean_kl,
                "Episode {}, Total Reward: {}",
                stats.episode,
                stats.shaped_reward
            );
        } else {
            debug!(episode = stats.episode, total_reward = stats.shaped_reward, "episode finished");
        }

        Ok(stats)
    }

    /// Run `config.episodes` episodes. Calling again continues from the current weights.
    pub fn train(&mut self) -> Result<Vec<EpisodeStats>> {
        let episodes = self.config.episodes;
        info!(
            episodes,
            grid_size = self.env.grid_size(),
            beta = self.config.beta,
            epsilon = self.config.epsilon,
            gamma = self.config.gamma,
            learning_rate = self.config.learning_rate,
            "starting training"
        );

        let mut history = Vec::with_capacity(episodes);
        for _ in 0..episodes {
            history.push(self.train_episode()?);
        }

        if let Some(avg) = self.metrics.avg_raw_reward(100) {
            info!(episodes_run = self.episodes_run, avg_raw_reward_last_100 = avg, "training finished");
        }
        Ok(history)
    }

    /// Follow the most probable action from the start state for at most `max_steps`
    /// steps. Returns the visited states (start included) and whether the episode ended.
    pub fn greedy_path(&mut self, max_steps: usize) -> (Vec<E::State>, bool) {
        let mut state = self.env.reset();
        let mut path = vec![state.clone()];

        for _ in 0..max_steps {
            let action = self.policy.greedy_action(&state);
            let transition = self.env.step(action);
            state = transition.next_state;
            path.push(state.clone());
            if transition.done {
                return (path, true);
            }
        }

        (path, false)
    }
}

fn check_config_matches<E: Environment>(config: &TrainingConfig, env: &E) -> Result<()> {
    if config.grid_size != env.grid_size() || config.action_size != env.action_size() {
        return Err(TabularPpoError::dimension_mismatch(
            format!("grid {} with {} actions", env.grid_size(), env.action_size()),
            format!("config grid {} with {} actions", config.grid_size, config.action_size),
        ));
    }
    Ok(())
}
