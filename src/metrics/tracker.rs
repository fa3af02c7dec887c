use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::path::Path;

/// Summary of one training episode
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpisodeStats {
    /// 1-based episode number across the trainer's lifetime
    pub episode: usize,
    /// Sum of environment rewards
    pub raw_reward: f32,
    /// Sum of KL-shaped rewards
    pub shaped_reward: f32,
    pub steps: usize,
    pub mean_kl: f32,
    /// Steps of the update pass whose ratio fell outside the clip band
    pub clipped_steps: usize,
}

/// Stores training metrics over time
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrainingMetrics {
    /// Raw rewards per episode
    pub episode_rewards: VecDeque<f32>,

    /// Shaped rewards per episode
    pub shaped_rewards: VecDeque<f32>,

    /// Episode lengths
    pub episode_lengths: VecDeque<usize>,

    /// Mean per-step KL divergence per episode
    pub mean_kls: VecDeque<f32>,

    /// Fraction of clipped updates per episode
    pub clip_fractions: VecDeque<f32>,
}

impl TrainingMetrics {
    pub fn new(history_size: usize) -> Self {
        TrainingMetrics {
            episode_rewards: VecDeque::with_capacity(history_size),
            shaped_rewards: VecDeque::with_capacity(history_size),
            episode_lengths: VecDeque::with_capacity(history_size),
            mean_kls: VecDeque::with_capacity(history_size),
            clip_fractions: VecDeque::with_capacity(history_size),
        }
    }
}

fn push_bounded<T>(queue: &mut VecDeque<T>, value: T, history_size: usize) {
    if queue.len() >= history_size {
        queue.pop_front();
    }
    queue.push_back(value);
}

fn trim_front<T>(queue: &mut VecDeque<T>, history_size: usize) {
    while queue.len() > history_size {
        queue.pop_front();
    }
}

fn tail_mean<'a, I>(values: I, len: usize, window: usize) -> Option<f32>
where
    I: DoubleEndedIterator<Item = &'a f32>,
{
    if len == 0 || window == 0 {
        return None;
    }
    let n = window.min(len);
    let sum: f32 = values.rev().take(n).sum();
    Some(sum / n as f32)
}

/// Tracks metrics during training with a bounded history
pub struct MetricsTracker {
    metrics: TrainingMetrics,
    history_size: usize,
    episode_count: usize,
    total_steps: usize,
}

impl MetricsTracker {
    pub fn new(history_size: usize) -> Self {
        let history_size = history_size.max(1);
        MetricsTracker {
            metrics: TrainingMetrics::new(history_size),
            history_size,
            episode_count: 0,
            total_steps: 0,
        }
    }

    /// Record a finished episode
    pub fn record_episode(&mut self, stats: &EpisodeStats) {
        let h = self.history_size;
        push_bounded(&mut self.metrics.episode_rewards, stats.raw_reward, h);
        push_bounded(&mut self.metrics.shaped_rewards, stats.shaped_reward, h);
        push_bounded(&mut self.metrics.episode_lengths, stats.steps, h);
        push_bounded(&mut self.metrics.mean_kls, stats.mean_kl, h);
        let clip_fraction = if stats.steps == 0 {
            0.0
        } else {
            stats.clipped_steps as f32 / stats.steps as f32
        };
        push_bounded(&mut self.metrics.clip_fractions, clip_fraction, h);

        self.episode_count += 1;
        self.total_steps += stats.steps;
    }

    /// Get a reference to the metrics
    pub fn metrics(&self) -> &TrainingMetrics {
        &self.metrics
    }

    pub fn episode_count(&self) -> usize {
        self.episode_count
    }

    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    /// Mean raw reward over the last `window` episodes
    pub fn avg_raw_reward(&self, window: usize) -> Option<f32> {
        tail_mean(self.metrics.episode_rewards.iter(), self.metrics.episode_rewards.len(), window)
    }

    /// Mean shaped reward over the last `window` episodes
    pub fn avg_shaped_reward(&self, window: usize) -> Option<f32> {
        tail_mean(self.metrics.shaped_rewards.iter(), self.metrics.shaped_rewards.len(), window)
    }

    /// Mean episode length over the last `window` episodes
    pub fn avg_episode_length(&self, window: usize) -> Option<f32> {
        let lengths = &self.metrics.episode_lengths;
        if lengths.is_empty() || window == 0 {
            return None;
        }
        let n = window.min(lengths.len());
        let sum: usize = lengths.iter().rev().take(n).sum();
        Some(sum as f32 / n as f32)
    }

    /// Clear all metrics
    pub fn clear(&mut self) {
        self.metrics = TrainingMetrics::new(self.history_size);
        self.episode_count = 0;
        self.total_steps = 0;
    }

    /// Save metrics to file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> crate::error::Result<()> {
        let serialized = serde_json::to_string_pretty(&self.metrics)?;
        std::fs::write(path, serialized)?;
        Ok(())
    }

    /// Load metrics from file, replacing the current history.
    ///
    /// Counters restart from the loaded episodes; queues longer than this
    /// tracker's history keep only their newest entries.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> crate::error::Result<()> {
        let data = std::fs::read_to_string(path)?;
        let mut metrics: TrainingMetrics = serde_json::from_str(&data)?;

        self.episode_count = metrics.episode_lengths.len();
        self.total_steps = metrics.episode_lengths.iter().sum();

        let h = self.history_size;
        trim_front(&mut metrics.episode_rewards, h);
        trim_front(&mut metrics.shaped_rewards, h);
        trim_front(&mut metrics.episode_lengths, h);
        trim_front(&mut metrics.mean_kls, h);
        trim_front(&mut metrics.clip_fractions, h);
        self.metrics = metrics;
        Ok(())
    }
}

impl Default for MetricsTracker {
    fn default() -> Self {
        Self::new(1000)
    }
}
