/// Discounted returns `G_t = r_t + gamma * G_{t+1}` with `G_T = 0`, in forward time order.
pub fn discounted_returns(rewards: &[f32], gamma: f32) -> Vec<f32> {
    let mut returns = vec![0.0; rewards.len()];
    let mut g = 0.0;

    for i in (0..rewards.len()).rev() {
        g = rewards[i] + gamma * g;
        returns[i] = g;
    }

    returns
}

/// Returns centred on their own episode mean.
///
/// The baseline is the mean return of the same episode, not a learned value
/// function or a running average across episodes.
pub fn centered_advantages(returns: &[f32]) -> Vec<f32> {
    if returns.is_empty() {
        return Vec::new();
    }

    let mean = returns.iter().sum::<f32>() / returns.len() as f32;
    returns.iter().map(|&g| g - mean).collect()
}

/// Per-timestep returns and advantages of one episode
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReturnEstimate {
    pub returns: Vec<f32>,
    pub advantages: Vec<f32>,
}

impl ReturnEstimate {
    pub fn compute(rewards: &[f32], gamma: f32) -> Self {
        let returns = discounted_returns(rewards, gamma);
        let advantages = centered_advantages(&returns);
        ReturnEstimate { returns, advantages }
    }

    pub fn len(&self) -> usize {
        self.returns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.returns.is_empty()
    }
}
