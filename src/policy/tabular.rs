use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand::Rng;

use crate::activations::safe_softmax;
use crate::error::{Result, TabularPpoError};
use crate::types::State;

/// Upper bound of the initial weights, drawn uniformly from `[0, INIT_SCALE)`
pub const INIT_SCALE: f32 = 0.01;

/// Softmax policy over a dense `(state_size, action_size)` weight table.
///
/// The table shape is fixed at construction. The only mutation path is
/// [`TabularPolicy::add_to_weight`], used by the PPO-clip update rule.
#[derive(Clone, Debug)]
pub struct TabularPolicy {
    grid_size: usize,
    action_size: usize,
    weights: Array2<f32>,
}

impl TabularPolicy {
    /// Create a policy with small positive random weights
    pub fn new<R: Rng>(grid_size: usize, action_size: usize, rng: &mut R) -> Result<Self> {
        if grid_size == 0 {
            return Err(TabularPpoError::invalid_parameter("grid_size", "must be at least 1"));
        }
        if action_size == 0 {
            return Err(TabularPpoError::invalid_parameter("action_size", "must be at least 1"));
        }

        let state_size = grid_size * grid_size;
        let weights = Array2::random_using(
            (state_size, action_size),
            Uniform::new(0.0, INIT_SCALE),
            rng,
        );

        Ok(TabularPolicy { grid_size, action_size, weights })
    }

    /// Rebuild a policy from a previously saved weight table
    pub fn from_weights(grid_size: usize, weights: Array2<f32>) -> Result<Self> {
        let state_size = grid_size * grid_size;
        let (rows, cols) = weights.dim();
        if grid_size == 0 || rows != state_size || cols == 0 {
            return Err(TabularPpoError::dimension_mismatch(
                format!("({}, >=1)", state_size),
                format!("({}, {})", rows, cols),
            ));
        }

        Ok(TabularPolicy { grid_size, action_size: cols, weights })
    }

    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    pub fn state_size(&self) -> usize {
        self.weights.nrows()
    }

    pub fn action_size(&self) -> usize {
        self.action_size
    }

    /// Shape of the weight table, always `(state_size, action_size)`
    pub fn shape(&self) -> (usize, usize) {
        self.weights.dim()
    }

    pub fn weights(&self) -> ArrayView2<'_, f32> {
        self.weights.view()
    }

    /// Preference scores of one state
    pub fn scores<S: State>(&self, state: &S) -> ArrayView1<'_, f32> {
        self.weights.row(self.row_index(state))
    }

    /// Action distribution for `state`; a pure function of the current weights
    pub fn action_probabilities<S: State>(&self, state: &S) -> Array1<f32> {
        safe_softmax(self.scores(state))
    }

    /// Draw one action from the state's distribution
    pub fn sample_action<S: State, R: Rng>(&self, state: &S, rng: &mut R) -> usize {
        let probs = self.action_probabilities(state);
        sample_categorical(&probs, rng)
    }

    /// Most probable action, ties resolved towards the lowest index
    pub fn greedy_action<S: State>(&self, state: &S) -> usize {
        let probs = self.action_probabilities(state);
        probs
            .iter()
            .enumerate()
            .fold((0, f32::NEG_INFINITY), |best, (i, &p)| if p > best.1 { (i, p) } else { best })
            .0
    }

    /// In-place additive update of a single weight
    pub(crate) fn add_to_weight(&mut self, state_index: usize, action: usize, delta: f32) {
        self.weights[[state_index, action]] += delta;
    }

    /// Replace the weight table with one of identical shape
    pub(crate) fn replace_weights(&mut self, weights: Array2<f32>) -> Result<()> {
        if weights.dim() != self.weights.dim() {
            return Err(TabularPpoError::dimension_mismatch(
                format!("{:?}", self.weights.dim()),
                format!("{:?}", weights.dim()),
            ));
        }
        self.weights = weights;
        Ok(())
    }

    pub(crate) fn row_index<S: State>(&self, state: &S) -> usize {
        let index = state.index(self.grid_size);
        assert!(index < self.state_size(), "state index {} out of range", index);
        index
    }
}

/// Sample an index from a probability vector by inverting the cumulative sum
fn sample_categorical<R: Rng>(probs: &Array1<f32>, rng: &mut R) -> usize {
    let mut cumsum = 0.0;
    let rand_val: f32 = rng.gen();

    for (i, &p) in probs.iter().enumerate() {
        cumsum += p;
        if rand_val < cumsum {
            return i;
        }
    }

    // Rounding can leave the total slightly below one
    probs.len() - 1
}
