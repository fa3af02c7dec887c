use serde::Serialize;

use super::{Environment, Transition};
use crate::error::Result;
use crate::types::{GridAction, GridState};

/// Reward for the move that lands on the goal
pub const GOAL_REWARD: f32 = 10.0;
/// Reward for every other move, including moves blocked by the boundary
pub const STEP_REWARD: f32 = -1.0;

/// Square grid where the agent walks from the top-left corner to the bottom-right one.
///
/// Moves that would leave the grid keep the agent in place. Reaching the goal ends
/// the episode. Start and goal are fixed at construction.
#[derive(Clone, Debug, Serialize)]
pub struct GridWorld {
    size: usize,
    start: GridState,
    goal: GridState,
    agent_pos: GridState,
}

impl GridWorld {
    pub fn new(size: usize) -> Self {
        let start = GridState::new(0, 0);
        GridWorld {
            size,
            start,
            goal: GridState::new(size.saturating_sub(1), size.saturating_sub(1)),
            agent_pos: start,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn start(&self) -> GridState {
        self.start
    }

    pub fn goal(&self) -> GridState {
        self.goal
    }

    pub fn position(&self) -> GridState {
        self.agent_pos
    }

    /// Teleport the agent, e.g. to set up a specific transition in tests
    pub fn set_position(&mut self, row: usize, column: usize) -> Result<()> {
        self.agent_pos = GridState::checked(row, column, self.size)?;
        Ok(())
    }

    fn apply(&self, pos: GridState, action: GridAction) -> GridState {
        let last = self.size.saturating_sub(1);
        match action {
            GridAction::Up => GridState::new(pos.row.saturating_sub(1), pos.column),
            GridAction::Down => GridState::new((pos.row + 1).min(last), pos.column),
            GridAction::Left => GridState::new(pos.row, pos.column.saturating_sub(1)),
            GridAction::Right => GridState::new(pos.row, (pos.column + 1).min(last)),
        }
    }
}

impl Default for GridWorld {
    fn default() -> Self {
        GridWorld::new(8)
    }
}

impl Environment for GridWorld {
    type State = GridState;

    fn reset(&mut self) -> GridState {
        self.agent_pos = self.start;
        self.agent_pos
    }

    fn step(&mut self, action: usize) -> Transition<GridState> {
        // Unknown action indices leave the agent where it is
        if let Ok(action) = GridAction::try_from(action) {
            self.agent_pos = self.apply(self.agent_pos, action);
        }

        let done = self.agent_pos == self.goal;
        let reward = if done { GOAL_REWARD } else { STEP_REWARD };
        Transition::new(self.agent_pos, reward, done)
    }

    fn action_size(&self) -> usize {
        GridAction::COUNT
    }

    fn grid_size(&self) -> usize {
        self.size
    }
}
