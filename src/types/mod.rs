use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};

use crate::error::{Result, TabularPpoError};

/// Trait for discrete state representations usable as a row of a weight table
pub trait State: Clone + Debug + Send + Sync {
    /// Flattened row index of this state in a table with `grid_size * grid_size` rows.
    ///
    /// Panics if the state lies outside the grid.
    fn index(&self, grid_size: usize) -> usize;
}

/// A cell of the grid, 0-indexed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridState {
    pub row: usize,
    pub column: usize,
}

impl GridState {
    pub fn new(row: usize, column: usize) -> Self {
        GridState { row, column }
    }

    /// Build a state, rejecting positions outside a `grid_size` x `grid_size` board
    pub fn checked(row: usize, column: usize, grid_size: usize) -> Result<Self> {
        if row >= grid_size || column >= grid_size {
            return Err(TabularPpoError::InvalidState { row, column, grid_size });
        }
        Ok(GridState { row, column })
    }

    pub fn in_bounds(&self, grid_size: usize) -> bool {
        self.row < grid_size && self.column < grid_size
    }

}

impl State for GridState {
    fn index(&self, grid_size: usize) -> usize {
        assert!(
            self.in_bounds(grid_size),
            "state {:?} outside {}x{} grid",
            self,
            grid_size,
            grid_size
        );
        self.row * grid_size + self.column
    }
}

impl From<(usize, usize)> for GridState {
    fn from((row, column): (usize, usize)) -> Self {
        GridState { row, column }
    }
}

impl fmt::Display for GridState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// The four grid moves, indexed in the order the weight table columns use
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GridAction {
    Up = 0,
    Down = 1,
    Left = 2,
    Right = 3,
}

impl GridAction {
    pub const COUNT: usize = 4;

    pub const ALL: [GridAction; 4] = [
        GridAction::Up,
        GridAction::Down,
        GridAction::Left,
        GridAction::Right,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

impl TryFrom<usize> for GridAction {
    type Error = TabularPpoError;

    fn try_from(index: usize) -> Result<Self> {
        GridAction::ALL
            .get(index)
            .copied()
            .ok_or(TabularPpoError::InvalidAction {
                action: index,
                max_actions: GridAction::COUNT,
            })
    }
}
