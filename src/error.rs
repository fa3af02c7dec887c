use thiserror::Error;

/// Result type for tabular PPO operations
pub type Result<T> = std::result::Result<T, TabularPpoError>;

/// Main error type for the tabular PPO library
#[derive(Error, Debug)]
pub enum TabularPpoError {
    /// Invalid dimensions for operations
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        expected: String,
        actual: String,
    },

    /// Invalid parameter value
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter {
        name: String,
        reason: String,
    },

    /// Grid position outside the board
    #[error("Invalid state ({row}, {column}): must lie inside a {grid_size}x{grid_size} grid")]
    InvalidState {
        row: usize,
        column: usize,
        grid_size: usize,
    },

    /// Invalid action
    #[error("Invalid action {action}: must be less than {max_actions}")]
    InvalidAction {
        action: usize,
        max_actions: usize,
    },

    /// Update rule invoked on an episode with no steps
    #[error("Empty trajectory: {0}")]
    EmptyTrajectory(String),

    /// IO errors (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Binary (de)serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    /// JSON (de)serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Tracing subscriber setup failed
    #[error("Logging error: {0}")]
    Logging(String),
}

// Helper functions for common error patterns
impl TabularPpoError {
    pub fn dimension_mismatch<S: Into<String>>(expected: S, actual: S) -> Self {
        TabularPpoError::DimensionMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn invalid_parameter<S: Into<String>>(name: S, reason: S) -> Self {
        TabularPpoError::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TabularPpoError::invalid_parameter("epsilon", "must lie in (0, 1)");
        assert_eq!(err.to_string(), "Invalid parameter 'epsilon': must lie in (0, 1)");

        let err = TabularPpoError::InvalidState { row: 9, column: 0, grid_size: 8 };
        assert!(err.to_string().contains("(9, 0)"));
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: TabularPpoError = io.into();
        assert!(matches!(err, TabularPpoError::Io(_)));
    }
}
