//! Saving and loading policy weight tables.
//!
//! Tables are stored one file per name as `<dir>/<name>.bin`, bincode-encoded.
//! Only the table is written; the grid size is recovered from its row count
//! when a policy is rebuilt.

use ndarray::Array2;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{Result, TabularPpoError};
use crate::policy::TabularPolicy;

const EXTENSION: &str = "bin";

/// Directory-backed store of named weight tables
#[derive(Clone, Debug)]
pub struct ModelStore {
    dir: PathBuf,
}

impl ModelStore {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        ModelStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File a table with this name is stored in
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", name, EXTENSION))
    }

    pub fn exists(&self, name: &str) -> bool {
        self.path_for(name).is_file()
    }

    /// Write the policy's weight table, creating the directory if needed
    pub fn save(&self, policy: &TabularPolicy, name: &str) -> Result<PathBuf> {
        if name.is_empty() {
            return Err(TabularPpoError::invalid_parameter("name", "must not be empty"));
        }
        fs::create_dir_all(&self.dir)?;

        let path = self.path_for(name);
        let serialized = bincode::serialize(&policy.weights().to_owned())?;
        fs::write(&path, serialized)?;
        info!(path = %path.display(), shape = ?policy.shape(), "model saved");
        Ok(path)
    }

    /// Read a weight table back
    pub fn load(&self, name: &str) -> Result<Array2<f32>> {
        let path = self.path_for(name);
        let data = fs::read(&path)?;
        let weights: Array2<f32> = bincode::deserialize(&data)?;
        info!(path = %path.display(), shape = ?weights.dim(), "model loaded");
        Ok(weights)
    }

    /// Replace an existing policy's weights; the stored table must have the same shape
    pub fn load_into(&self, policy: &mut TabularPolicy, name: &str) -> Result<()> {
        let weights = self.load(name)?;
        policy.replace_weights(weights)
    }

    /// Rebuild a policy from a stored table
    pub fn load_policy(&self, name: &str) -> Result<TabularPolicy> {
        let weights = self.load(name)?;
        let rows = weights.nrows();
        let grid_size = (rows as f64).sqrt().round() as usize;
        if grid_size * grid_size != rows {
            return Err(TabularPpoError::dimension_mismatch(
                "a square number of rows".to_string(),
                rows.to_string(),
            ));
        }
        TabularPolicy::from_weights(grid_size, weights)
    }
}
