use std::path::Path;
use std::process::ExitCode;

use tabular_ppo::environment::GridWorld;
use tabular_ppo::logging::init_tracing;
use tabular_ppo::persistence::ModelStore;
use tabular_ppo::{Result, Trainer, TrainingConfig};
use tracing::{error, info};

const LOG_DIR: &str = "logs";

fn run() -> Result<()> {
    // Optional first argument: path to a JSON config
    let config = match std::env::args().nth(1) {
        Some(path) => TrainingConfig::from_json_file(path)?,
        None => TrainingConfig::default(),
    };

    let log_file = init_tracing(Some(Path::new(LOG_DIR)))?;
    if let Some(path) = log_file {
        info!(path = %path.display(), "logging to file");
    }

    let env = GridWorld::new(config.grid_size);
    let mut trainer = Trainer::with_fresh_policies(env, config.clone())?;
    trainer.train()?;

    let (path, reached) = trainer.greedy_path(config.state_size() * 2);
    info!(steps = path.len() - 1, reached_goal = reached, "greedy rollout after training");

    if config.save_model {
        let store = ModelStore::new(config.model_dir.clone());
        store.save(trainer.policy(), &config.model_name)?;
    }

    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("training failed: {}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
