use tabular_ppo::{
    config::TrainingConfigBuilder,
    environment::{Environment, GridWorld},
    persistence::ModelStore,
    policy::TabularPolicy,
    trainer::Trainer,
    types::{GridAction, GridState},
};

const SEEDS: u64 = 8;
const EPISODES: usize = 150;

fn toward_goal_mass(policy: &TabularPolicy) -> f32 {
    let probs = policy.action_probabilities(&GridState::new(0, 0));
    probs[GridAction::Down.index()] + probs[GridAction::Right.index()]
}

#[test]
fn test_training_shifts_start_state_towards_goal() {
    let mut initial_mass = 0.0;
    let mut final_mass = 0.0;
    let mut early_lengths = 0.0;
    let mut late_lengths = 0.0;

    for seed in 0..SEEDS {
        let config = TrainingConfigBuilder::new()
            .grid_size(8)
            .episodes(EPISODES)
            .seed(seed)
            .log_interval(0)
            .save_model(false)
            .build()
            .unwrap();

        let mut trainer = Trainer::with_fresh_policies(GridWorld::new(8), config).unwrap();
        initial_mass += toward_goal_mass(trainer.policy());

        let history = trainer.train().unwrap();
        final_mass += toward_goal_mass(trainer.policy());

        early_lengths += history[..20].iter().map(|s| s.steps as f32).sum::<f32>() / 20.0;
        late_lengths += history[EPISODES - 20..].iter().map(|s| s.steps as f32).sum::<f32>() / 20.0;
    }

    let n = SEEDS as f32;
    let (initial_mass, final_mass) = (initial_mass / n, final_mass / n);
    let (early_lengths, late_lengths) = (early_lengths / n, late_lengths / n);

    // Small random initial weights give a near-uniform start
    assert!((initial_mass - 0.5).abs() < 0.01, "initial mass {}", initial_mass);
    assert!(final_mass > 0.55, "mass towards goal only {} after training", final_mass);
    assert!(
        late_lengths < 0.75 * early_lengths,
        "episodes did not get shorter: {} -> {}",
        early_lengths,
        late_lengths
    );
}

#[test]
fn test_train_save_load_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let config = TrainingConfigBuilder::new()
        .grid_size(8)
        .episodes(3)
        .seed(4)
        .model_dir(dir.path())
        .build()
        .unwrap();

    let mut trainer = Trainer::with_fresh_policies(GridWorld::new(8), config.clone()).unwrap();
    trainer.train().unwrap();

    let store = ModelStore::new(config.model_dir.clone());
    store.save(trainer.policy(), &config.model_name).unwrap();
    assert!(dir.path().join("rl_policy.bin").is_file());

    let restored = store.load_policy("rl_policy").unwrap();
    assert_eq!(restored.weights(), trainer.policy().weights());

    // Continue training from the restored weights
    let env = GridWorld::new(8);
    let reference = trainer.reference().clone();
    let mut resumed = Trainer::new(env, reference, restored, config).unwrap();
    resumed.train().unwrap();
    assert_eq!(resumed.policy().shape(), (64, 4));
}

#[test]
fn test_zero_beta_matches_unregularised_rewards() {
    let config = TrainingConfigBuilder::new()
        .grid_size(5)
        .beta(0.0)
        .episodes(5)
        .seed(12)
        .save_model(false)
        .build()
        .unwrap();

    let mut trainer = Trainer::with_fresh_policies(GridWorld::new(5), config).unwrap();
    for stats in trainer.train().unwrap() {
        assert_eq!(stats.raw_reward, stats.shaped_reward);
    }
}

#[test]
fn test_custom_environment_through_trait() {
    /// One-dimensional corridor folded into a 2x2 table; reaching cell 3 ends the episode
    struct Corridor {
        cell: usize,
    }

    impl Environment for Corridor {
        type State = GridState;

        fn reset(&mut self) -> GridState {
            self.cell = 0;
            GridState::new(0, 0)
        }

        fn step(&mut self, action: usize) -> tabular_ppo::Transition<GridState> {
            if action == GridAction::Right.index() {
                self.cell += 1;
            }
            let state = GridState::new(self.cell / 2, self.cell % 2);
            let done = self.cell == 3;
            tabular_ppo::Transition::new(state, if done { 1.0 } else { 0.0 }, done)
        }

        fn action_size(&self) -> usize {
            4
        }

        fn grid_size(&self) -> usize {
            2
        }
    }

    let config = TrainingConfigBuilder::new()
        .grid_size(2)
        .episodes(10)
        .seed(3)
        .save_model(false)
        .build()
        .unwrap();
    let mut trainer = Trainer::with_fresh_policies(Corridor { cell: 0 }, config).unwrap();
    let history = trainer.train().unwrap();
    assert!(history.iter().all(|s| s.steps >= 3));
    assert_eq!(trainer.policy().shape(), (4, 4));
}
