use config::{Config, ConfigError, Environment, File};
use hoops_ml::TrainingConfig;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Runner configuration, layered from defaults, files and `HOOPS_*` variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Where the game history lives.
    pub ledger: LedgerConfig,
    /// Training and reporting knobs.
    #[serde(default)]
    pub ml: TrainingConfig,
}

/// Game ledger source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// JSON array of games.
    pub games_path: PathBuf,
}

impl AppConfig {
    /// Build the configuration for the current `RUN_MODE`.
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
        let defaults = TrainingConfig::default();

        let config = Config::builder()
            .set_default("ledger.games_path", "data/games.json")?
            .set_default("ml.max_teams", defaults.max_teams as u64)?
            .set_default("ml.min_games", defaults.min_games as u64)?
            .set_default("ml.test_fraction", defaults.test_fraction)?
            .set_default("ml.seed", defaults.seed)?
            .set_default("ml.max_weight", defaults.max_weight)?
            .set_default("ml.lr_max_iter", defaults.lr_max_iter as u64)?
            .set_default("ml.lr_c", defaults.lr_c)?
            .set_default("ml.lr_tolerance", defaults.lr_tolerance)?
            .set_default("ml.n_trees", defaults.n_trees as u64)?
            .set_default("ml.report_max_columns", defaults.report_max_columns as u64)?
            .set_default("ml.top_features", defaults.top_features as u64)?
            .set_default("ml.top_teams", defaults.top_teams as u64)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(File::with_name("config/local").required(false))
            // HOOPS_ML__N_TREES=50 -> ml.n_trees
            .add_source(
                Environment::with_prefix("HOOPS")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Path of the games JSON file.
    pub fn games_path(&self) -> &PathBuf {
        &self.ledger.games_path
    }
}
