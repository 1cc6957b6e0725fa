use serde::{Deserialize, Serialize};

/// Knobs for a training pass. Defaults reproduce the production setup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Width of the team universe (most frequent teams kept as columns).
    pub max_teams: usize,
    pub min_games: usize,
    pub test_fraction: f64,
    pub seed: u64,
    /// Weight reached by a team's most recent game; the earliest gets 1.0.
    pub max_weight: f64,
    pub lr_max_iter: usize,
    /// Inverse L2 regularisation strength.
    pub lr_c: f64,
    pub lr_tolerance: f64,
    pub n_trees: usize,
    /// Coefficient listings are only produced up to this many columns.
    pub report_max_columns: usize,
    pub top_features: usize,
    pub top_teams: usize,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            max_teams: 30,
            min_games: 50,
            test_fraction: 0.2,
            seed: 42,
            max_weight: 2.0,
            lr_max_iter: 1000,
            lr_c: 1.0,
            lr_tolerance: 1e-6,
            n_trees: 200,
            report_max_columns: 1000,
            top_features: 10,
            top_teams: 3,
        }
    }
}
