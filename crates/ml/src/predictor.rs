// Single-match inference

use hoops_models::{HoopsError, MatchProbabilities, ModelProbability, Result, TeamCode};
use tracing::debug;
use crate::models::{ModelHandle, ProbabilityModel};
use crate::training::{ForestHandle, LinearHandle, TrainedModels};

/// Turns two team codes into per-model team1 win probabilities.
///
/// Each handle rebuilds the indicator row against its own frozen universe.
/// Codes that are not league teams, or not in that universe, are treated as
/// carrying no signal. Identical codes are not rejected here.
#[derive(Debug, Default, Clone, Copy)]
pub struct MatchPredictor;

impl MatchPredictor {
    pub fn new() -> Self {
        Self
    }

    pub fn predict(
        &self,
        team1_code: &str,
        team2_code: &str,
        linear: Option<&LinearHandle>,
        forest: Option<&ForestHandle>,
    ) -> Result<MatchProbabilities> {
        if linear.is_some_and(|h| h.universe().is_empty()) || forest.is_some_and(|h| h.universe().is_empty()) {
            return Err(HoopsError::NoData);
        }

        let team1 = TeamCode::from_code(team1_code);
        let team2 = TeamCode::from_code(team2_code);
        debug!("Predicting {} vs {} (parsed {:?} vs {:?})", team1_code, team2_code, team1, team2);

        Ok(MatchProbabilities {
            team1: team1_code.to_string(),
            team2: team2_code.to_string(),
            linear: Self::probability(linear, team1, team2),
            forest: Self::probability(forest, team1, team2),
        })
    }

    pub fn predict_with(&self, team1_code: &str, team2_code: &str, models: &TrainedModels) -> Result<MatchProbabilities> {
        self.predict(team1_code, team2_code, Some(&models.linear), Some(&models.forest))
    }

    fn probability<M: ProbabilityModel>(
        handle: Option<&ModelHandle<M>>,
        team1: Option<TeamCode>,
        team2: Option<TeamCode>,
    ) -> ModelProbability {
        handle.map_or(ModelProbability::NotSupplied, |h| h.probability(team1, team2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TrainingConfig;
    use crate::features::TeamUniverse;
    use crate::models::LogisticRegressionModel;
    use crate::training::{DualTrainer, ModelRequest};
    use chrono::{Duration, NaiveDate};
    use hoops_models::Game;
    use ndarray::array;

    fn trained() -> TrainedModels {
        use TeamCode::*;
        let teams = [Bos, Lal, Mia, Det];
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let mut games = Vec::new();
        // Stronger side always hosts and wins nine meetings in ten.
        for round in 0..10 {
            for (i, &home) in teams.iter().enumerate() {
                for (j, &visitor) in teams.iter().enumerate().skip(i + 1) {
                    let id = games.len();
                    let upset = (round + i + j) % 10 == 0;
                    let (hs, vs) = if upset { (99, 105) } else { (105, 99) };
                    games.push(Game::new(format!("g{id}"), start + Duration::days(id as i64), home, visitor, hs, vs));
                }
            }
        }
        let config = TrainingConfig { n_trees: 20, ..TrainingConfig::default() };
        DualTrainer::new(config)
            .train_games(&games, ModelRequest::WithModels)
            .unwrap()
            .models
            .unwrap()
    }

    #[test]
    fn test_predicts_both_models() {
        let models = trained();
        let probs = MatchPredictor::new().predict_with("BOS", "DET", &models).unwrap();

        assert!(probs.lr_prob_team1_win().unwrap() > 0.5);
        assert!((0.0..=1.0).contains(&probs.rf_prob_team1_win().unwrap()));
    }

    #[test]
    fn test_is_deterministic() {
        let models = trained();
        let predictor = MatchPredictor::new();
        let a = predictor.predict_with("LAL", "MIA", &models).unwrap();
        let b = predictor.predict_with("LAL", "MIA", &models).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_unknown_codes_do_not_fail() {
        let models = trained();
        let probs = MatchPredictor::new().predict_with("XXX", "LAL", &models).unwrap();
        assert!(probs.lr_prob_team1_win().is_some());
        assert!(probs.rf_prob_team1_win().is_some());

        // Known league team outside the universe behaves like an unknown code.
        let outside = MatchPredictor::new().predict_with("GSW", "LAL", &models).unwrap();
        assert_eq!(outside.linear, probs.linear);
    }

    #[test]
    fn test_missing_handles_are_not_supplied() {
        let models = trained();
        let probs = MatchPredictor::new()
            .predict("BOS", "LAL", Some(&models.linear), None)
            .unwrap();
        assert!(probs.forest.is_not_supplied());
        assert!(probs.lr_prob_team1_win().is_some());

        let none = MatchPredictor::new().predict("BOS", "LAL", None, None).unwrap();
        assert!(none.linear.is_not_supplied() && none.forest.is_not_supplied());
    }

    #[test]
    fn test_empty_universe_is_no_data() {
        let model = LogisticRegressionModel::params()
            .fit(&array![[1.0], [0.0]], &array![true, false], &array![1.0, 1.0])
            .unwrap();
        let handle = ModelHandle::new(model, TeamUniverse::default());
        let err = MatchPredictor::new().predict("BOS", "LAL", Some(&handle), None).unwrap_err();
        assert!(matches!(err, HoopsError::NoData));
    }
}
