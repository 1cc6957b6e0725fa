// Prediction service

use chrono::NaiveDate;
use hoops_db::GameLedger;
use hoops_ml::{DualTrainer, FeatureBuilder, MatchPredictor, ModelRequest, TrainedModels, TrainingConfig, TrainingOutcome};
use hoops_models::{HoopsError, MatchProbabilities, PredictionRecord, Result, TeamCode};
use std::sync::Arc;
use tracing::{info, warn};

/// Train/predict facade over an injected ledger.
///
/// Every call rereads the full ledger and retrains; nothing is cached
/// between calls.
#[derive(Clone)]
pub struct PredictorService {
    ledger: Arc<dyn GameLedger>,
    config: TrainingConfig,
}

impl PredictorService {
    pub fn new(ledger: Arc<dyn GameLedger>, config: TrainingConfig) -> Self {
        Self { ledger, config }
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    pub fn train(&self, request: ModelRequest) -> Result<TrainingOutcome> {
        let games = self.ledger.list_games_ordered_by_date();
        info!("Training on {} ledger games", games.len());
        DualTrainer::new(self.config.clone()).train_games(&games, request)
    }

    /// Predict with handles from an earlier `train`. The ledger is only
    /// consulted to confirm there is usable history; the handles' own team
    /// universes define the feature columns.
    pub fn predict(
        &self,
        team1_code: &str,
        team2_code: &str,
        models: Option<&TrainedModels>,
    ) -> Result<MatchProbabilities> {
        let games = self.ledger.list_games_ordered_by_date();
        if FeatureBuilder::new(self.config.max_teams).build(&games).is_empty() {
            return Err(HoopsError::NoData);
        }
        MatchPredictor::new().predict(
            team1_code,
            team2_code,
            models.map(|m| &m.linear),
            models.map(|m| &m.forest),
        )
    }

    /// Validate a fixture, retrain with models and record the prediction.
    pub fn predict_fixture(&self, home: TeamCode, visitor: TeamCode, created_on: NaiveDate) -> Result<PredictionRecord> {
        if home == visitor {
            return Err(HoopsError::SameTeam(home.to_string()));
        }

        let outcome = self.train(ModelRequest::WithModels)?;
        let probabilities = self.predict(home.as_str(), visitor.as_str(), outcome.models.as_ref())?;
        if probabilities.lr_prob_team1_win().is_none() || probabilities.rf_prob_team1_win().is_none() {
            warn!("Prediction for {} vs {} is missing a model probability", home, visitor);
        }

        Ok(PredictionRecord::new(home, visitor, &probabilities, created_on))
    }

    /// Training metrics as a mapping, or `{"error": ...}` for insufficient data.
    pub fn train_report(&self) -> Result<serde_json::Value> {
        match self.train(ModelRequest::MetricsOnly) {
            Ok(outcome) => Ok(serde_json::to_value(&outcome.metrics)?),
            Err(e) if e.is_insufficient_data() => Ok(e.to_payload()),
            Err(e) => Err(e),
        }
    }

    /// Probability mapping for a pair of raw codes, retraining first.
    pub fn predict_report(&self, team1_code: &str, team2_code: &str) -> Result<serde_json::Value> {
        let result = self
            .train(ModelRequest::WithModels)
            .and_then(|outcome| self.predict(team1_code, team2_code, outcome.models.as_ref()));
        match result {
            Ok(probabilities) => Ok(serde_json::to_value(&probabilities)?),
            Err(e) if e.is_insufficient_data() => Ok(e.to_payload()),
            Err(e) => Err(e),
        }
    }
}
