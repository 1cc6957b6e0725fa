// Dual-model training

use hoops_models::{
    FeatureReport, FeatureScore, Game, HoopsError, Result, TeamStrength, TopFeatures, TrainingMetrics,
};
use ndarray::{Array1, Axis};
use tracing::{debug, info, warn};
use crate::config::TrainingConfig;
use crate::evaluation::{accuracy, roc_auc};
use crate::features::{FeatureBuilder, FeatureFrame, TeamUniverse};
use crate::forest::{RandomForestModel, RandomForestParams};
use crate::models::{LogisticRegressionModel, LogisticRegressionParams, ModelHandle, ProbabilityModel};
use crate::split::stratified_split;
use crate::weighting::RecencyWeighter;

pub type LinearHandle = ModelHandle<LogisticRegressionModel>;
pub type ForestHandle = ModelHandle<RandomForestModel>;

/// Whether a training pass hands back the fitted models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelRequest {
    #[default]
    MetricsOnly,
    WithModels,
}

#[derive(Debug)]
pub struct TrainedModels {
    pub linear: LinearHandle,
    pub forest: ForestHandle,
}

#[derive(Debug)]
pub struct TrainingOutcome {
    pub metrics: TrainingMetrics,
    /// Present only for `ModelRequest::WithModels`.
    pub models: Option<TrainedModels>,
}

pub struct DualTrainer {
    config: TrainingConfig,
}

impl DualTrainer {
    pub fn new(config: TrainingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Build features from raw games, then train.
    pub fn train_games(&self, games: &[Game], request: ModelRequest) -> Result<TrainingOutcome> {
        let frame = FeatureBuilder::new(self.config.max_teams).build(games);
        self.train(&frame, request)
    }

    pub fn train(&self, frame: &FeatureFrame, request: ModelRequest) -> Result<TrainingOutcome> {
        if frame.is_empty() {
            return Err(HoopsError::NoData);
        }
        let n = frame.n_rows();
        if n < self.config.min_games {
            return Err(HoopsError::NotEnoughGames {
                found: n,
                required: self.config.min_games,
            });
        }

        let weights = RecencyWeighter::new(self.config.max_weight).weights(&frame.rows, &frame.universe);
        let split = stratified_split(&frame.labels, self.config.test_fraction, self.config.seed)?;
        debug!(
            "Split {} rows into {} train / {} test",
            n,
            split.train.len(),
            split.test.len()
        );

        let x_train = frame.matrix.select(Axis(0), &split.train);
        let y_train = frame.labels.select(Axis(0), &split.train);
        let w_train = weights.select(Axis(0), &split.train);
        let x_test = frame.matrix.select(Axis(0), &split.test);
        let y_test = frame.labels.select(Axis(0), &split.test);

        let linear = LogisticRegressionParams {
            c: self.config.lr_c,
            max_iter: self.config.lr_max_iter,
            tolerance: self.config.lr_tolerance,
        }
        .fit(&x_train, &y_train, &w_train)?;

        let forest = RandomForestParams {
            n_trees: self.config.n_trees,
            seed: self.config.seed,
            max_depth: None,
            max_features: None,
        }
        .fit(&x_train, &y_train, &w_train)?;

        let lr_probs = linear.predict_proba(&x_test)?;
        let rf_probs = forest.predict_proba(&x_test)?;

        let metrics = TrainingMetrics {
            lr_accuracy: accuracy(&lr_probs, &y_test),
            lr_auc: roc_auc(&lr_probs, &y_test),
            rf_accuracy: accuracy(&rf_probs, &y_test),
            rf_auc: roc_auc(&rf_probs, &y_test),
            n_train: split.train.len(),
            n_test: split.test.len(),
            feature_report: self.feature_report(
                linear.coefficients(),
                &forest.feature_importances(),
                &frame.universe,
            ),
            top3_teams: team_strengths(frame, self.config.top_teams),
        };

        info!(
            "Trained on {} games ({} teams): lr_accuracy={:.3} rf_accuracy={:.3}",
            metrics.n_train,
            frame.universe.len(),
            metrics.lr_accuracy,
            metrics.rf_accuracy
        );

        let models = match request {
            ModelRequest::WithModels => Some(TrainedModels {
                linear: ModelHandle::new(linear, frame.universe.clone()),
                forest: ModelHandle::new(forest, frame.universe.clone()),
            }),
            ModelRequest::MetricsOnly => None,
        };

        Ok(TrainingOutcome { metrics, models })
    }

    /// Falls back to `Skipped` when either listing does not line up with the universe.
    fn feature_report(
        &self,
        coefficients: &Array1<f64>,
        importances: &Array1<f64>,
        universe: &TeamUniverse,
    ) -> FeatureReport {
        if coefficients.len() != universe.len() || importances.len() != universe.len() {
            let reason = format!(
                "{} coefficients and {} importances for {} teams",
                coefficients.len(),
                importances.len(),
                universe.len()
            );
            warn!("Skipping feature report: {}", reason);
            return FeatureReport::Skipped { reason };
        }

        let lr_top_features = (universe.len() <= self.config.report_max_columns)
            .then(|| top_scores(universe, &coefficients.mapv(f64::abs), self.config.top_features));

        FeatureReport::Reported {
            lr_top_features,
            rf_top_features: top_scores(universe, importances, self.config.top_features),
        }
    }
}

/// The `limit` highest-scoring teams, ties in universe order.
fn top_scores(universe: &TeamUniverse, scores: &Array1<f64>, limit: usize) -> TopFeatures {
    let mut ranked: Vec<FeatureScore> = universe
        .teams()
        .iter()
        .zip(scores.iter())
        .map(|(&team, &score)| FeatureScore { team, score })
        .collect();
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked.truncate(limit);
    TopFeatures(ranked)
}

/// Empirical win rate of every universe team over the whole frame, best first.
pub fn team_strengths(frame: &FeatureFrame, limit: usize) -> Vec<TeamStrength> {
    let mut strengths: Vec<TeamStrength> = frame
        .universe
        .teams()
        .iter()
        .filter_map(|&team| {
            let results: Vec<bool> = frame.rows.iter().filter_map(|row| row.won_by(team)).collect();
            if results.is_empty() {
                return None;
            }
            let wins = results.iter().filter(|&&won| won).count();
            Some(TeamStrength {
                team,
                win_prob: wins as f64 / results.len() as f64,
            })
        })
        .collect();
    strengths.sort_by(|a, b| b.win_prob.total_cmp(&a.win_prob));
    strengths.truncate(limit);
    strengths
}
