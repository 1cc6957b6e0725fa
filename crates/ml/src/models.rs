// Machine learning models

use hoops_models::{HoopsError, ModelProbability, Result, TeamCode};
use nalgebra::{DMatrix, DVector};
use ndarray::{Array1, Array2, Axis};
use tracing::{debug, warn};
use crate::features::TeamUniverse;

pub trait ProbabilityModel: Send + Sync {
    fn model_name(&self) -> &str;

    /// Number of columns the model was fitted on.
    fn n_features(&self) -> usize;

    /// Probability of the positive class (team1 wins) for every row.
    fn predict_proba(&self, records: &Array2<f64>) -> Result<Array1<f64>>;

    fn check_width(&self, records: &Array2<f64>) -> Result<()> {
        if records.ncols() == self.n_features() {
            Ok(())
        } else {
            Err(HoopsError::PredictionFailed {
                reason: format!(
                    "{} expects {} columns, got {}",
                    self.model_name(),
                    self.n_features(),
                    records.ncols()
                ),
            })
        }
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// `ln(1 + e^z)` without overflow.
fn softplus(z: f64) -> f64 {
    if z > 0.0 {
        z + (-z).exp().ln_1p()
    } else {
        z.exp().ln_1p()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogisticRegressionParams {
    /// Inverse L2 strength; the intercept is not penalised.
    pub c: f64,
    pub max_iter: usize,
    pub tolerance: f64,
}

impl Default for LogisticRegressionParams {
    fn default() -> Self {
        Self {
            c: 1.0,
            max_iter: 1000,
            tolerance: 1e-6,
        }
    }
}

impl LogisticRegressionParams {
    /// Fit by Newton's method on
    /// `0.5 * |w|^2 + c * sum_i s_i * logloss_i`.
    pub fn fit(
        &self,
        records: &Array2<f64>,
        targets: &Array1<bool>,
        sample_weights: &Array1<f64>,
    ) -> Result<LogisticRegressionModel> {
        let (n, d) = records.dim();
        if n == 0 || targets.len() != n || sample_weights.len() != n {
            return Err(HoopsError::Training {
                reason: format!(
                    "logistic regression needs matching rows: {} records, {} targets, {} weights",
                    n,
                    targets.len(),
                    sample_weights.len()
                ),
            });
        }

        let y = targets.mapv(|win| if win { 1.0 } else { 0.0 });
        let mut coefficients = Array1::<f64>::zeros(d);
        let mut intercept = 0.0;
        let mut objective = self.objective(records, &y, sample_weights, &coefficients, intercept);
        let mut converged = false;
        let mut n_iter = 0;

        while n_iter < self.max_iter {
            let p = (records.dot(&coefficients) + intercept).mapv(sigmoid);

            let dim = d + 1;
            let mut gradient = DVector::<f64>::zeros(dim);
            let mut hessian = DMatrix::<f64>::zeros(dim, dim);
            for (i, row) in records.axis_iter(Axis(0)).enumerate() {
                let residual = self.c * sample_weights[i] * (p[i] - y[i]);
                let curvature = self.c * sample_weights[i] * p[i] * (1.0 - p[i]);
                for j in 0..d {
                    if row[j] == 0.0 {
                        continue;
                    }
                    gradient[j] += residual * row[j];
                    for k in 0..d {
                        hessian[(j, k)] += curvature * row[j] * row[k];
                    }
                    hessian[(j, d)] += curvature * row[j];
                }
                gradient[d] += residual;
                hessian[(d, d)] += curvature;
            }
            for j in 0..d {
                gradient[j] += coefficients[j];
                hessian[(j, j)] += 1.0;
                hessian[(d, j)] = hessian[(j, d)];
            }

            if gradient.amax() <= self.tolerance {
                converged = true;
                break;
            }

            let step = hessian
                .clone()
                .cholesky()
                .map(|chol| chol.solve(&gradient))
                .or_else(|| hessian.lu().solve(&gradient))
                .ok_or_else(|| HoopsError::Training {
                    reason: "singular Hessian in logistic regression".to_string(),
                })?;

            // Halve the Newton step until the objective stops increasing.
            let mut scale = 1.0;
            loop {
                let candidate = &coefficients - &(Array1::from_iter(step.iter().take(d).copied()) * scale);
                let candidate_intercept = intercept - scale * step[d];
                let value = self.objective(records, &y, sample_weights, &candidate, candidate_intercept);
                if value <= objective || scale < 1e-10 {
                    coefficients = candidate;
                    intercept = candidate_intercept;
                    objective = value;
                    break;
                }
                scale *= 0.5;
            }
            n_iter += 1;
        }

        if converged {
            debug!("Logistic regression converged after {} iterations", n_iter);
        } else {
            warn!("Logistic regression hit max_iter={} before converging", self.max_iter);
        }

        Ok(LogisticRegressionModel {
            coefficients,
            intercept,
            converged,
        })
    }

    fn objective(
        &self,
        records: &Array2<f64>,
        y: &Array1<f64>,
        sample_weights: &Array1<f64>,
        coefficients: &Array1<f64>,
        intercept: f64,
    ) -> f64 {
        let z = records.dot(coefficients) + intercept;
        let loss: f64 = z
            .iter()
            .zip(y.iter())
            .zip(sample_weights.iter())
            .map(|((&z, &y), &s)| s * (softplus(z) - y * z))
            .sum();
        0.5 * coefficients.dot(coefficients) + self.c * loss
    }
}

/// Weighted, L2-regularised binary logistic regression.
#[derive(Debug, Clone, PartialEq)]
pub struct LogisticRegressionModel {
    coefficients: Array1<f64>,
    intercept: f64,
    converged: bool,
}

impl LogisticRegressionModel {
    pub fn params() -> LogisticRegressionParams {
        LogisticRegressionParams::default()
    }

    pub fn coefficients(&self) -> &Array1<f64> {
        &self.coefficients
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    pub fn converged(&self) -> bool {
        self.converged
    }
}

impl ProbabilityModel for LogisticRegressionModel {
    fn model_name(&self) -> &str {
        "LogisticRegression"
    }

    fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    fn predict_proba(&self, records: &Array2<f64>) -> Result<Array1<f64>> {
        self.check_width(records)?;
        Ok((records.dot(&self.coefficients) + self.intercept).mapv(sigmoid))
    }
}

/// A fitted model bound to the team universe it was trained on.
#[derive(Debug)]
pub struct ModelHandle<M> {
    model: M,
    universe: TeamUniverse,
}

impl<M: ProbabilityModel> ModelHandle<M> {
    pub fn new(model: M, universe: TeamUniverse) -> Self {
        Self { model, universe }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn universe(&self) -> &TeamUniverse {
        &self.universe
    }

    /// Probability that `team1` beats `team2`, built on the frozen schema.
    /// Teams outside the universe contribute no signal.
    pub fn probability(&self, team1: Option<TeamCode>, team2: Option<TeamCode>) -> ModelProbability {
        let row = self.universe.indicator_row(team1, team2).insert_axis(Axis(0));
        match self.model.predict_proba(&row) {
            Ok(probs) => match probs.get(0) {
                Some(&p) if (0.0..=1.0).contains(&p) => ModelProbability::Probability(p),
                Some(&p) => ModelProbability::Unavailable {
                    reason: format!("{} produced invalid probability {}", self.model.model_name(), p),
                },
                None => ModelProbability::Unavailable {
                    reason: format!("{} returned no rows", self.model.model_name()),
                },
            },
            Err(e) => {
                warn!("{} prediction failed: {}", self.model.model_name(), e);
                ModelProbability::Unavailable { reason: e.to_string() }
            }
        }
    }
}
