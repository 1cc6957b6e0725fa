use chrono::NaiveDate;
use serde::{Deserialize, Serialize, Serializer};
use crate::teams::TeamCode;

/// Outcome of asking one classifier for a team1 win probability.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelProbability {
    /// The caller did not hand this model in.
    NotSupplied,
    /// The model was supplied but could not produce a probability.
    Unavailable { reason: String },
    Probability(f64),
}

impl ModelProbability {
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Probability(p) => Some(*p),
            _ => None,
        }
    }

    pub fn is_not_supplied(&self) -> bool {
        matches!(self, Self::NotSupplied)
    }
}

impl Serialize for ModelProbability {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Probability(p) => serializer.serialize_f64(*p),
            Self::NotSupplied | Self::Unavailable { .. } => serializer.serialize_none(),
        }
    }
}

/// Per-model probabilities that the team1 (home) slot wins.
///
/// Serializes to the `{lr_prob_team1_win, rf_prob_team1_win}` mapping: a model
/// that was not supplied drops its key, one that failed reports `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchProbabilities {
    pub team1: String,
    pub team2: String,
    #[serde(rename = "lr_prob_team1_win", skip_serializing_if = "ModelProbability::is_not_supplied")]
    pub linear: ModelProbability,
    #[serde(rename = "rf_prob_team1_win", skip_serializing_if = "ModelProbability::is_not_supplied")]
    pub forest: ModelProbability,
}

impl MatchProbabilities {
    pub fn lr_prob_team1_win(&self) -> Option<f64> {
        self.linear.value()
    }

    pub fn rf_prob_team1_win(&self) -> Option<f64> {
        self.forest.value()
    }
}

/// A stored prediction made for a fixture, kept for later scoring.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictionRecord {
    pub home: TeamCode,
    pub visitor: TeamCode,
    pub lr_prob_team1_win: Option<f64>,
    pub rf_prob_team1_win: Option<f64>,
    pub created_on: NaiveDate,
}

impl PredictionRecord {
    pub fn new(
        home: TeamCode,
        visitor: TeamCode,
        probabilities: &MatchProbabilities,
        created_on: NaiveDate,
    ) -> Self {
        Self {
            home,
            visitor,
            lr_prob_team1_win: probabilities.lr_prob_team1_win(),
            rf_prob_team1_win: probabilities.rf_prob_team1_win(),
            created_on,
        }
    }

    /// Winner implied by a probability: home at 0.5 or above.
    pub fn picked_winner(&self, prob_team1_win: f64) -> TeamCode {
        if prob_team1_win >= 0.5 {
            self.home
        } else {
            self.visitor
        }
    }
}
