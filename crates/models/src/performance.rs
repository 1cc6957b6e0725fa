use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use crate::teams::TeamCode;

/// One entry of a ranked team-to-score listing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureScore {
    pub team: TeamCode,
    pub score: f64,
}

/// Teams ranked by score, highest first. Serializes as an ordered
/// `team -> score` mapping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TopFeatures(pub Vec<FeatureScore>);

impl TopFeatures {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FeatureScore> {
        self.0.iter()
    }

    pub fn get(&self, team: TeamCode) -> Option<f64> {
        self.0.iter().find(|f| f.team == team).map(|f| f.score)
    }
}

impl Serialize for TopFeatures {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for feature in &self.0 {
            map.serialize_entry(feature.team.as_str(), &feature.score)?;
        }
        map.end()
    }
}

/// Coefficient and importance listings attached to a training run.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureReport {
    Reported {
        /// Absent when the design matrix is too wide to report coefficients.
        lr_top_features: Option<TopFeatures>,
        rf_top_features: TopFeatures,
    },
    Skipped { reason: String },
}

impl Serialize for FeatureReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if let Self::Reported { lr_top_features, rf_top_features } = self {
            if let Some(lr) = lr_top_features {
                map.serialize_entry("lr_top_features", lr)?;
            }
            map.serialize_entry("rf_top_features", rf_top_features)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamStrength {
    pub team: TeamCode,
    pub win_prob: f64,
}

/// Held-out evaluation of the two classifiers plus team rankings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainingMetrics {
    pub lr_accuracy: f64,
    /// `None` when the test split holds a single class.
    pub lr_auc: Option<f64>,
    pub rf_accuracy: f64,
    pub rf_auc: Option<f64>,
    pub n_train: usize,
    pub n_test: usize,
    #[serde(flatten)]
    pub feature_report: FeatureReport,
    pub top3_teams: Vec<TeamStrength>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(report: FeatureReport) -> TrainingMetrics {
        TrainingMetrics {
            lr_accuracy: 0.7,
            lr_auc: Some(0.8),
            rf_accuracy: 0.65,
            rf_auc: None,
            n_train: 48,
            n_test: 12,
            feature_report: report,
            top3_teams: vec![TeamStrength { team: TeamCode::Bos, win_prob: 0.9 }],
        }
    }

    #[test]
    fn test_metrics_mapping_with_report() {
        let report = FeatureReport::Reported {
            lr_top_features: Some(TopFeatures(vec![
                FeatureScore { team: TeamCode::Bos, score: 1.5 },
                FeatureScore { team: TeamCode::Det, score: 1.1 },
            ])),
            rf_top_features: TopFeatures(vec![FeatureScore { team: TeamCode::Det, score: 0.6 }]),
        };
        let value = serde_json::to_value(metrics(report)).unwrap();

        assert_eq!(value["lr_accuracy"], 0.7);
        assert!(value["rf_auc"].is_null());
        assert_eq!(value["n_train"], 48);
        assert_eq!(value["lr_top_features"]["BOS"], 1.5);
        assert_eq!(value["rf_top_features"]["DET"], 0.6);
        assert_eq!(value["top3_teams"][0]["team"], "BOS");
    }

    #[test]
    fn test_metrics_mapping_when_report_skipped() {
        let value = serde_json::to_value(metrics(FeatureReport::Skipped {
            reason: "shape mismatch".to_string(),
        }))
        .unwrap();

        assert!(value.get("lr_top_features").is_none());
        assert!(value.get("rf_top_features").is_none());
        assert_eq!(value["n_test"], 12);
    }

    #[test]
    fn test_top_features_preserve_rank_order() {
        let features = TopFeatures(vec![
            FeatureScore { team: TeamCode::Was, score: 0.9 },
            FeatureScore { team: TeamCode::Atl, score: 0.2 },
        ]);
        let json = serde_json::to_string(&features).unwrap();

        assert_eq!(json, r#"{"WAS":0.9,"ATL":0.2}"#);
        assert_eq!(features.get(TeamCode::Atl), Some(0.2));
        assert_eq!(features.get(TeamCode::Bos), None);
    }
}
