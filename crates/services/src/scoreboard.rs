// Scoring stored predictions against played games

use hoops_models::{Game, PredictionRecord, TeamCode};
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ModelTally {
    pub hits: u32,
    pub misses: u32,
}

impl ModelTally {
    fn record(&mut self, correct: bool) {
        if correct {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
    }

    pub fn total(&self) -> u32 {
        self.hits + self.misses
    }

    pub fn hit_rate(&self) -> Option<f64> {
        let total = self.total();
        (total > 0).then(|| self.hits as f64 / total as f64)
    }
}

/// One point per prediction that carries both probabilities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HeadToHead {
    pub lr: u32,
    pub rf: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Scoreboard {
    pub lr: ModelTally,
    pub rf: ModelTally,
    pub head_to_head: HeadToHead,
    /// Predictions whose fixture had not been played (or not found).
    pub unmatched: u32,
}

impl Scoreboard {
    /// Score every prediction against the first game with the same home and
    /// visitor played on or after the prediction date, in ledger order.
    pub fn evaluate(predictions: &[PredictionRecord], games: &[Game]) -> Self {
        let mut board = Self::default();
        for prediction in predictions {
            let played = games.iter().find(|g| {
                g.home == prediction.home && g.visitor == prediction.visitor && g.date >= prediction.created_on
            });
            match played {
                Some(game) => board.score(prediction, game.winner()),
                None => board.unmatched += 1,
            }
        }
        debug!(
            "Scored {} predictions ({} unmatched)",
            predictions.len(),
            board.unmatched
        );
        board
    }

    fn score(&mut self, prediction: &PredictionRecord, winner: TeamCode) {
        let lr_correct = prediction.lr_prob_team1_win.map(|p| prediction.picked_winner(p) == winner);
        let rf_correct = prediction.rf_prob_team1_win.map(|p| prediction.picked_winner(p) == winner);

        if let Some(correct) = lr_correct {
            self.lr.record(correct);
        }
        if let Some(correct) = rf_correct {
            self.rf.record(correct);
        }

        let (Some(lr_p), Some(rf_p), Some(lr_ok), Some(rf_ok)) = (
            prediction.lr_prob_team1_win,
            prediction.rf_prob_team1_win,
            lr_correct,
            rf_correct,
        ) else {
            return;
        };

        let lr_point = match (lr_ok, rf_ok) {
            (true, true) => lr_p > rf_p,
            (true, false) => true,
            (false, true) => false,
            (false, false) => (lr_p - 0.5).abs() < (rf_p - 0.5).abs(),
        };
        if lr_point {
            self.head_to_head.lr += 1;
        } else {
            self.head_to_head.rf += 1;
        }
    }
}
