// Recency sample weights

use ndarray::Array1;
use crate::features::{FrameRow, TeamUniverse};

/// Weights each game by how late it falls in a team's own schedule.
///
/// A team's `n` games (date order) receive `exp(linspace(0, ln max_weight, n))`,
/// so its first game weighs 1.0 and its latest `max_weight`. A game involves
/// two teams; teams are processed in universe order and the later team
/// overwrites the earlier one's value for that row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecencyWeighter {
    max_weight: f64,
}

impl Default for RecencyWeighter {
    fn default() -> Self {
        Self { max_weight: 2.0 }
    }
}

impl RecencyWeighter {
    pub fn new(max_weight: f64) -> Self {
        Self { max_weight }
    }

    /// The weight sequence for a team with `n` games.
    pub fn curve(&self, n: usize) -> Vec<f64> {
        match n {
            0 => Vec::new(),
            1 => vec![1.0],
            _ => {
                let end = self.max_weight.ln();
                let last = (n - 1) as f64;
                (0..n).map(|i| (end * i as f64 / last).exp()).collect()
            }
        }
    }

    /// One weight per row, aligned with `rows`.
    pub fn weights(&self, rows: &[FrameRow], universe: &TeamUniverse) -> Array1<f64> {
        let mut weights = Array1::from_elem(rows.len(), 1.0);

        let mut order: Vec<usize> = (0..rows.len()).collect();
        order.sort_by_key(|&i| rows[i].date);

        for &team in universe.teams() {
            let team_rows: Vec<usize> = order
                .iter()
                .copied()
                .filter(|&i| rows[i].involves(team))
                .collect();
            for (&row, weight) in team_rows.iter().zip(self.curve(team_rows.len())) {
                weights[row] = weight;
            }
        }

        weights
    }
}
