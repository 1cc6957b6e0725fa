// Feature engineering: team-indicator design matrix

use chrono::NaiveDate;
use hoops_models::{Game, TeamCode};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Ordered list of teams that make up the design matrix columns.
///
/// The ordering is fixed when a model is trained and travels with the model,
/// so inference always rebuilds rows against the schema it was fitted on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamUniverse {
    teams: Vec<TeamCode>,
}

impl TeamUniverse {
    pub fn new(teams: Vec<TeamCode>) -> Self {
        Self { teams }
    }

    /// The `max_teams` most frequent teams across both home and visitor slots.
    ///
    /// Equal counts keep first-seen order, scanning every home code (in game
    /// order) before every visitor code.
    pub fn from_games(games: &[Game], max_teams: usize) -> Self {
        let mut counts: Vec<(TeamCode, usize)> = Vec::new();
        let mut position: HashMap<TeamCode, usize> = HashMap::new();

        let appearances = games
            .iter()
            .map(|g| g.home)
            .chain(games.iter().map(|g| g.visitor));
        for team in appearances {
            match position.get(&team) {
                Some(&idx) => counts[idx].1 += 1,
                None => {
                    position.insert(team, counts.len());
                    counts.push((team, 1));
                }
            }
        }

        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts.truncate(max_teams);
        Self::new(counts.into_iter().map(|(team, _)| team).collect())
    }

    pub fn teams(&self) -> &[TeamCode] {
        &self.teams
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    pub fn contains(&self, team: TeamCode) -> bool {
        self.column_of(team).is_some()
    }

    pub fn column_of(&self, team: TeamCode) -> Option<usize> {
        self.teams.iter().position(|t| *t == team)
    }

    /// One row of indicators. Teams outside the universe (or `None`) leave
    /// every column at zero.
    pub fn indicator_row(&self, team1: Option<TeamCode>, team2: Option<TeamCode>) -> Array1<f64> {
        let mut row = Array1::zeros(self.len());
        for team in [team1, team2].into_iter().flatten() {
            if let Some(col) = self.column_of(team) {
                row[col] = 1.0;
            }
        }
        row
    }
}

/// A filtered game as it enters training.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameRow {
    pub date: NaiveDate,
    pub team1: TeamCode,
    pub team2: TeamCode,
    pub score1: u32,
    pub score2: u32,
    /// Carried for downstream use; not a training feature.
    pub margin: i32,
    pub team1_win: bool,
}

impl FrameRow {
    fn from_game(game: &Game) -> Self {
        Self {
            date: game.date,
            team1: game.home,
            team2: game.visitor,
            score1: game.home_score,
            score2: game.visitor_score,
            margin: game.margin(),
            team1_win: game.team1_win(),
        }
    }

    pub fn involves(&self, team: TeamCode) -> bool {
        self.team1 == team || self.team2 == team
    }

    /// Whether `team` won this row; `None` if it did not play.
    pub fn won_by(&self, team: TeamCode) -> Option<bool> {
        if team == self.team1 {
            Some(self.team1_win)
        } else if team == self.team2 {
            Some(!self.team1_win)
        } else {
            None
        }
    }
}

/// Design matrix, labels, column schema and the rows behind them, all in
/// ascending date order.
#[derive(Debug, Clone)]
pub struct FeatureFrame {
    pub matrix: Array2<f64>,
    pub labels: Array1<bool>,
    pub universe: TeamUniverse,
    pub rows: Vec<FrameRow>,
}

impl FeatureFrame {
    pub fn empty() -> Self {
        Self {
            matrix: Array2::zeros((0, 0)),
            labels: Array1::from_vec(Vec::new()),
            universe: TeamUniverse::default(),
            rows: Vec::new(),
        }
    }

    /// No usable rows: callers treat this as "insufficient data".
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }
}

#[derive(Debug, Clone)]
pub struct FeatureBuilder {
    max_teams: usize,
}

impl Default for FeatureBuilder {
    fn default() -> Self {
        Self { max_teams: 30 }
    }
}

impl FeatureBuilder {
    pub fn new(max_teams: usize) -> Self {
        Self { max_teams }
    }

    pub fn build(&self, games: &[Game]) -> FeatureFrame {
        if games.is_empty() {
            return FeatureFrame::empty();
        }

        let mut games = games.to_vec();
        games.sort_by_key(|g| g.date);

        let universe = TeamUniverse::from_games(&games, self.max_teams);
        let rows: Vec<FrameRow> = games
            .iter()
            .filter(|g| universe.contains(g.home) && universe.contains(g.visitor))
            .map(FrameRow::from_game)
            .collect();

        let mut matrix = Array2::zeros((rows.len(), universe.len()));
        for (i, row) in rows.iter().enumerate() {
            matrix
                .row_mut(i)
                .assign(&universe.indicator_row(Some(row.team1), Some(row.team2)));
        }
        let labels: Array1<bool> = rows.iter().map(|r| r.team1_win).collect();

        debug!(
            "Built {}x{} design matrix from {} games",
            matrix.nrows(),
            matrix.ncols(),
            games.len()
        );

        FeatureFrame {
            matrix,
            labels,
            universe,
            rows,
        }
    }
}
