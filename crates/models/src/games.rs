use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use crate::teams::TeamCode;

/// A finalized game as recorded in the ledger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Game {
    pub game_id: String,
    pub date: NaiveDate,
    pub home: TeamCode,
    pub visitor: TeamCode,
    pub home_score: u32,
    pub visitor_score: u32,
}

impl Game {
    pub fn new(
        game_id: impl Into<String>,
        date: NaiveDate,
        home: TeamCode,
        visitor: TeamCode,
        home_score: u32,
        visitor_score: u32,
    ) -> Self {
        Self {
            game_id: game_id.into(),
            date,
            home,
            visitor,
            home_score,
            visitor_score,
        }
    }

    /// The label used for training: home side (team1) won.
    pub fn team1_win(&self) -> bool {
        self.home_score > self.visitor_score
    }

    pub fn margin(&self) -> i32 {
        self.home_score as i32 - self.visitor_score as i32
    }

    pub fn winner(&self) -> TeamCode {
        if self.team1_win() {
            self.home
        } else {
            self.visitor
        }
    }

    pub fn involves(&self, team: TeamCode) -> bool {
        self.home == team || self.visitor == team
    }

    /// Whether `team` won this game; `None` if it did not play.
    pub fn did_win(&self, team: TeamCode) -> Option<bool> {
        if team == self.home {
            Some(self.team1_win())
        } else if team == self.visitor {
            Some(!self.team1_win())
        } else {
            None
        }
    }
}
