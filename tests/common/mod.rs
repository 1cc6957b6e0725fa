// Shared fixtures for integration tests
#![allow(dead_code)]

use chrono::{Duration, NaiveDate};
use hoops_ml::TrainingConfig;
use hoops_models::{Game, TeamCode};

pub fn opening_night() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 10, 24).unwrap()
}

/// Config with a small forest so debug test runs stay quick.
pub fn quick_config() -> TrainingConfig {
    TrainingConfig {
        n_trees: 25,
        ..TrainingConfig::default()
    }
}

/// Every pairing met `rounds` times. The side listed first always hosts and
/// wins, except once every `upset_every` meetings.
pub fn skill_ledger(teams: &[TeamCode], rounds: usize, upset_every: usize) -> Vec<Game> {
    let mut games = Vec::new();
    for round in 0..rounds {
        for (i, &home) in teams.iter().enumerate() {
            for (j, &visitor) in teams.iter().enumerate().skip(i + 1) {
                let id = games.len();
                let upset = (round + i + j) % upset_every == 0;
                let (home_score, visitor_score) = if upset { (98, 107) } else { (114, 101) };
                games.push(Game::new(
                    format!("{:04}", id),
                    opening_night() + Duration::days(id as i64),
                    home,
                    visitor,
                    home_score,
                    visitor_score,
                ));
            }
        }
    }
    games
}

/// 60 games among four teams: BOS wins 90%, DET wins 10%.
pub fn gradient_ledger() -> Vec<Game> {
    use TeamCode::*;
    skill_ledger(&[Bos, Lal, Mia, Det], 10, 10)
}
