use hoops_models::{Game, HoopsError, Result};
use parking_lot::RwLock;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};
use crate::repository::GameLedger;

#[derive(Debug, Default)]
struct LedgerState {
    games: Vec<Game>,
    keys: HashSet<String>,
}

/// Append-only ledger that deduplicates on `game_id`.
///
/// Writers (importers) and readers may share it across threads; a read takes
/// a full snapshot, so a reader can observe a partially appended batch.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    state: RwLock<LedgerState>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_games(games: impl IntoIterator<Item = Game>) -> Self {
        let ledger = Self::new();
        ledger.extend(games);
        ledger
    }

    /// Load a JSON array of games, deduplicating as they are appended.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let games: Vec<Game> = serde_json::from_str(&content)?;
        let ledger = Self::new();
        let inserted = ledger.extend(games);
        info!("Loaded {} games from {}", inserted, path.display());
        Ok(ledger)
    }

    /// Returns `false` when a game with the same `game_id` is already recorded.
    pub fn append(&self, game: Game) -> bool {
        let mut state = self.state.write();
        if state.keys.contains(&game.game_id) {
            debug!("Skipping duplicate game {}", game.game_id);
            return false;
        }
        state.keys.insert(game.game_id.clone());
        state.games.push(game);
        true
    }

    /// Appends each game in turn and returns how many were new.
    pub fn extend(&self, games: impl IntoIterator<Item = Game>) -> usize {
        games.into_iter().map(|g| self.append(g)).filter(|inserted| *inserted).count()
    }

    pub fn contains(&self, game_id: &str) -> bool {
        self.state.read().keys.contains(game_id)
    }

    /// Games in insertion order.
    pub fn games(&self) -> Vec<Game> {
        self.state.read().games.clone()
    }

    pub fn save_json_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = serde_json::to_string_pretty(&self.games())?;
        std::fs::write(path.as_ref(), content).map_err(HoopsError::from)
    }
}

impl GameLedger for InMemoryLedger {
    fn list_games_ordered_by_date(&self) -> Vec<Game> {
        let mut games = self.games();
        games.sort_by_key(|g| g.date);
        games
    }

    fn len(&self) -> usize {
        self.state.read().games.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use hoops_models::TeamCode;

    fn game(id: &str, day: u32) -> Game {
        Game::new(
            id,
            NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            TeamCode::Bos,
            TeamCode::Nyk,
            100,
            90,
        )
    }

    #[test]
    fn test_append_deduplicates_by_game_id() {
        let ledger = InMemoryLedger::new();
        assert!(ledger.append(game("a", 1)));
        assert!(!ledger.append(game("a", 2)));
        assert!(ledger.append(game("b", 2)));

        assert_eq!(ledger.len(), 2);
        assert!(ledger.contains("a"));
        assert!(!ledger.contains("c"));
    }

    #[test]
    fn test_extend_counts_new_games_only() {
        let ledger = InMemoryLedger::with_games(vec![game("a", 1)]);
        let inserted = ledger.extend(vec![game("a", 1), game("b", 2), game("b", 3), game("c", 4)]);

        assert_eq!(inserted, 2);
        assert_eq!(ledger.len(), 3);
    }

    #[test]
    fn test_listing_is_sorted_by_date_and_stable() {
        let ledger = InMemoryLedger::with_games(vec![
            game("late", 20),
            game("first-on-5th", 5),
            game("early", 2),
            game("second-on-5th", 5),
        ]);
        let ids: Vec<String> = ledger
            .list_games_ordered_by_date()
            .into_iter()
            .map(|g| g.game_id)
            .collect();

        assert_eq!(ids, vec!["early", "first-on-5th", "second-on-5th", "late"]);
        assert_eq!(ledger.games()[0].game_id, "late");
    }

    #[test]
    fn test_empty_ledger() {
        let ledger = InMemoryLedger::new();
        assert!(ledger.is_empty());
        assert!(ledger.list_games_ordered_by_date().is_empty());
    }

    #[test]
    fn test_json_round_trip_through_file() {
        let path = std::env::temp_dir().join(format!("hoops-ledger-{}.json", std::process::id()));
        let ledger = InMemoryLedger::with_games(vec![game("a", 3), game("b", 1)]);
        ledger.save_json_file(&path).unwrap();

        let loaded = InMemoryLedger::from_json_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.list_games_ordered_by_date()[0].game_id, "b");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = InMemoryLedger::from_json_file("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, HoopsError::Io(_)));
    }
}
