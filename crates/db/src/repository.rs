use hoops_models::Game;

/// Read side of the game ledger, as consumed by the prediction engine.
///
/// Implementations return finalized games only, ascending by date. The engine
/// reads the full history on every call and never writes.
pub trait GameLedger: Send + Sync {
    fn list_games_ordered_by_date(&self) -> Vec<Game>;

    fn len(&self) -> usize {
        self.list_games_ordered_by_date().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
