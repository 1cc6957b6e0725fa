use thiserror::Error;

#[derive(Error, Debug)]
pub enum HoopsError {
    #[error("No data")]
    NoData,

    #[error("Not enough games to train (need at least ~{required}).")]
    NotEnoughGames { found: usize, required: usize },

    #[error("Unknown team code: {0}")]
    UnknownTeam(String),

    #[error("Home team and visitor team cannot be the same: {0}")]
    SameTeam(String),

    #[error("Model training failed: {reason}")]
    Training { reason: String },

    #[error("Model prediction failed: {reason}")]
    PredictionFailed { reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl HoopsError {
    /// True for the empty-ledger and too-few-games cases.
    pub fn is_insufficient_data(&self) -> bool {
        matches!(self, Self::NoData | Self::NotEnoughGames { .. })
    }

    /// The `{"error": "..."}` mapping handed to callers that expect one.
    pub fn to_payload(&self) -> serde_json::Value {
        serde_json::json!({ "error": self.to_string() })
    }
}

pub type Result<T> = std::result::Result<T, HoopsError>;
