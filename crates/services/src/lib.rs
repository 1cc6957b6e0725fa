pub mod predictor;
pub mod scoreboard;

pub use predictor::*;
pub use scoreboard::*;
