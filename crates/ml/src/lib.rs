pub mod config;
pub mod features;
pub mod weighting;
pub mod split;
pub mod models;
pub mod forest;
pub mod evaluation;
pub mod training;
pub mod predictor;

pub use config::*;
pub use features::*;
pub use weighting::*;
pub use split::*;
pub use models::*;
pub use forest::*;
pub use evaluation::*;
pub use training::*;
pub use predictor::*;
