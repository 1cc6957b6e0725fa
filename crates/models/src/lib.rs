pub mod teams;
pub mod games;
pub mod predictions;
pub mod performance;
pub mod error;

pub use teams::*;
pub use games::*;
pub use predictions::*;
pub use performance::*;
pub use error::*;
