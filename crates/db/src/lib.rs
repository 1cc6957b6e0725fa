pub mod repository;
pub mod memory;

pub use repository::*;
pub use memory::*;
