pub mod config;
pub mod notes;
pub mod task;
pub mod topic;

pub use config::*;
pub use notes::*;
pub use task::*;
pub use topic::*;
