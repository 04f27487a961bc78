pub mod storage;
pub mod types;

pub use storage::{load_scores, save_scores};
pub use types::ScoreFile;
