mod commands;
mod history;

pub use commands::{Command, PointPosition};
pub use history::{CommandHistory, DEFAULT_HISTORY_LIMIT, HistoryEntry};
