pub mod history;
pub mod preferences;

pub use history::{group_by_day, HistoryItem, HistoryRecord, HistoryStore, JsonHistoryStore};
pub use preferences::Preferences;
