//! Persisted history of evaluated expressions.

mod entry;
mod store;

pub use entry::HistoryEntry;
pub use store::{DEFAULT_HISTORY_FILE, HISTORY_CAPACITY, HistoryStore};
