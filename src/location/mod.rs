pub mod geo;
pub mod sqlite_store;
pub mod store;
pub mod tracker;

pub use sqlite_store::SqliteHistoryStore;
pub use store::{HistoryStore, JsonHistoryStore, MemoryHistoryStore};
pub use tracker::LocationSignificanceTracker;
