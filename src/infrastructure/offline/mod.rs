pub mod sqlite_display_cache;
pub mod sqlite_queue_store;

pub use sqlite_display_cache::SqliteDisplayCache;
pub use sqlite_queue_store::SqliteQueueStore;
