pub mod memory_query_cache;

pub use memory_query_cache::InMemoryQueryCache;
