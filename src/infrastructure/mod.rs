pub mod cache;
pub mod connectivity;
pub mod database;
pub mod http;
pub mod notifier;
pub mod offline;
pub mod session;

pub use cache::InMemoryQueryCache;
pub use connectivity::SharedConnectivity;
pub use database::ConnectionPool;
pub use http::ReqwestGateway;
pub use notifier::TracingNotifier;
pub use offline::{SqliteDisplayCache, SqliteQueueStore};
pub use session::{InMemorySessionGateway, KeyringSessionGateway};
