pub mod connectivity;
pub mod display_cache;
pub mod http_gateway;
pub mod notifier;
pub mod query_cache;
pub mod queue_store;
pub mod session;

pub use connectivity::ConnectivityMonitor;
pub use display_cache::DisplayCacheStore;
pub use http_gateway::{GatewayError, HttpGateway};
pub use notifier::{NoticeLevel, UserNotifier};
pub use query_cache::QueryCache;
pub use queue_store::QueueStore;
pub use session::SessionGateway;
