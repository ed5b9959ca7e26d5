pub mod cache_key;
pub mod http_method;
pub mod request_descriptor;
pub mod request_id;
pub mod resource_kind;
pub mod session_context;
pub mod temp_id;

pub use cache_key::CacheKey;
pub use http_method::HttpMethod;
pub use request_descriptor::RequestDescriptor;
pub use request_id::QueuedRequestId;
pub use resource_kind::ResourceKind;
pub use session_context::SyncContext;
pub use temp_id::TempId;
