pub mod dispatch_service;
pub mod offline_service;
pub mod optimistic_service;
pub mod sync_service;

#[cfg(test)]
pub(crate) mod test_support;

pub use dispatch_service::{DispatchOutcome, RequestDispatcher};
pub use offline_service::{OfflineService, OfflineServiceTrait};
pub use optimistic_service::OptimisticUpdater;
pub use sync_service::SyncEngine;
