pub mod display_cache_item;
pub mod optimistic_update;
pub mod queued_request;
pub mod resource_payload;
pub mod sync_report;

pub use display_cache_item::DisplayCacheItem;
pub use optimistic_update::OptimisticHandle;
pub use queued_request::{QueuedRequest, QueuedRequestDraft};
pub use resource_payload::{
    BudgetPeriodDraft, CategoryDraft, CurrencyExchangeDraft, EntryKind, PlannedTransactionDraft,
    ResourcePayload, TransactionDraft,
};
pub use sync_report::{SyncFailure, SyncProgress, SyncRunOutcome, SyncRunReport};
