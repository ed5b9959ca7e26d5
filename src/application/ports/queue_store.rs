use crate::domain::entities::{QueuedRequest, QueuedRequestDraft};
use crate::domain::value_objects::QueuedRequestId;
use async_trait::async_trait;

/// 保留中ミューテーションの永続FIFO。
///
/// `enqueue` is infallible by contract: a storage write failure degrades the
/// entry to in-memory-only durability for the session and is logged, never
/// surfaced. Entries are immutable once inserted.
#[async_trait]
pub trait QueueStore: Send + Sync {
    async fn enqueue(&self, draft: QueuedRequestDraft) -> QueuedRequest;

    /// Full ordered snapshot, oldest first.
    async fn list(&self) -> Vec<QueuedRequest>;

    async fn remove(&self, id: &QueuedRequestId);

    async fn clear(&self);

    async fn len(&self) -> usize;

    async fn has_pending(&self) -> bool {
        self.len().await > 0
    }
}
