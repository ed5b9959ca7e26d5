use crate::domain::entities::DisplayCacheItem;
use crate::domain::value_objects::TempId;
use async_trait::async_trait;

/// 投機レコードの永続ストア。リロード後の復元（rehydrate）に使われる。
///
/// Same storage-degradation contract as the queue store: writes are
/// best-effort against durable storage and always land in memory.
#[async_trait]
pub trait DisplayCacheStore: Send + Sync {
    async fn insert(&self, item: DisplayCacheItem);

    async fn remove(&self, temp_id: &TempId);

    async fn list(&self) -> Vec<DisplayCacheItem>;

    async fn clear(&self);

    async fn len(&self) -> usize;
}
