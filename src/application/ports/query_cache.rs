use crate::domain::value_objects::CacheKey;
use async_trait::async_trait;
use serde_json::Value;

/// インメモリのクエリキャッシュ。UIが表示するリスト類をキー単位で保持する。
///
/// `update_matching` applies the updater to every entry whose key the lookup
/// key matches (see `CacheKey::matches_entry`); when nothing matches, an
/// entry is created at the exact key so placeholders are never dropped on a
/// cold cache.
#[async_trait]
pub trait QueryCache: Send + Sync {
    async fn get(&self, key: &CacheKey) -> Option<Vec<Value>>;

    async fn update_matching(
        &self,
        key: &CacheKey,
        update: &(dyn Fn(Vec<Value>) -> Vec<Value> + Send + Sync),
    );

    /// 全キーを無効化する。同期完了後にサーバー状態を正とするために呼ばれる。
    async fn invalidate_all(&self);
}
