use crate::application::ports::QueryCache;
use crate::domain::value_objects::CacheKey;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// クエリキャッシュのインメモリ実装。キーごとにレコードのリストを保持する。
#[derive(Clone, Default)]
pub struct InMemoryQueryCache {
    entries: Arc<RwLock<HashMap<String, Vec<Value>>>>,
}

impl InMemoryQueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed or replace an entry wholesale (the host's fetch layer does this
    /// after every server read).
    pub async fn set(&self, key: &CacheKey, items: Vec<Value>) {
        let mut entries = self.entries.write().await;
        entries.insert(key.as_str().to_string(), items);
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[async_trait]
impl QueryCache for InMemoryQueryCache {
    async fn get(&self, key: &CacheKey) -> Option<Vec<Value>> {
        let entries = self.entries.read().await;
        entries.get(key.as_str()).cloned()
    }

    async fn update_matching(
        &self,
        key: &CacheKey,
        update: &(dyn Fn(Vec<Value>) -> Vec<Value> + Send + Sync),
    ) {
        let mut entries = self.entries.write().await;
        let matching: Vec<String> = entries
            .keys()
            .filter(|stored| key.matches_entry(stored))
            .cloned()
            .collect();

        if matching.is_empty() {
            // Cold cache: create the entry at the exact key instead of
            // dropping the update on the floor.
            entries.insert(key.as_str().to_string(), update(Vec::new()));
            return;
        }

        for stored in matching {
            if let Some(items) = entries.remove(&stored) {
                entries.insert(stored, update(items));
            }
        }
    }

    async fn invalidate_all(&self) {
        let mut entries = self.entries.write().await;
        entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn update_matching_reaches_refined_keys() {
        let cache = InMemoryQueryCache::new();
        let key = CacheKey::scoped("transactions", Some(7));
        cache.set(&key, vec![json!({"id": 1})]).await;
        cache
            .set(
                &CacheKey::new("transactions:7:recent".into()).unwrap(),
                vec![json!({"id": 1})],
            )
            .await;
        cache
            .set(&CacheKey::scoped("transactions", Some(8)), vec![])
            .await;

        cache
            .update_matching(&key, &|mut items| {
                items.insert(0, json!({"id": "tmp"}));
                items
            })
            .await;

        assert_eq!(cache.get(&key).await.map(|v| v.len()), Some(2));
        let refined = cache
            .get(&CacheKey::new("transactions:7:recent".into()).unwrap())
            .await;
        assert_eq!(refined.map(|v| v.len()), Some(2));
        let other_period = cache.get(&CacheKey::scoped("transactions", Some(8))).await;
        assert_eq!(other_period.map(|v| v.len()), Some(0));
    }

    #[tokio::test]
    async fn update_matching_upserts_on_cold_cache() {
        let cache = InMemoryQueryCache::new();
        let key = CacheKey::scoped("categories", Some(3));

        cache
            .update_matching(&key, &|mut items| {
                items.push(json!({"name": "Food"}));
                items
            })
            .await;

        assert_eq!(cache.get(&key).await.map(|v| v.len()), Some(1));
    }

    #[tokio::test]
    async fn invalidate_all_empties_the_cache() {
        let cache = InMemoryQueryCache::new();
        cache
            .set(&CacheKey::scoped("transactions", Some(1)), vec![json!({})])
            .await;
        cache.invalidate_all().await;
        assert_eq!(cache.len().await, 0);
    }
}
