use crate::application::ports::{DisplayCacheStore, QueryCache};
use crate::domain::entities::{DisplayCacheItem, OptimisticHandle, ResourcePayload};
use crate::domain::value_objects::{CacheKey, HttpMethod, RequestDescriptor, ResourceKind, TempId};
use serde_json::Value;
use std::sync::Arc;

/// 楽観的更新の適用と巻き戻し。
///
/// Creation (POST) requests against a recognized resource produce a
/// placeholder record that is prepended into every matching query-cache
/// entry and persisted to the display cache for reload durability.
pub struct OptimisticUpdater {
    query_cache: Arc<dyn QueryCache>,
    display_cache: Arc<dyn DisplayCacheStore>,
}

impl OptimisticUpdater {
    pub fn new(query_cache: Arc<dyn QueryCache>, display_cache: Arc<dyn DisplayCacheStore>) -> Self {
        Self {
            query_cache,
            display_cache,
        }
    }

    /// プレースホルダーを合成して注入する。対象外のリクエストは `None`。
    pub async fn apply(&self, descriptor: &RequestDescriptor) -> Option<OptimisticHandle> {
        if descriptor.method != HttpMethod::Post {
            return None;
        }
        let kind = ResourceKind::match_path(&descriptor.path)?;
        let body = descriptor.body.as_ref()?;

        let payload = ResourcePayload::parse(kind, body);
        let scope_id = payload.scope_id().or_else(|| {
            descriptor
                .param("budget_period_id")
                .and_then(|value| value.parse().ok())
        });

        let temp_id = TempId::generate();
        let mut fields = payload.placeholder_fields(body);

        if let Some(category_id) = payload.category_id() {
            match self.resolve_category(scope_id, category_id).await {
                Some(category) => {
                    fields.insert("category".to_string(), category);
                }
                None => {
                    // Best-effort denormalization only; the record still renders.
                    tracing::debug!(
                        target: "offline::optimistic",
                        category_id,
                        ?scope_id,
                        "category not present in cache, placeholder keeps a null category"
                    );
                    fields.insert("category".to_string(), Value::Null);
                }
            }
        }

        fields.insert("_offline".to_string(), Value::Bool(true));
        fields.insert("_tempId".to_string(), Value::String(temp_id.to_string()));
        let record = Value::Object(fields);

        let cache_key = CacheKey::scoped(kind.cache_segment(), scope_id);
        let placeholder = record.clone();
        self.query_cache
            .update_matching(&cache_key, &move |mut items| {
                items.insert(0, placeholder.clone());
                items
            })
            .await;

        self.display_cache
            .insert(DisplayCacheItem::new(
                temp_id.clone(),
                kind,
                scope_id,
                record.clone(),
            ))
            .await;

        Some(OptimisticHandle::new(cache_key, temp_id, record))
    }

    /// プレースホルダーを両方のキャッシュから取り除く。
    /// 再送の成否に関わらず、キューエントリ1件につき厳密に1回呼ばれる。
    pub async fn remove(&self, handle: &OptimisticHandle) {
        let temp_id = handle.temp_id.to_string();
        self.query_cache
            .update_matching(&handle.cache_key, &move |items| {
                items
                    .into_iter()
                    .filter(|item| {
                        item.get("_tempId").and_then(Value::as_str) != Some(temp_id.as_str())
                    })
                    .collect()
            })
            .await;

        self.display_cache.remove(&handle.temp_id).await;
    }

    /// 再起動後、表示キャッシュの投機レコードをインメモリキャッシュへ復元する。
    pub async fn rehydrate(&self) -> usize {
        let items = self.display_cache.list().await;
        for item in &items {
            let key = CacheKey::scoped(item.resource.cache_segment(), item.scope_id);
            let temp_id = item.temp_id.to_string();
            let payload = item.payload.clone();
            self.query_cache
                .update_matching(&key, &move |mut entries| {
                    let already_present = entries.iter().any(|entry| {
                        entry.get("_tempId").and_then(Value::as_str) == Some(temp_id.as_str())
                    });
                    if !already_present {
                        entries.insert(0, payload.clone());
                    }
                    entries
                })
                .await;
        }
        items.len()
    }

    async fn resolve_category(&self, scope_id: Option<i64>, category_id: i64) -> Option<Value> {
        let key = CacheKey::scoped(ResourceKind::Category.cache_segment(), scope_id);
        let categories = self.query_cache.get(&key).await?;
        categories
            .into_iter()
            .find(|category| category.get("id").and_then(Value::as_i64) == Some(category_id))
    }
}
