use crate::domain::value_objects::{CacheKey, TempId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// キュー済みリクエストとその投機UIレコードを結び付けるハンドル。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimisticHandle {
    pub cache_key: CacheKey,
    pub temp_id: TempId,
    pub payload: Value,
}

impl OptimisticHandle {
    pub fn new(cache_key: CacheKey, temp_id: TempId, payload: Value) -> Self {
        Self {
            cache_key,
            temp_id,
            payload,
        }
    }
}
