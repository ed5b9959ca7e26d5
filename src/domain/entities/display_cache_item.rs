use crate::domain::value_objects::{ResourceKind, TempId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// リロード後もUIに残すための投機レコード。インメモリキャッシュとは独立に永続化される。
///
/// Each item is tied to exactly one live `QueuedRequest` through its temp id
/// and is removed when that request is dequeued, whether the replay
/// succeeded or failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayCacheItem {
    pub temp_id: TempId,
    pub created_at: DateTime<Utc>,
    pub resource: ResourceKind,
    pub scope_id: Option<i64>,
    pub payload: Value,
}

impl DisplayCacheItem {
    pub fn new(
        temp_id: TempId,
        resource: ResourceKind,
        scope_id: Option<i64>,
        payload: Value,
    ) -> Self {
        Self {
            temp_id,
            created_at: Utc::now(),
            resource,
            scope_id,
            payload,
        }
    }
}
