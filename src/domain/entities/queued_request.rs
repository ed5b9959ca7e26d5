use super::OptimisticHandle;
use crate::domain::value_objects::{QueuedRequestId, RequestDescriptor, SyncContext};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// ネットワーク復帰待ちの書き込みリクエスト。
///
/// Entries are append-only: once queued they are never mutated in place,
/// only removed by id after their single replay attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueuedRequest {
    pub id: QueuedRequestId,
    pub created_at: DateTime<Utc>,
    pub descriptor: RequestDescriptor,
    pub description: String,
    pub optimistic: Option<OptimisticHandle>,
    pub context: Option<SyncContext>,
}

/// キューに投入する前の下書き。IDとタイムスタンプはストアが採番する。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueuedRequestDraft {
    pub descriptor: RequestDescriptor,
    pub description: String,
    pub optimistic: Option<OptimisticHandle>,
    pub context: Option<SyncContext>,
}

impl QueuedRequestDraft {
    pub fn new(
        descriptor: RequestDescriptor,
        description: impl Into<String>,
        optimistic: Option<OptimisticHandle>,
        context: Option<SyncContext>,
    ) -> Self {
        Self {
            descriptor,
            description: description.into(),
            optimistic,
            context,
        }
    }

    pub fn into_request(self, id: QueuedRequestId, created_at: DateTime<Utc>) -> QueuedRequest {
        QueuedRequest {
            id,
            created_at,
            descriptor: self.descriptor,
            description: self.description,
            optimistic: self.optimistic,
            context: self.context,
        }
    }
}
