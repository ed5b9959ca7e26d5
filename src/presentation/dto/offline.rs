use crate::presentation::dto::Validate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncProgressDto {
    pub current: u32,
    pub total: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncStatusResponse {
    pub has_pending_changes: bool,
    pub pending_count: u32,
    pub is_syncing: bool,
    pub sync_progress: SyncProgressDto,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncFailureDto {
    pub description: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerSyncResponse {
    /// "completed" | "already_running" | "offline"
    pub outcome: String,
    pub success: bool,
    pub processed: u32,
    pub failed: u32,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub failures: Vec<SyncFailureDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPendingRequest {
    pub limit: Option<i32>,
}

impl Validate for ListPendingRequest {
    fn validate(&self) -> Result<(), String> {
        if let Some(limit) = self.limit {
            if limit <= 0 || limit > 1000 {
                return Err("Limit must be between 1 and 1000".to_string());
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueuedRequestSummary {
    pub id: String,
    pub description: String,
    pub method: String,
    pub path: String,
    pub created_at: i64,
    pub workspace_id: Option<i64>,
    pub account_id: Option<i64>,
    pub has_placeholder: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscardPendingResponse {
    pub discarded: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncMetricsResponse {
    pub queued: u64,
    pub replayed: u64,
    pub failed: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_run_ms: Option<u64>,
}
