use crate::application::services::OfflineServiceTrait;
use crate::domain::entities::{QueuedRequest, SyncRunOutcome};
use crate::presentation::dto::Validate;
use crate::presentation::dto::offline::{
    DiscardPendingResponse, ListPendingRequest, QueuedRequestSummary, SyncFailureDto,
    SyncMetricsResponse, SyncProgressDto, SyncStatusResponse, TriggerSyncResponse,
};
use crate::shared::AppError;
use std::convert::TryFrom;
use std::sync::Arc;

pub struct OfflineHandler {
    offline_service: Arc<dyn OfflineServiceTrait>,
}

impl OfflineHandler {
    pub fn new(offline_service: Arc<dyn OfflineServiceTrait>) -> Self {
        Self { offline_service }
    }

    pub async fn get_sync_status(&self) -> Result<SyncStatusResponse, AppError> {
        let pending_count = self.offline_service.pending_count().await;
        let progress = self.offline_service.sync_progress().await;

        Ok(SyncStatusResponse {
            has_pending_changes: pending_count > 0,
            pending_count: u32::try_from(pending_count)
                .map_err(|_| AppError::Internal("Pending count overflowed u32".to_string()))?,
            is_syncing: self.offline_service.is_syncing(),
            sync_progress: SyncProgressDto {
                current: progress.current,
                total: progress.total,
            },
        })
    }

    pub async fn trigger_sync(&self) -> Result<TriggerSyncResponse, AppError> {
        let outcome = self.offline_service.trigger_sync().await;
        Ok(map_sync_outcome(outcome))
    }

    pub async fn list_pending_requests(
        &self,
        request: ListPendingRequest,
    ) -> Result<Vec<QueuedRequestSummary>, AppError> {
        request.validate()?;

        let entries = self.offline_service.pending_requests().await;
        let limit = request.limit.map(|value| value as usize).unwrap_or(usize::MAX);
        Ok(entries
            .iter()
            .take(limit)
            .map(map_queued_request)
            .collect())
    }

    pub async fn discard_pending(&self) -> Result<DiscardPendingResponse, AppError> {
        let discarded = self.offline_service.discard_pending().await;
        Ok(DiscardPendingResponse {
            discarded: u32::try_from(discarded)
                .map_err(|_| AppError::Internal("Discard count overflowed u32".to_string()))?,
        })
    }

    pub async fn connectivity_changed(
        &self,
        online: bool,
    ) -> Result<Option<TriggerSyncResponse>, AppError> {
        let outcome = self.offline_service.connectivity_changed(online).await;
        Ok(outcome.map(map_sync_outcome))
    }

    pub fn get_sync_metrics(&self) -> SyncMetricsResponse {
        let snapshot = self.offline_service.metrics();
        SyncMetricsResponse {
            queued: snapshot.queued,
            replayed: snapshot.replayed,
            failed: snapshot.failed,
            last_run_ms: snapshot.last_run_ms,
        }
    }
}

fn map_sync_outcome(outcome: SyncRunOutcome) -> TriggerSyncResponse {
    match outcome {
        SyncRunOutcome::AlreadyRunning => TriggerSyncResponse {
            outcome: "already_running".to_string(),
            success: true,
            processed: 0,
            failed: 0,
            failures: Vec::new(),
        },
        SyncRunOutcome::Offline => TriggerSyncResponse {
            outcome: "offline".to_string(),
            success: false,
            processed: 0,
            failed: 0,
            failures: Vec::new(),
        },
        SyncRunOutcome::Completed(report) => TriggerSyncResponse {
            outcome: "completed".to_string(),
            success: report.success,
            processed: report.processed,
            failed: report.failed,
            failures: report
                .failures
                .into_iter()
                .map(|failure| SyncFailureDto {
                    description: failure.description,
                    message: failure.message,
                })
                .collect(),
        },
    }
}

fn map_queued_request(entry: &QueuedRequest) -> QueuedRequestSummary {
    QueuedRequestSummary {
        id: entry.id.to_string(),
        description: entry.description.clone(),
        method: entry.descriptor.method.to_string(),
        path: entry.descriptor.path.clone(),
        created_at: entry.created_at.timestamp_millis(),
        workspace_id: entry.context.and_then(|context| context.workspace_id),
        account_id: entry.context.and_then(|context| context.account_id),
        has_placeholder: entry.optimistic.is_some(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{
        QueuedRequestDraft, SyncFailure, SyncProgress, SyncRunReport,
    };
    use crate::domain::value_objects::{QueuedRequestId, RequestDescriptor, SyncContext};
    use crate::shared::metrics::SyncMetricsSnapshot;
    use async_trait::async_trait;
    use chrono::Utc;
    use serde_json::json;

    struct StubOfflineService {
        pending: Vec<QueuedRequest>,
        outcome: SyncRunOutcome,
    }

    #[async_trait]
    impl OfflineServiceTrait for StubOfflineService {
        async fn pending_count(&self) -> usize {
            self.pending.len()
        }

        async fn has_pending_changes(&self) -> bool {
            !self.pending.is_empty()
        }

        fn is_syncing(&self) -> bool {
            false
        }

        async fn sync_progress(&self) -> SyncProgress {
            SyncProgress::new(0, 0)
        }

        async fn trigger_sync(&self) -> SyncRunOutcome {
            self.outcome.clone()
        }

        async fn pending_requests(&self) -> Vec<QueuedRequest> {
            self.pending.clone()
        }

        async fn discard_pending(&self) -> usize {
            self.pending.len()
        }

        async fn connectivity_changed(&self, online: bool) -> Option<SyncRunOutcome> {
            online.then(|| self.outcome.clone())
        }

        fn metrics(&self) -> SyncMetricsSnapshot {
            SyncMetricsSnapshot {
                queued: 3,
                replayed: 2,
                failed: 1,
                last_run_ms: Some(1),
            }
        }
    }

    fn sample_request(description: &str) -> QueuedRequest {
        QueuedRequestDraft::new(
            RequestDescriptor::post("/transactions", json!({"amount": 1})),
            description,
            None,
            Some(SyncContext::new(Some(4), None)),
        )
        .into_request(QueuedRequestId::generate(), Utc::now())
    }

    fn handler(pending: Vec<QueuedRequest>, outcome: SyncRunOutcome) -> OfflineHandler {
        OfflineHandler::new(Arc::new(StubOfflineService { pending, outcome }))
    }

    #[tokio::test]
    async fn sync_status_reflects_the_queue() {
        let handler = handler(
            vec![sample_request("Create transaction")],
            SyncRunOutcome::Completed(SyncRunReport::empty()),
        );

        let status = handler.get_sync_status().await.unwrap();
        assert!(status.has_pending_changes);
        assert_eq!(status.pending_count, 1);
        assert!(!status.is_syncing);
    }

    #[tokio::test]
    async fn trigger_sync_maps_the_report() {
        let handler = handler(
            Vec::new(),
            SyncRunOutcome::Completed(SyncRunReport {
                success: false,
                processed: 2,
                failed: 1,
                failures: vec![SyncFailure {
                    description: "Create category".to_string(),
                    message: "HTTP 500: status 500".to_string(),
                }],
            }),
        );

        let response = handler.trigger_sync().await.unwrap();
        assert_eq!(response.outcome, "completed");
        assert!(!response.success);
        assert_eq!(response.processed, 2);
        assert_eq!(response.failed, 1);
        assert_eq!(response.failures[0].description, "Create category");
    }

    #[tokio::test]
    async fn trigger_sync_maps_offline_and_running_outcomes() {
        let offline = handler(Vec::new(), SyncRunOutcome::Offline);
        assert_eq!(offline.trigger_sync().await.unwrap().outcome, "offline");

        let running = handler(Vec::new(), SyncRunOutcome::AlreadyRunning);
        assert_eq!(
            running.trigger_sync().await.unwrap().outcome,
            "already_running"
        );
    }

    #[tokio::test]
    async fn list_pending_validates_the_limit() {
        let handler = handler(
            vec![
                sample_request("Create transaction"),
                sample_request("Create category"),
            ],
            SyncRunOutcome::Completed(SyncRunReport::empty()),
        );

        let result = handler
            .list_pending_requests(ListPendingRequest { limit: Some(0) })
            .await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));

        let summaries = handler
            .list_pending_requests(ListPendingRequest { limit: Some(1) })
            .await
            .unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].method, "POST");
        assert_eq!(summaries[0].workspace_id, Some(4));
    }

    #[tokio::test]
    async fn metrics_are_passed_through() {
        let handler = handler(Vec::new(), SyncRunOutcome::Completed(SyncRunReport::empty()));
        let metrics = handler.get_sync_metrics();
        assert_eq!(metrics.queued, 3);
        assert_eq!(metrics.replayed, 2);
        assert_eq!(metrics.failed, 1);
    }
}
