use super::optimistic_service::OptimisticUpdater;
use super::sync_service::SyncEngine;
use crate::application::ports::{ConnectivityMonitor, QueueStore};
use crate::domain::entities::{QueuedRequest, SyncProgress, SyncRunOutcome};
use crate::shared::config::SyncConfig;
use crate::shared::metrics::SyncMetricsSnapshot;
use async_trait::async_trait;
use std::sync::Arc;

/// UI層に公開するオフライン状態のファサード。
#[async_trait]
pub trait OfflineServiceTrait: Send + Sync {
    async fn pending_count(&self) -> usize;

    async fn has_pending_changes(&self) -> bool;

    fn is_syncing(&self) -> bool;

    async fn sync_progress(&self) -> SyncProgress;

    async fn trigger_sync(&self) -> SyncRunOutcome;

    /// 保留中の変更一覧（「未同期の変更」パネル向け）。
    async fn pending_requests(&self) -> Vec<QueuedRequest>;

    /// 保留中の変更とそのプレースホルダーを全て破棄する。戻り値は破棄件数。
    async fn discard_pending(&self) -> usize;

    /// ホストのreachabilityイベント。オンライン遷移で保留があれば同期を起動する。
    async fn connectivity_changed(&self, online: bool) -> Option<SyncRunOutcome>;

    fn metrics(&self) -> SyncMetricsSnapshot;
}

pub struct OfflineService {
    queue: Arc<dyn QueueStore>,
    optimistic: Arc<OptimisticUpdater>,
    engine: Arc<SyncEngine>,
    connectivity: Arc<dyn ConnectivityMonitor>,
    sync_config: SyncConfig,
}

impl OfflineService {
    pub fn new(
        queue: Arc<dyn QueueStore>,
        optimistic: Arc<OptimisticUpdater>,
        engine: Arc<SyncEngine>,
        connectivity: Arc<dyn ConnectivityMonitor>,
        sync_config: SyncConfig,
    ) -> Self {
        Self {
            queue,
            optimistic,
            engine,
            connectivity,
            sync_config,
        }
    }
}

#[async_trait]
impl OfflineServiceTrait for OfflineService {
    async fn pending_count(&self) -> usize {
        self.queue.len().await
    }

    async fn has_pending_changes(&self) -> bool {
        self.queue.has_pending().await
    }

    fn is_syncing(&self) -> bool {
        self.engine.is_syncing()
    }

    async fn sync_progress(&self) -> SyncProgress {
        self.engine.progress().await
    }

    async fn trigger_sync(&self) -> SyncRunOutcome {
        self.engine.trigger_sync().await
    }

    async fn pending_requests(&self) -> Vec<QueuedRequest> {
        self.queue.list().await
    }

    async fn discard_pending(&self) -> usize {
        let entries = self.queue.list().await;
        for entry in &entries {
            if let Some(handle) = &entry.optimistic {
                self.optimistic.remove(handle).await;
            }
        }
        self.queue.clear().await;

        tracing::info!(
            target: "offline::service",
            discarded = entries.len(),
            "pending offline changes discarded"
        );
        entries.len()
    }

    async fn connectivity_changed(&self, online: bool) -> Option<SyncRunOutcome> {
        self.connectivity.set_online(online);
        if !online {
            return None;
        }
        if !self.sync_config.auto_sync_on_reconnect || !self.queue.has_pending().await {
            return None;
        }
        Some(self.engine.trigger_sync().await)
    }

    fn metrics(&self) -> SyncMetricsSnapshot {
        self.engine.metrics_snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{RecordingNotifier, StubGateway};
    use super::*;
    use crate::application::ports::DisplayCacheStore;
    use crate::domain::value_objects::RequestDescriptor;
    use crate::infrastructure::database::ConnectionPool;
    use crate::infrastructure::{
        InMemoryQueryCache, InMemorySessionGateway, SharedConnectivity, SqliteDisplayCache,
        SqliteQueueStore,
    };
    use crate::shared::metrics::SyncMetrics;
    use serde_json::json;

    struct Fixture {
        service: OfflineService,
        queue: Arc<SqliteQueueStore>,
        optimistic: Arc<OptimisticUpdater>,
        display_cache: Arc<SqliteDisplayCache>,
    }

    async fn setup(online: bool) -> Fixture {
        let pool = ConnectionPool::from_memory().await.unwrap();
        pool.migrate().await.unwrap();

        let queue = Arc::new(
            SqliteQueueStore::load(pool.get_pool().clone())
                .await
                .unwrap(),
        );
        let display_cache = Arc::new(
            SqliteDisplayCache::load(pool.get_pool().clone())
                .await
                .unwrap(),
        );
        let query_cache = Arc::new(InMemoryQueryCache::new());
        let optimistic = Arc::new(OptimisticUpdater::new(
            query_cache.clone(),
            display_cache.clone(),
        ));
        let connectivity = Arc::new(SharedConnectivity::new(online));
        let engine = Arc::new(SyncEngine::new(
            queue.clone(),
            optimistic.clone(),
            query_cache,
            Arc::new(StubGateway::new()),
            Arc::new(InMemorySessionGateway::with_token("jwt")),
            connectivity.clone(),
            Arc::new(RecordingNotifier::new()),
            Arc::new(SyncMetrics::new()),
        ));

        let service = OfflineService::new(
            queue.clone(),
            optimistic.clone(),
            engine,
            connectivity,
            SyncConfig {
                auto_sync_on_reconnect: true,
            },
        );

        Fixture {
            service,
            queue,
            optimistic,
            display_cache,
        }
    }

    async fn enqueue_sample(fixture: &Fixture) {
        let descriptor = RequestDescriptor::post(
            "/transactions",
            json!({
                "date": "2025-01-01",
                "amount": 50,
                "currency": "USD",
                "type": "expense",
                "budget_period_id": 7
            }),
        );
        let optimistic = fixture.optimistic.apply(&descriptor).await;
        fixture
            .queue
            .enqueue(crate::domain::entities::QueuedRequestDraft::new(
                descriptor,
                "Create transaction",
                optimistic,
                None,
            ))
            .await;
    }

    #[tokio::test]
    async fn pending_state_tracks_the_queue() {
        let fixture = setup(true).await;
        assert!(!fixture.service.has_pending_changes().await);
        assert_eq!(fixture.service.pending_count().await, 0);

        enqueue_sample(&fixture).await;
        assert!(fixture.service.has_pending_changes().await);
        assert_eq!(fixture.service.pending_count().await, 1);
        assert_eq!(fixture.service.pending_requests().await.len(), 1);
        assert!(!fixture.service.is_syncing());
    }

    #[tokio::test]
    async fn discard_drops_entries_and_placeholders() {
        let fixture = setup(true).await;
        enqueue_sample(&fixture).await;
        enqueue_sample(&fixture).await;

        let discarded = fixture.service.discard_pending().await;
        assert_eq!(discarded, 2);
        assert_eq!(fixture.service.pending_count().await, 0);
        assert_eq!(fixture.display_cache.len().await, 0);
    }

    #[tokio::test]
    async fn reconnect_with_pending_entries_triggers_a_sync() {
        let fixture = setup(false).await;
        enqueue_sample(&fixture).await;

        let outcome = fixture.service.connectivity_changed(true).await;
        let report = outcome
            .as_ref()
            .and_then(|outcome| outcome.report())
            .expect("sync ran on reconnect");
        assert_eq!(report.processed, 1);
        assert_eq!(fixture.service.pending_count().await, 0);
    }

    #[tokio::test]
    async fn reconnect_with_an_empty_queue_is_quiet() {
        let fixture = setup(false).await;
        assert!(fixture.service.connectivity_changed(true).await.is_none());
        assert!(fixture.service.connectivity_changed(false).await.is_none());
    }
}
