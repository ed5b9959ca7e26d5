use crate::application::ports::UserNotifier;
use crate::application::services::{
    OfflineService, OfflineServiceTrait, OptimisticUpdater, RequestDispatcher, SyncEngine,
};
use crate::infrastructure::{
    ConnectionPool, InMemoryQueryCache, KeyringSessionGateway, ReqwestGateway, SharedConnectivity,
    SqliteDisplayCache, SqliteQueueStore, TracingNotifier,
};
use crate::presentation::handlers::OfflineHandler;
use crate::shared::config::AppConfig;
use crate::shared::error::AppError;
use crate::shared::metrics::SyncMetrics;
use std::sync::Arc;

/// アプリケーション全体の状態。依存の配線はここで一度だけ行う。
#[derive(Clone)]
pub struct AppState {
    pub pool: ConnectionPool,
    pub query_cache: Arc<InMemoryQueryCache>,
    pub session: Arc<KeyringSessionGateway>,
    pub connectivity: Arc<SharedConnectivity>,
    pub dispatcher: Arc<RequestDispatcher>,
    pub offline_service: Arc<dyn OfflineServiceTrait>,
    pub offline_handler: Arc<OfflineHandler>,
}

impl AppState {
    pub async fn new(config: AppConfig) -> Result<Self, AppError> {
        Self::with_notifier(config, Arc::new(TracingNotifier::new())).await
    }

    /// ホストシェルが自前のトースト実装を差し込むための入り口。
    pub async fn with_notifier(
        config: AppConfig,
        notifier: Arc<dyn UserNotifier>,
    ) -> Result<Self, AppError> {
        std::fs::create_dir_all(&config.storage.data_dir)
            .map_err(|err| AppError::Storage(err.to_string()))?;

        let pool =
            ConnectionPool::new(&config.database.url, config.database.max_connections).await?;
        pool.migrate().await?;

        let queue = Arc::new(SqliteQueueStore::load(pool.get_pool().clone()).await?);
        let display_cache = Arc::new(SqliteDisplayCache::load(pool.get_pool().clone()).await?);
        let query_cache = Arc::new(InMemoryQueryCache::new());
        let optimistic = Arc::new(OptimisticUpdater::new(
            query_cache.clone(),
            display_cache.clone(),
        ));

        // 前回セッションの投機レコードを復元する。
        let restored = optimistic.rehydrate().await;
        if restored > 0 {
            tracing::info!(restored, "restored offline placeholders from the display cache");
        }

        let gateway = Arc::new(ReqwestGateway::new(&config.api)?);
        let session = Arc::new(KeyringSessionGateway::new(&config.storage));
        let connectivity = Arc::new(SharedConnectivity::new(true));
        let metrics = Arc::new(SyncMetrics::new());

        let dispatcher = Arc::new(RequestDispatcher::new(
            gateway.clone(),
            queue.clone(),
            optimistic.clone(),
            session.clone(),
            connectivity.clone(),
            notifier.clone(),
            metrics.clone(),
        ));
        let engine = Arc::new(SyncEngine::new(
            queue.clone(),
            optimistic.clone(),
            query_cache.clone(),
            gateway,
            session.clone(),
            connectivity.clone(),
            notifier,
            metrics,
        ));
        let offline_service: Arc<dyn OfflineServiceTrait> = Arc::new(OfflineService::new(
            queue,
            optimistic,
            engine,
            connectivity.clone(),
            config.sync.clone(),
        ));
        let offline_handler = Arc::new(OfflineHandler::new(offline_service.clone()));

        Ok(Self {
            pool,
            query_cache,
            session,
            connectivity,
            dispatcher,
            offline_service,
            offline_handler,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::ConnectivityMonitor;
    use crate::domain::value_objects::RequestDescriptor;
    use crate::shared::config::{ApiConfig, DatabaseConfig, StorageConfig, SyncConfig};
    use serde_json::json;
    use tempfile::TempDir;

    fn test_config(dir: &TempDir) -> AppConfig {
        AppConfig {
            api: ApiConfig {
                base_url: "http://localhost:8000/api".to_string(),
                request_timeout: 5,
            },
            database: DatabaseConfig {
                url: "sqlite::memory:".to_string(),
                max_connections: 1,
            },
            sync: SyncConfig {
                auto_sync_on_reconnect: true,
            },
            storage: StorageConfig {
                data_dir: dir.path().to_string_lossy().to_string(),
            },
        }
    }

    #[tokio::test]
    async fn wiring_supports_an_offline_round_trip() {
        let dir = TempDir::new().unwrap();
        let state = AppState::new(test_config(&dir)).await.unwrap();

        state.connectivity.set_online(false);
        let outcome = state
            .dispatcher
            .send(
                RequestDescriptor::post(
                    "/transactions",
                    json!({
                        "date": "2025-01-01",
                        "amount": 50,
                        "currency": "USD",
                        "type": "expense",
                        "budget_period_id": 7
                    }),
                ),
                "Create transaction",
            )
            .await
            .unwrap();

        assert!(outcome.was_queued());
        let status = state.offline_handler.get_sync_status().await.unwrap();
        assert!(status.has_pending_changes);
        assert_eq!(status.pending_count, 1);
    }
}
