use super::optimistic_service::OptimisticUpdater;
use crate::application::ports::{
    ConnectivityMonitor, GatewayError, HttpGateway, NoticeLevel, QueueStore, SessionGateway,
    UserNotifier,
};
use crate::domain::entities::QueuedRequestDraft;
use crate::domain::value_objects::{QueuedRequestId, RequestDescriptor, TempId};
use crate::shared::error::AppError;
use crate::shared::metrics::SyncMetrics;
use serde_json::Value;
use std::sync::Arc;

const OFFLINE_SAVED_NOTICE: &str = "Saved offline. Your change will sync when you're back online.";

/// 送信結果。キュー退避は失敗ではなく、呼び出し側はエラー表示してはならない。
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    Completed(Value),
    QueuedOffline {
        request_id: QueuedRequestId,
        temp_id: Option<TempId>,
    },
}

impl DispatchOutcome {
    pub fn was_queued(&self) -> bool {
        matches!(self, DispatchOutcome::QueuedOffline { .. })
    }
}

/// 全ての送信リクエストを通すインターセプター。
///
/// Mutations (POST/PUT/DELETE) are redirected into the offline queue when
/// connectivity is known to be down or the network call itself fails without
/// an HTTP response. Everything else passes through, except a 401 which
/// tears the session down.
pub struct RequestDispatcher {
    gateway: Arc<dyn HttpGateway>,
    queue: Arc<dyn QueueStore>,
    optimistic: Arc<OptimisticUpdater>,
    session: Arc<dyn SessionGateway>,
    connectivity: Arc<dyn ConnectivityMonitor>,
    notifier: Arc<dyn UserNotifier>,
    metrics: Arc<SyncMetrics>,
}

impl RequestDispatcher {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        gateway: Arc<dyn HttpGateway>,
        queue: Arc<dyn QueueStore>,
        optimistic: Arc<OptimisticUpdater>,
        session: Arc<dyn SessionGateway>,
        connectivity: Arc<dyn ConnectivityMonitor>,
        notifier: Arc<dyn UserNotifier>,
        metrics: Arc<SyncMetrics>,
    ) -> Self {
        Self {
            gateway,
            queue,
            optimistic,
            session,
            connectivity,
            notifier,
            metrics,
        }
    }

    pub async fn send(
        &self,
        descriptor: RequestDescriptor,
        description: impl Into<String>,
    ) -> Result<DispatchOutcome, AppError> {
        let description = description.into();
        let is_mutation = descriptor.method.is_mutation();

        // Pre-flight: a mutation with connectivity already known to be down
        // never reaches the network.
        if is_mutation && !self.connectivity.is_online() {
            return Ok(self.queue_offline(descriptor, description).await);
        }

        let bearer = self.session.bearer_token();
        match self.gateway.send(&descriptor, bearer.as_deref()).await {
            Ok(body) => Ok(DispatchOutcome::Completed(body)),
            Err(err) if err.is_connectivity() && is_mutation => {
                // Reactive path: the call itself failed without a response.
                Ok(self.queue_offline(descriptor, description).await)
            }
            Err(err) => Err(self.map_error(err)),
        }
    }

    async fn queue_offline(
        &self,
        descriptor: RequestDescriptor,
        description: String,
    ) -> DispatchOutcome {
        let optimistic = self.optimistic.apply(&descriptor).await;
        let temp_id = optimistic.as_ref().map(|handle| handle.temp_id.clone());

        let context = self.session.current_context();
        let draft = QueuedRequestDraft::new(
            descriptor,
            description,
            optimistic,
            (!context.is_empty()).then_some(context),
        );
        let request = self.queue.enqueue(draft).await;
        self.metrics.record_queued();

        tracing::info!(
            target: "offline::dispatch",
            request_id = %request.id,
            description = %request.description,
            "mutation queued for later sync"
        );
        self.notifier
            .notify(NoticeLevel::Success, OFFLINE_SAVED_NOTICE)
            .await;

        DispatchOutcome::QueuedOffline {
            request_id: request.id,
            temp_id,
        }
    }

    fn map_error(&self, err: GatewayError) -> AppError {
        match err {
            GatewayError::Status {
                status: 401,
                message,
                ..
            } => {
                if !self.session.on_login_boundary() {
                    self.session.expire();
                }
                AppError::Unauthorized(message)
            }
            GatewayError::Status {
                status, message, ..
            } => AppError::Http { status, message },
            GatewayError::Connectivity(message) => AppError::Network(message),
            GatewayError::InvalidRequest(message) => AppError::InvalidInput(message),
        }
    }
}
