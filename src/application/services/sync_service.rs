use super::optimistic_service::OptimisticUpdater;
use crate::application::ports::{
    ConnectivityMonitor, HttpGateway, NoticeLevel, QueryCache, QueueStore, SessionGateway,
    UserNotifier,
};
use crate::domain::entities::{SyncFailure, SyncProgress, SyncRunOutcome, SyncRunReport};
use crate::shared::metrics::SyncMetrics;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

const OFFLINE_SYNC_NOTICE: &str = "Still offline. Your changes will sync once you're back online.";

/// キューのドレインと各結果の突き合わせを担う同期エンジン。
///
/// One run at a time: the `running` flag is the only guard, checked at entry.
/// Entries are replayed strictly in enqueue order and removed after their
/// single attempt whether it succeeded or not. There is deliberately no
/// retry: without server-side idempotency keys a blind retry risks duplicate
/// writes, so a failed entry is dropped and reported instead.
pub struct SyncEngine {
    queue: Arc<dyn QueueStore>,
    optimistic: Arc<OptimisticUpdater>,
    query_cache: Arc<dyn QueryCache>,
    gateway: Arc<dyn HttpGateway>,
    session: Arc<dyn SessionGateway>,
    connectivity: Arc<dyn ConnectivityMonitor>,
    notifier: Arc<dyn UserNotifier>,
    metrics: Arc<SyncMetrics>,
    running: AtomicBool,
    progress: RwLock<SyncProgress>,
}

impl SyncEngine {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        queue: Arc<dyn QueueStore>,
        optimistic: Arc<OptimisticUpdater>,
        query_cache: Arc<dyn QueryCache>,
        gateway: Arc<dyn HttpGateway>,
        session: Arc<dyn SessionGateway>,
        connectivity: Arc<dyn ConnectivityMonitor>,
        notifier: Arc<dyn UserNotifier>,
        metrics: Arc<SyncMetrics>,
    ) -> Self {
        Self {
            queue,
            optimistic,
            query_cache,
            gateway,
            session,
            connectivity,
            notifier,
            metrics,
            running: AtomicBool::new(false),
            progress: RwLock::new(SyncProgress::default()),
        }
    }

    pub fn is_syncing(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    pub async fn progress(&self) -> SyncProgress {
        *self.progress.read().await
    }

    pub fn metrics_snapshot(&self) -> crate::shared::metrics::SyncMetricsSnapshot {
        self.metrics.snapshot()
    }

    /// キューを1回ドレインする。実行中の再入はno-op。
    pub async fn trigger_sync(&self) -> SyncRunOutcome {
        if self
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!(target: "offline::sync", "sync already in progress, trigger ignored");
            return SyncRunOutcome::AlreadyRunning;
        }

        let outcome = self.drain().await;

        *self.progress.write().await = SyncProgress::default();
        self.running.store(false, Ordering::Release);
        outcome
    }

    async fn drain(&self) -> SyncRunOutcome {
        // Entries enqueued while this run is in flight are left for the next
        // trigger.
        let snapshot = self.queue.list().await;
        if snapshot.is_empty() {
            return SyncRunOutcome::Completed(SyncRunReport::empty());
        }

        if !self.connectivity.is_online() {
            self.notifier
                .notify(NoticeLevel::Error, OFFLINE_SYNC_NOTICE)
                .await;
            return SyncRunOutcome::Offline;
        }

        let total = snapshot.len() as u32;
        let current_context = self.session.current_context();
        let mut processed = 0u32;
        let mut failed = 0u32;
        let mut failures: Vec<SyncFailure> = Vec::new();

        tracing::info!(target: "offline::sync", total, "sync run started");

        for (index, entry) in snapshot.iter().enumerate() {
            *self.progress.write().await = SyncProgress::new(index as u32 + 1, total);

            if let Some(captured) = entry.context {
                if captured.differs_from(&current_context) {
                    // Informational only; server-side authorization is the
                    // actual gate for a replay issued under another context.
                    tracing::warn!(
                        target: "offline::sync",
                        request_id = %entry.id,
                        ?captured,
                        ?current_context,
                        "queued entry context differs from the current session"
                    );
                }
            }

            // Replay with the current credential, not the one that was live
            // at enqueue time.
            let bearer = self.session.bearer_token();
            let result = self.gateway.send(&entry.descriptor, bearer.as_deref()).await;

            if let Some(handle) = &entry.optimistic {
                self.optimistic.remove(handle).await;
            }
            self.queue.remove(&entry.id).await;

            match result {
                Ok(_) => {
                    processed += 1;
                    self.metrics.record_replayed();
                }
                Err(err) => {
                    failed += 1;
                    self.metrics.record_failed();
                    tracing::warn!(
                        target: "offline::sync",
                        request_id = %entry.id,
                        description = %entry.description,
                        error = %err,
                        "queued entry dropped after failed replay"
                    );
                    failures.push(SyncFailure {
                        description: entry.description.clone(),
                        message: err.to_string(),
                    });
                }
            }
        }

        // Server state is authoritative now that every placeholder is gone.
        self.query_cache.invalidate_all().await;
        self.metrics.record_run();

        let report = SyncRunReport {
            success: failed == 0,
            processed,
            failed,
            failures,
        };

        if report.success {
            self.notifier
                .notify(
                    NoticeLevel::Success,
                    &format!("{processed} offline change(s) synced."),
                )
                .await;
        } else {
            self.notifier
                .notify(
                    NoticeLevel::Error,
                    &format!("{failed} of {total} offline change(s) failed to sync."),
                )
                .await;
        }

        tracing::info!(target: "offline::sync", processed, failed, "sync run finished");
        SyncRunOutcome::Completed(report)
    }
}
