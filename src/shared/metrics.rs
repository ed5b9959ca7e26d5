use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

pub const UNSET_TS: u64 = 0;

/// Counters for the offline mutation pipeline. Shared across the dispatcher
/// and the sync engine, read through `snapshot()`.
#[derive(Debug)]
pub struct SyncMetrics {
    queued: AtomicU64,
    replayed: AtomicU64,
    failed: AtomicU64,
    last_run_ms: AtomicU64,
}

#[derive(Debug, Clone, Copy)]
pub struct SyncMetricsSnapshot {
    pub queued: u64,
    pub replayed: u64,
    pub failed: u64,
    pub last_run_ms: Option<u64>,
}

impl SyncMetrics {
    pub const fn new() -> Self {
        Self {
            queued: AtomicU64::new(0),
            replayed: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            last_run_ms: AtomicU64::new(UNSET_TS),
        }
    }

    pub fn record_queued(&self) {
        self.queued.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_replayed(&self) {
        self.replayed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_run(&self) {
        self.last_run_ms.store(current_unix_ms(), Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> SyncMetricsSnapshot {
        SyncMetricsSnapshot {
            queued: self.queued.load(Ordering::Relaxed),
            replayed: self.replayed.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            last_run_ms: timestamp_to_option(self.last_run_ms.load(Ordering::Relaxed)),
        }
    }

    pub fn reset(&self) {
        self.queued.store(0, Ordering::Relaxed);
        self.replayed.store(0, Ordering::Relaxed);
        self.failed.store(0, Ordering::Relaxed);
        self.last_run_ms.store(UNSET_TS, Ordering::Relaxed);
    }
}

impl Default for SyncMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
pub fn current_unix_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_millis() as u64)
        .unwrap_or(UNSET_TS)
}

#[inline]
pub fn timestamp_to_option(value: u64) -> Option<u64> {
    if value == UNSET_TS { None } else { Some(value) }
}
