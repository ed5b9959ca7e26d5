use serde::{Deserialize, Serialize};

/// 同期実行中の進捗（現在のインデックス / 総数）。アイドル時はゼロ。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncProgress {
    pub current: u32,
    pub total: u32,
}

impl SyncProgress {
    pub fn new(current: u32, total: u32) -> Self {
        Self { current, total }
    }
}

/// 再送に失敗したエントリの記録。説明文をキーにユーザーへ提示される。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncFailure {
    pub description: String,
    pub message: String,
}

/// 1回のドレイン実行の集計結果。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncRunReport {
    pub success: bool,
    pub processed: u32,
    pub failed: u32,
    pub failures: Vec<SyncFailure>,
}

impl SyncRunReport {
    pub fn empty() -> Self {
        Self {
            success: true,
            processed: 0,
            failed: 0,
            failures: Vec::new(),
        }
    }
}

/// `trigger_sync` の結果。実行中の再入とオフライン中断は成功レポートと区別される。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncRunOutcome {
    /// A drain run is already in progress; the trigger was a no-op.
    AlreadyRunning,
    /// Connectivity was down at trigger time; the queue was left untouched.
    Offline,
    Completed(SyncRunReport),
}

impl SyncRunOutcome {
    pub fn report(&self) -> Option<&SyncRunReport> {
        match self {
            SyncRunOutcome::Completed(report) => Some(report),
            _ => None,
        }
    }
}
