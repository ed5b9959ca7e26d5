use serde::{Deserialize, Serialize};

/// エンキュー時に記録されるセッション文脈。再送時の不一致検出（警告のみ）に使う。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncContext {
    pub workspace_id: Option<i64>,
    pub account_id: Option<i64>,
}

impl SyncContext {
    pub fn new(workspace_id: Option<i64>, account_id: Option<i64>) -> Self {
        Self {
            workspace_id,
            account_id,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.workspace_id.is_none() && self.account_id.is_none()
    }

    /// Mismatch only counts where both sides actually captured a value.
    pub fn differs_from(&self, other: &SyncContext) -> bool {
        let workspace_changed = match (self.workspace_id, other.workspace_id) {
            (Some(a), Some(b)) => a != b,
            _ => false,
        };
        let account_changed = match (self.account_id, other.account_id) {
            (Some(a), Some(b)) => a != b,
            _ => false,
        };
        workspace_changed || account_changed
    }
}
