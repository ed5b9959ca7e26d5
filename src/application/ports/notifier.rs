use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

/// ユーザー通知（トースト）の境界。ブロッキングなエラーダイアログは出さない。
#[async_trait]
pub trait UserNotifier: Send + Sync {
    async fn notify(&self, level: NoticeLevel, message: &str);
}
