use crate::application::ports::{NoticeLevel, UserNotifier};
use async_trait::async_trait;

/// トーストを出すホストが居ない構成向けの既定実装。通知をログに流すだけ。
#[derive(Default)]
pub struct TracingNotifier;

impl TracingNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl UserNotifier for TracingNotifier {
    async fn notify(&self, level: NoticeLevel, message: &str) {
        match level {
            NoticeLevel::Success | NoticeLevel::Info => {
                tracing::info!(target: "monie::notify", "{message}");
            }
            NoticeLevel::Error => {
                tracing::error!(target: "monie::notify", "{message}");
            }
        }
    }
}
