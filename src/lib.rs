pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
pub mod shared;
pub mod state;

pub use application::services::{DispatchOutcome, OfflineServiceTrait, RequestDispatcher};
pub use domain::entities::{SyncProgress, SyncRunOutcome, SyncRunReport};
pub use domain::value_objects::{HttpMethod, RequestDescriptor};
pub use shared::{AppError, AppConfig, Result};
pub use state::AppState;

use tracing_subscriber::EnvFilter;

/// ログ設定の初期化。二重初期化は無視する。
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
