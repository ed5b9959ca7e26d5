use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub database: DatabaseConfig,
    pub sync: SyncConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    /// リクエストタイムアウト（秒）。HTTPクライアント側で適用される。
    pub request_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// オフライン→オンライン遷移時に自動で同期を起動するか。
    pub auto_sync_on_reconnect: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        let data_dir = default_data_dir();
        let database_url = format!(
            "sqlite://{}/monie-offline.db?mode=rwc",
            data_dir.to_string_lossy()
        );

        Self {
            api: ApiConfig {
                base_url: "http://localhost:8000/api".to_string(),
                request_timeout: 30,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections: 5,
            },
            sync: SyncConfig {
                auto_sync_on_reconnect: true,
            },
            storage: StorageConfig {
                data_dir: data_dir.to_string_lossy().to_string(),
            },
        }
    }
}

fn default_data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("monie");
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_points_at_local_api() {
        let config = AppConfig::default();
        assert!(config.api.base_url.starts_with("http://"));
        assert!(config.database.url.starts_with("sqlite://"));
        assert!(config.sync.auto_sync_on_reconnect);
    }
}
