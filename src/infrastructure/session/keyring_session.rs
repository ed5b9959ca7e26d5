use crate::application::ports::SessionGateway;
use crate::domain::value_objects::SyncContext;
use crate::shared::config::StorageConfig;
use anyhow::{Context, Result};
use keyring::Entry;
use std::fs;
use std::path::PathBuf;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

const SERVICE_NAME: &str = "monie";
const TOKEN_KEY: &str = "api_token";

/// OSキーチェーンにベアラートークンを保存するセッションゲートウェイ。
/// キーチェーンが使えない環境（WSL等）ではデータディレクトリ配下の
/// ファイルにフォールバックする。
pub struct KeyringSessionGateway {
    context: RwLock<SyncContext>,
    login_boundary: AtomicBool,
    expired: AtomicBool,
    use_fallback: bool,
    fallback_dir: PathBuf,
}

impl KeyringSessionGateway {
    pub fn new(storage: &StorageConfig) -> Self {
        let mut fallback_dir = PathBuf::from(&storage.data_dir);
        fallback_dir.push("session");

        Self {
            context: RwLock::new(SyncContext::default()),
            login_boundary: AtomicBool::new(false),
            expired: AtomicBool::new(false),
            use_fallback: Self::is_wsl(),
            fallback_dir,
        }
    }

    fn is_wsl() -> bool {
        if cfg!(target_os = "linux") {
            if let Ok(osrelease) = fs::read_to_string("/proc/sys/kernel/osrelease") {
                return osrelease.to_lowercase().contains("microsoft");
            }
        }
        false
    }

    pub fn store_token(&self, token: &str) -> Result<()> {
        self.expired.store(false, Ordering::Release);

        if self.use_fallback {
            return self.write_fallback(token);
        }

        let entry = Entry::new(SERVICE_NAME, TOKEN_KEY).context("Failed to create keyring entry")?;
        match entry.set_password(token) {
            Ok(()) => Ok(()),
            Err(err) => {
                tracing::warn!(
                    target: "session",
                    error = %err,
                    "keyring unavailable, using file fallback"
                );
                self.write_fallback(token)
            }
        }
    }

    fn read_token(&self) -> Result<Option<String>> {
        if self.use_fallback {
            return self.read_fallback();
        }

        let entry = Entry::new(SERVICE_NAME, TOKEN_KEY).context("Failed to create keyring entry")?;
        match entry.get_password() {
            Ok(token) => Ok(Some(token)),
            Err(keyring::Error::NoEntry) => self.read_fallback(),
            Err(err) => Err(err).context("Failed to read keyring entry"),
        }
    }

    fn delete_token(&self) -> Result<()> {
        if !self.use_fallback {
            if let Ok(entry) = Entry::new(SERVICE_NAME, TOKEN_KEY) {
                match entry.delete_credential() {
                    Ok(()) | Err(keyring::Error::NoEntry) => {}
                    Err(err) => {
                        tracing::warn!(target: "session", error = %err, "keyring delete failed");
                    }
                }
            }
        }
        self.delete_fallback()
    }

    fn token_path(&self) -> PathBuf {
        let mut path = self.fallback_dir.clone();
        path.push(format!("{TOKEN_KEY}.json"));
        path
    }

    fn write_fallback(&self, token: &str) -> Result<()> {
        fs::create_dir_all(&self.fallback_dir).context("Failed to create session dir")?;
        fs::write(self.token_path(), token).context("Failed to write token file")?;
        Ok(())
    }

    fn read_fallback(&self) -> Result<Option<String>> {
        let path = self.token_path();
        if !path.exists() {
            return Ok(None);
        }
        let token = fs::read_to_string(&path).context("Failed to read token file")?;
        Ok(Some(token))
    }

    fn delete_fallback(&self) -> Result<()> {
        let path = self.token_path();
        if path.exists() {
            fs::remove_file(&path).context("Failed to remove token file")?;
        }
        Ok(())
    }

    pub fn set_context(&self, context: SyncContext) {
        if let Ok(mut guard) = self.context.write() {
            *guard = context;
        }
    }

    pub fn set_login_boundary(&self, on_boundary: bool) {
        self.login_boundary.store(on_boundary, Ordering::Release);
    }

    /// ホストシェルがログイン画面へ誘導すべきかどうか。
    pub fn is_expired(&self) -> bool {
        self.expired.load(Ordering::Acquire)
    }
}

impl SessionGateway for KeyringSessionGateway {
    fn bearer_token(&self) -> Option<String> {
        match self.read_token() {
            Ok(token) => token,
            Err(err) => {
                tracing::warn!(target: "session", error = %err, "bearer token unreadable");
                None
            }
        }
    }

    fn current_context(&self) -> SyncContext {
        self.context
            .read()
            .map(|guard| *guard)
            .unwrap_or_default()
    }

    fn on_login_boundary(&self) -> bool {
        self.login_boundary.load(Ordering::Acquire)
    }

    fn expire(&self) {
        if let Err(err) = self.delete_token() {
            tracing::warn!(target: "session", error = %err, "credential clear failed");
        }
        self.expired.store(true, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn gateway_with_fallback(dir: &TempDir) -> KeyringSessionGateway {
        let mut gateway = KeyringSessionGateway::new(&StorageConfig {
            data_dir: dir.path().to_string_lossy().to_string(),
        });
        // Force the file path so the test never touches a real keychain.
        gateway.use_fallback = true;
        gateway
    }

    #[test]
    fn token_round_trip_through_fallback() {
        let dir = TempDir::new().unwrap();
        let gateway = gateway_with_fallback(&dir);

        assert_eq!(gateway.bearer_token(), None);
        gateway.store_token("jwt-abc").unwrap();
        assert_eq!(gateway.bearer_token(), Some("jwt-abc".to_string()));
    }

    #[test]
    fn expire_clears_the_stored_credential() {
        let dir = TempDir::new().unwrap();
        let gateway = gateway_with_fallback(&dir);
        gateway.store_token("jwt-abc").unwrap();

        gateway.expire();
        assert_eq!(gateway.bearer_token(), None);
        assert!(gateway.is_expired());

        gateway.store_token("jwt-next").unwrap();
        assert!(!gateway.is_expired());
    }
}
