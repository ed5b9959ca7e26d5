use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// キュー内の保留中リクエストを識別するID。挿入時刻＋乱数サフィックスで生成される。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueuedRequestId(String);

impl QueuedRequestId {
    pub fn new(value: String) -> Result<Self, String> {
        Self::validate(&value)?;
        Ok(Self(value))
    }

    pub fn generate() -> Self {
        let suffix: u32 = rand::thread_rng().gen();
        Self(format!("{}-{:08x}", Utc::now().timestamp_millis(), suffix))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(value: &str) -> Result<(), String> {
        if value.trim().is_empty() {
            return Err("Queued request ID cannot be empty".to_string());
        }
        Ok(())
    }
}

impl fmt::Display for QueuedRequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<QueuedRequestId> for String {
    fn from(id: QueuedRequestId) -> Self {
        id.0
    }
}

impl FromStr for QueuedRequestId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}
