use crate::domain::value_objects::RequestDescriptor;
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// HTTP送信の失敗分類。応答なし（接続断）とHTTPエラー応答を区別する。
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Network unreachable: {0}")]
    Connectivity(String),

    #[error("HTTP {status}: {message}")]
    Status {
        status: u16,
        message: String,
        body: Option<Value>,
    },

    #[error("Request could not be built: {0}")]
    InvalidRequest(String),
}

impl GatewayError {
    pub fn is_connectivity(&self) -> bool {
        matches!(self, GatewayError::Connectivity(_))
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Outbound HTTP boundary. Implementations attach the bearer credential and
/// return the decoded JSON body on success.
#[async_trait]
pub trait HttpGateway: Send + Sync {
    async fn send(
        &self,
        request: &RequestDescriptor,
        bearer: Option<&str>,
    ) -> Result<Value, GatewayError>;
}
