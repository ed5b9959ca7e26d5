use crate::application::ports::{GatewayError, HttpGateway, NoticeLevel, UserNotifier};
use crate::domain::value_objects::RequestDescriptor;
use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::VecDeque;
use tokio::sync::Mutex;

/// Scripted HTTP gateway: replays queued outcomes and records every call.
#[derive(Default)]
pub struct StubGateway {
    calls: Mutex<Vec<(RequestDescriptor, Option<String>)>>,
    outcomes: Mutex<VecDeque<Result<Value, GatewayError>>>,
}

impl StubGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn push_ok(&self, body: Value) {
        self.outcomes.lock().await.push_back(Ok(body));
    }

    pub async fn push_err(&self, error: GatewayError) {
        self.outcomes.lock().await.push_back(Err(error));
    }

    pub async fn push_offline(&self) {
        self.push_err(GatewayError::Connectivity("connection refused".into()))
            .await;
    }

    pub async fn push_status(&self, status: u16) {
        self.push_err(GatewayError::Status {
            status,
            message: format!("status {status}"),
            body: None,
        })
        .await;
    }

    pub async fn calls(&self) -> Vec<(RequestDescriptor, Option<String>)> {
        self.calls.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.calls.lock().await.len()
    }
}

#[async_trait]
impl HttpGateway for StubGateway {
    async fn send(
        &self,
        request: &RequestDescriptor,
        bearer: Option<&str>,
    ) -> Result<Value, GatewayError> {
        self.calls
            .lock()
            .await
            .push((request.clone(), bearer.map(ToString::to_string)));

        match self.outcomes.lock().await.pop_front() {
            Some(outcome) => outcome,
            None => Ok(json!({"id": 1})),
        }
    }
}

/// Captures every notice for assertions.
#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<(NoticeLevel, String)>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn notices(&self) -> Vec<(NoticeLevel, String)> {
        self.notices.lock().await.clone()
    }
}

#[async_trait]
impl UserNotifier for RecordingNotifier {
    async fn notify(&self, level: NoticeLevel, message: &str) {
        self.notices.lock().await.push((level, message.to_string()));
    }
}
