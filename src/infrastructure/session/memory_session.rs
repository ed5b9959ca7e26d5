use crate::application::ports::SessionGateway;
use crate::domain::value_objects::SyncContext;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

/// テストおよび組み込み用のインメモリセッション。
#[derive(Default)]
pub struct InMemorySessionGateway {
    token: RwLock<Option<String>>,
    context: RwLock<SyncContext>,
    login_boundary: AtomicBool,
    expired: AtomicBool,
}

impl InMemorySessionGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        let gateway = Self::new();
        gateway.set_token(Some(token.into()));
        gateway
    }

    pub fn set_token(&self, token: Option<String>) {
        if let Ok(mut guard) = self.token.write() {
            *guard = token;
        }
        self.expired.store(false, Ordering::Release);
    }

    pub fn set_context(&self, context: SyncContext) {
        if let Ok(mut guard) = self.context.write() {
            *guard = context;
        }
    }

    pub fn set_login_boundary(&self, on_boundary: bool) {
        self.login_boundary.store(on_boundary, Ordering::Release);
    }

    pub fn is_expired(&self) -> bool {
        self.expired.load(Ordering::Acquire)
    }
}

impl SessionGateway for InMemorySessionGateway {
    fn bearer_token(&self) -> Option<String> {
        self.token.read().ok().and_then(|guard| guard.clone())
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
        if let Ok(mut guard) = self.token.write() {
            *guard = None;
        }
        self.expired.store(true, Ordering::Release);
    }
}
