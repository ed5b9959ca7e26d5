use crate::domain::value_objects::SyncContext;

/// 認証セッションの境界。トークンの取得・失効と現在の作業文脈を提供する。
///
/// `expire` clears the stored credential and flags the host shell to present
/// the login boundary; it is invoked on a 401 unless the user is already on
/// an unauthenticated route.
pub trait SessionGateway: Send + Sync {
    fn bearer_token(&self) -> Option<String>;

    fn current_context(&self) -> SyncContext;

    fn on_login_boundary(&self) -> bool;

    fn expire(&self);
}
