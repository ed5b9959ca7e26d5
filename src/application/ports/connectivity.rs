/// 到達性の現在値。ホスト側の reachability イベントで更新される。
pub trait ConnectivityMonitor: Send + Sync {
    fn is_online(&self) -> bool;

    fn set_online(&self, online: bool);
}
