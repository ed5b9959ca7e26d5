use serde::{Deserialize, Serialize};
use std::fmt;

/// クエリキャッシュの複合キー。`<segment>` または `<segment>:<scope>` 形式。
///
/// Lookup keys match any stored entry key that is equal to them or refines
/// them with further `:`-separated segments, so `transactions:7` reaches
/// both `transactions:7` and `transactions:7:recent`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(value: String) -> Result<Self, String> {
        if value.trim().is_empty() {
            return Err("Cache key cannot be empty".to_string());
        }
        Ok(Self(value))
    }

    pub fn scoped(segment: &str, scope: Option<i64>) -> Self {
        match scope {
            Some(id) => Self(format!("{segment}:{id}")),
            None => Self(segment.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn matches_entry(&self, stored_key: &str) -> bool {
        stored_key == self.0 || stored_key.starts_with(&format!("{}:", self.0))
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<CacheKey> for String {
    fn from(key: CacheKey) -> Self {
        key.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scoped_key_includes_scope_id() {
        let key = CacheKey::scoped("transactions", Some(7));
        assert_eq!(key.as_str(), "transactions:7");

        let unscoped = CacheKey::scoped("budget-periods", None);
        assert_eq!(unscoped.as_str(), "budget-periods");
    }

    #[test]
    fn matching_covers_exact_and_refined_keys() {
        let key = CacheKey::scoped("transactions", Some(7));
        assert!(key.matches_entry("transactions:7"));
        assert!(key.matches_entry("transactions:7:recent"));
        assert!(!key.matches_entry("transactions:70"));
        assert!(!key.matches_entry("categories:7"));
    }
}
