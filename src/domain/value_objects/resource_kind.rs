use serde::{Deserialize, Serialize};
use std::fmt;

/// 楽観的更新の対象となる5種類のリソース。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Transaction,
    PlannedTransaction,
    CurrencyExchange,
    Category,
    BudgetPeriod,
}

/// Closed routing table entry binding a resource kind to its path predicate.
/// Evaluated in declaration order; the first match wins.
struct ResourceRoute {
    kind: ResourceKind,
    matches: fn(&str) -> bool,
}

// Plain transactions must be checked before planned transactions would ever
// match, so the transaction predicate explicitly excludes "planned" paths.
const ROUTES: [ResourceRoute; 5] = [
    ResourceRoute {
        kind: ResourceKind::Transaction,
        matches: |path| path.contains("/transactions") && !path.contains("planned"),
    },
    ResourceRoute {
        kind: ResourceKind::PlannedTransaction,
        matches: |path| path.contains("/planned-transactions"),
    },
    ResourceRoute {
        kind: ResourceKind::CurrencyExchange,
        matches: |path| path.contains("/currency-exchanges"),
    },
    ResourceRoute {
        kind: ResourceKind::Category,
        matches: |path| path.contains("/categories"),
    },
    ResourceRoute {
        kind: ResourceKind::BudgetPeriod,
        matches: |path| path.contains("/budget-periods"),
    },
];

impl ResourceKind {
    pub const ALL: [ResourceKind; 5] = [
        ResourceKind::Transaction,
        ResourceKind::PlannedTransaction,
        ResourceKind::CurrencyExchange,
        ResourceKind::Category,
        ResourceKind::BudgetPeriod,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Transaction => "transaction",
            ResourceKind::PlannedTransaction => "planned_transaction",
            ResourceKind::CurrencyExchange => "currency_exchange",
            ResourceKind::Category => "category",
            ResourceKind::BudgetPeriod => "budget_period",
        }
    }

    /// クエリキャッシュのキー接頭辞（RESTパスのセグメントと揃える）。
    pub fn cache_segment(&self) -> &'static str {
        match self {
            ResourceKind::Transaction => "transactions",
            ResourceKind::PlannedTransaction => "planned-transactions",
            ResourceKind::CurrencyExchange => "currency-exchanges",
            ResourceKind::Category => "categories",
            ResourceKind::BudgetPeriod => "budget-periods",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == value)
    }

    /// Resolve a request path to a resource kind through the routing table.
    pub fn match_path(path: &str) -> Option<Self> {
        ROUTES
            .iter()
            .find(|route| (route.matches)(path))
            .map(|route| route.kind)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
