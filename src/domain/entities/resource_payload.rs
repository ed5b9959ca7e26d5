use crate::domain::value_objects::ResourceKind;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 取引の収支区分。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Income,
    Expense,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionDraft {
    pub date: NaiveDate,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category_id: Option<i64>,
    pub amount: f64,
    pub currency: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    #[serde(default)]
    pub budget_period_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedTransactionDraft {
    pub name: String,
    pub amount: f64,
    pub currency: String,
    #[serde(default)]
    pub category_id: Option<i64>,
    pub planned_date: NaiveDate,
    #[serde(default = "default_planned_status")]
    pub status: String,
    #[serde(default)]
    pub budget_period_id: Option<i64>,
}

fn default_planned_status() -> String {
    "pending".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyExchangeDraft {
    pub date: NaiveDate,
    #[serde(default)]
    pub description: Option<String>,
    pub from_currency: String,
    pub from_amount: f64,
    pub to_currency: String,
    pub to_amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryDraft {
    pub name: String,
    pub budget_period_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetPeriodDraft {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub weeks: Option<i64>,
    pub budget_account_id: i64,
}

/// 5種類の作成ペイロードを閉じた和型で表す。スキーマに合わない本文は
/// `Other` として素通しされ、プレースホルダーにはそのまま使われる。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ResourcePayload {
    Transaction(TransactionDraft),
    PlannedTransaction(PlannedTransactionDraft),
    CurrencyExchange(CurrencyExchangeDraft),
    Category(CategoryDraft),
    BudgetPeriod(BudgetPeriodDraft),
    Other(Value),
}

impl ResourcePayload {
    pub fn parse(kind: ResourceKind, body: &Value) -> Self {
        match kind {
            ResourceKind::Transaction => serde_json::from_value(body.clone())
                .map(ResourcePayload::Transaction)
                .unwrap_or_else(|_| ResourcePayload::Other(body.clone())),
            ResourceKind::PlannedTransaction => serde_json::from_value(body.clone())
                .map(ResourcePayload::PlannedTransaction)
                .unwrap_or_else(|_| ResourcePayload::Other(body.clone())),
            ResourceKind::CurrencyExchange => serde_json::from_value(body.clone())
                .map(ResourcePayload::CurrencyExchange)
                .unwrap_or_else(|_| ResourcePayload::Other(body.clone())),
            ResourceKind::Category => serde_json::from_value(body.clone())
                .map(ResourcePayload::Category)
                .unwrap_or_else(|_| ResourcePayload::Other(body.clone())),
            ResourceKind::BudgetPeriod => serde_json::from_value(body.clone())
                .map(ResourcePayload::BudgetPeriod)
                .unwrap_or_else(|_| ResourcePayload::Other(body.clone())),
        }
    }

    /// スコープID。期間系リソースは予算期間、予算期間自体は予算口座に紐づく。
    pub fn scope_id(&self) -> Option<i64> {
        match self {
            ResourcePayload::Transaction(draft) => draft.budget_period_id,
            ResourcePayload::PlannedTransaction(draft) => draft.budget_period_id,
            ResourcePayload::CurrencyExchange(_) => None,
            ResourcePayload::Category(draft) => Some(draft.budget_period_id),
            ResourcePayload::BudgetPeriod(draft) => Some(draft.budget_account_id),
            ResourcePayload::Other(value) => value
                .get("budget_period_id")
                .and_then(Value::as_i64)
                .or_else(|| value.get("budget_account_id").and_then(Value::as_i64)),
        }
    }

    /// カテゴリ参照を持つのは取引系のみ。
    pub fn category_id(&self) -> Option<i64> {
        match self {
            ResourcePayload::Transaction(draft) => draft.category_id,
            ResourcePayload::PlannedTransaction(draft) => draft.category_id,
            ResourcePayload::Other(value) => value.get("category_id").and_then(Value::as_i64),
            _ => None,
        }
    }

    /// Placeholder fields: every field of the original body, overlaid with
    /// the normalized draft fields (defaults filled in, shapes validated).
    pub fn placeholder_fields(&self, body: &Value) -> Map<String, Value> {
        let mut fields = match body {
            Value::Object(map) => map.clone(),
            _ => Map::new(),
        };

        let normalized = match self {
            ResourcePayload::Other(_) => Value::Null,
            other => untagged(other),
        };
        if let Value::Object(map) = normalized {
            for (key, value) in map {
                fields.insert(key, value);
            }
        }

        fields
    }
}

// Serialize the inner draft without the enum tag.
fn untagged(payload: &ResourcePayload) -> Value {
    match payload {
        ResourcePayload::Transaction(draft) => {
            serde_json::to_value(draft).unwrap_or(Value::Null)
        }
        ResourcePayload::PlannedTransaction(draft) => {
            serde_json::to_value(draft).unwrap_or(Value::Null)
        }
        ResourcePayload::CurrencyExchange(draft) => {
            serde_json::to_value(draft).unwrap_or(Value::Null)
        }
        ResourcePayload::Category(draft) => serde_json::to_value(draft).unwrap_or(Value::Null),
        ResourcePayload::BudgetPeriod(draft) => serde_json::to_value(draft).unwrap_or(Value::Null),
        ResourcePayload::Other(value) => value.clone(),
    }
}
