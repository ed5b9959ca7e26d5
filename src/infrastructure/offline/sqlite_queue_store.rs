use crate::application::ports::QueueStore;
use crate::domain::entities::{OptimisticHandle, QueuedRequest, QueuedRequestDraft};
use crate::domain::value_objects::{HttpMethod, QueuedRequestId, RequestDescriptor, SyncContext};
use crate::shared::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, Pool, Sqlite};
use tokio::sync::RwLock;

/// SQLiteに裏打ちされた保留リクエストのFIFO。
///
/// The in-memory mirror is authoritative for the session; SQLite writes are
/// best-effort so a storage failure degrades durability without surfacing an
/// error to the enqueue path.
pub struct SqliteQueueStore {
    pool: Pool<Sqlite>,
    entries: RwLock<Vec<QueuedRequest>>,
}

#[derive(Debug, Clone, FromRow)]
struct QueuedRequestRow {
    request_id: String,
    method: String,
    path: String,
    body: Option<String>,
    params: String,
    headers: String,
    description: String,
    optimistic: Option<String>,
    workspace_id: Option<i64>,
    account_id: Option<i64>,
    created_at: i64,
}

impl SqliteQueueStore {
    /// 永続化済みのキューを読み込んでストアを組み立てる。
    pub async fn load(pool: Pool<Sqlite>) -> Result<Self, AppError> {
        let rows = sqlx::query_as::<_, QueuedRequestRow>(
            r#"
            SELECT request_id, method, path, body, params, headers,
                   description, optimistic, workspace_id, account_id, created_at
            FROM queued_requests
            ORDER BY record_id ASC
            "#,
        )
        .fetch_all(&pool)
        .await?;

        let mut entries = Vec::with_capacity(rows.len());
        for row in rows {
            match row_to_request(row) {
                Ok(request) => entries.push(request),
                Err(reason) => {
                    tracing::warn!(
                        target: "offline::queue",
                        %reason,
                        "dropping unreadable queued request row"
                    );
                }
            }
        }

        Ok(Self {
            pool,
            entries: RwLock::new(entries),
        })
    }

    async fn persist_insert(&self, request: &QueuedRequest) {
        let body = request
            .descriptor
            .body
            .as_ref()
            .map(|value| value.to_string());
        let params = serde_json::to_string(&request.descriptor.params).unwrap_or_default();
        let headers = serde_json::to_string(&request.descriptor.headers).unwrap_or_default();
        let optimistic = match &request.optimistic {
            Some(handle) => match serde_json::to_string(handle) {
                Ok(json) => Some(json),
                Err(err) => {
                    tracing::warn!(
                        target: "offline::queue",
                        error = %err,
                        "optimistic handle not serializable; persisting without it"
                    );
                    None
                }
            },
            None => None,
        };
        let context = request.context.unwrap_or_default();

        let result = sqlx::query(
            r#"
            INSERT INTO queued_requests (
                request_id, method, path, body, params, headers,
                description, optimistic, workspace_id, account_id, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(request.id.as_str())
        .bind(request.descriptor.method.as_str())
        .bind(&request.descriptor.path)
        .bind(body)
        .bind(params)
        .bind(headers)
        .bind(&request.description)
        .bind(optimistic)
        .bind(context.workspace_id)
        .bind(context.account_id)
        .bind(request.created_at.timestamp_millis())
        .execute(&self.pool)
        .await;

        if let Err(err) = result {
            tracing::warn!(
                target: "offline::queue",
                error = %err,
                request_id = %request.id,
                "queue entry not persisted; kept in memory for this session"
            );
        }
    }
}

fn row_to_request(row: QueuedRequestRow) -> Result<QueuedRequest, String> {
    let method = HttpMethod::parse(&row.method)
        .ok_or_else(|| format!("unknown HTTP method '{}'", row.method))?;
    let body = match row.body {
        Some(text) => Some(
            serde_json::from_str(&text).map_err(|err| format!("unreadable body: {err}"))?,
        ),
        None => None,
    };
    let params: Vec<(String, String)> = serde_json::from_str(&row.params)
        .map_err(|err| format!("unreadable params: {err}"))?;
    let headers: Vec<(String, String)> = serde_json::from_str(&row.headers)
        .map_err(|err| format!("unreadable headers: {err}"))?;
    let optimistic: Option<OptimisticHandle> = match row.optimistic {
        Some(text) => Some(
            serde_json::from_str(&text).map_err(|err| format!("unreadable optimistic: {err}"))?,
        ),
        None => None,
    };
    let context = if row.workspace_id.is_some() || row.account_id.is_some() {
        Some(SyncContext::new(row.workspace_id, row.account_id))
    } else {
        None
    };
    let created_at = DateTime::from_timestamp_millis(row.created_at)
        .ok_or_else(|| format!("invalid timestamp {}", row.created_at))?;

    Ok(QueuedRequest {
        id: QueuedRequestId::new(row.request_id)?,
        created_at,
        descriptor: RequestDescriptor {
            method,
            path: row.path,
            body,
            params,
            headers,
        },
        description: row.description,
        optimistic,
        context,
    })
}

#[async_trait]
impl QueueStore for SqliteQueueStore {
    async fn enqueue(&self, draft: QueuedRequestDraft) -> QueuedRequest {
        let request = draft.into_request(QueuedRequestId::generate(), Utc::now());

        {
            let mut entries = self.entries.write().await;
            entries.push(request.clone());
        }

        self.persist_insert(&request).await;
        request
    }

    async fn list(&self) -> Vec<QueuedRequest> {
        self.entries.read().await.clone()
    }

    async fn remove(&self, id: &QueuedRequestId) {
        {
            let mut entries = self.entries.write().await;
            entries.retain(|entry| &entry.id != id);
        }

        let result = sqlx::query("DELETE FROM queued_requests WHERE request_id = ?1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await;
        if let Err(err) = result {
            tracing::warn!(
                target: "offline::queue",
                error = %err,
                request_id = %id,
                "queue entry removal not persisted"
            );
        }
    }

    async fn clear(&self) {
        {
            let mut entries = self.entries.write().await;
            entries.clear();
        }

        if let Err(err) = sqlx::query("DELETE FROM queued_requests")
            .execute(&self.pool)
            .await
        {
            tracing::warn!(
                target: "offline::queue",
                error = %err,
                "queue clear not persisted"
            );
        }
    }

    async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::ConnectionPool;
    use serde_json::json;

    async fn setup_pool() -> ConnectionPool {
        let pool = ConnectionPool::from_memory().await.unwrap();
        pool.migrate().await.unwrap();
        pool
    }

    fn sample_draft(path: &str) -> QueuedRequestDraft {
        QueuedRequestDraft::new(
            RequestDescriptor::post(path, json!({"amount": 50})),
            format!("Create via {path}"),
            None,
            Some(SyncContext::new(Some(1), Some(2))),
        )
    }

    #[tokio::test]
    async fn enqueue_preserves_fifo_order() {
        let pool = setup_pool().await;
        let store = SqliteQueueStore::load(pool.get_pool().clone()).await.unwrap();

        store.enqueue(sample_draft("/transactions")).await;
        store.enqueue(sample_draft("/categories")).await;

        let entries = store.list().await;
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].descriptor.path, "/transactions");
        assert_eq!(entries[1].descriptor.path, "/categories");
        assert!(store.has_pending().await);
    }

    #[tokio::test]
    async fn entries_survive_store_reload() {
        let pool = setup_pool().await;
        let store = SqliteQueueStore::load(pool.get_pool().clone()).await.unwrap();
        let queued = store.enqueue(sample_draft("/transactions")).await;

        let reloaded = SqliteQueueStore::load(pool.get_pool().clone()).await.unwrap();
        let entries = reloaded.list().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, queued.id);
        assert_eq!(entries[0].descriptor.body, Some(json!({"amount": 50})));
        assert_eq!(
            entries[0].context,
            Some(SyncContext::new(Some(1), Some(2)))
        );
    }

    #[tokio::test]
    async fn remove_and_clear_rewrite_the_list() {
        let pool = setup_pool().await;
        let store = SqliteQueueStore::load(pool.get_pool().clone()).await.unwrap();
        let first = store.enqueue(sample_draft("/transactions")).await;
        store.enqueue(sample_draft("/categories")).await;

        store.remove(&first.id).await;
        assert_eq!(store.len().await, 1);

        store.clear().await;
        assert_eq!(store.len().await, 0);
        assert!(!store.has_pending().await);
    }

    #[tokio::test]
    async fn storage_failure_degrades_to_memory_only() {
        let pool = setup_pool().await;
        let store = SqliteQueueStore::load(pool.get_pool().clone()).await.unwrap();
        pool.close().await;

        let queued = store.enqueue(sample_draft("/transactions")).await;
        let entries = store.list().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, queued.id);
    }
}
