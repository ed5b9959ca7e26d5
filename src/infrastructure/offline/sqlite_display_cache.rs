use crate::application::ports::DisplayCacheStore;
use crate::domain::entities::DisplayCacheItem;
use crate::domain::value_objects::{ResourceKind, TempId};
use crate::shared::error::AppError;
use async_trait::async_trait;
use chrono::DateTime;
use sqlx::{FromRow, Pool, Sqlite};
use tokio::sync::RwLock;

/// 投機レコードのSQLiteストア。キューと同じ「ベストエフォート永続化」契約。
pub struct SqliteDisplayCache {
    pool: Pool<Sqlite>,
    items: RwLock<Vec<DisplayCacheItem>>,
}

#[derive(Debug, Clone, FromRow)]
struct DisplayCacheRow {
    temp_id: String,
    resource: String,
    scope_id: Option<i64>,
    payload: String,
    created_at: i64,
}

impl SqliteDisplayCache {
    pub async fn load(pool: Pool<Sqlite>) -> Result<Self, AppError> {
        let rows = sqlx::query_as::<_, DisplayCacheRow>(
            r#"
            SELECT temp_id, resource, scope_id, payload, created_at
            FROM display_cache
            ORDER BY record_id ASC
            "#,
        )
        .fetch_all(&pool)
        .await?;

        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            match row_to_item(row) {
                Ok(item) => items.push(item),
                Err(reason) => {
                    tracing::warn!(
                        target: "offline::display_cache",
                        %reason,
                        "dropping unreadable display cache row"
                    );
                }
            }
        }

        Ok(Self {
            pool,
            items: RwLock::new(items),
        })
    }
}

fn row_to_item(row: DisplayCacheRow) -> Result<DisplayCacheItem, String> {
    let resource = ResourceKind::parse(&row.resource)
        .ok_or_else(|| format!("unknown resource kind '{}'", row.resource))?;
    let payload =
        serde_json::from_str(&row.payload).map_err(|err| format!("unreadable payload: {err}"))?;
    let created_at = DateTime::from_timestamp_millis(row.created_at)
        .ok_or_else(|| format!("invalid timestamp {}", row.created_at))?;

    Ok(DisplayCacheItem {
        temp_id: TempId::new(row.temp_id)?,
        created_at,
        resource,
        scope_id: row.scope_id,
        payload,
    })
}

#[async_trait]
impl DisplayCacheStore for SqliteDisplayCache {
    async fn insert(&self, item: DisplayCacheItem) {
        {
            let mut items = self.items.write().await;
            items.push(item.clone());
        }

        let result = sqlx::query(
            r#"
            INSERT INTO display_cache (temp_id, resource, scope_id, payload, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(item.temp_id.as_str())
        .bind(item.resource.as_str())
        .bind(item.scope_id)
        .bind(item.payload.to_string())
        .bind(item.created_at.timestamp_millis())
        .execute(&self.pool)
        .await;

        if let Err(err) = result {
            tracing::warn!(
                target: "offline::display_cache",
                error = %err,
                temp_id = %item.temp_id,
                "display cache item not persisted; kept in memory for this session"
            );
        }
    }

    async fn remove(&self, temp_id: &TempId) {
        {
            let mut items = self.items.write().await;
            items.retain(|item| &item.temp_id != temp_id);
        }

        let result = sqlx::query("DELETE FROM display_cache WHERE temp_id = ?1")
            .bind(temp_id.as_str())
            .execute(&self.pool)
            .await;
        if let Err(err) = result {
            tracing::warn!(
                target: "offline::display_cache",
                error = %err,
                temp_id = %temp_id,
                "display cache removal not persisted"
            );
        }
    }

    async fn list(&self) -> Vec<DisplayCacheItem> {
        self.items.read().await.clone()
    }

    async fn clear(&self) {
        {
            let mut items = self.items.write().await;
            items.clear();
        }

        if let Err(err) = sqlx::query("DELETE FROM display_cache")
            .execute(&self.pool)
            .await
        {
            tracing::warn!(
                target: "offline::display_cache",
                error = %err,
                "display cache clear not persisted"
            );
        }
    }

    async fn len(&self) -> usize {
        self.items.read().await.len()
    }
}
