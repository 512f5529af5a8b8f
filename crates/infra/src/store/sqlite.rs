//! SQLite-backed document store.
//!
//! All collections share one table keyed by `(collection, id)`; the document
//! body is stored as JSON text. Every [`WriteBatch`] runs in one transaction.
//!
//! ## Error mapping
//!
//! | sqlx error | StoreError |
//! |------------|------------|
//! | Database (unique violation) | `AlreadyExists` |
//! | Database (other) | `Backend` |
//! | PoolClosed, Io, other | `Backend` |

use std::str::FromStr;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value as JsonValue;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::{Row, Sqlite, Transaction};
use tracing::instrument;

use super::{Collection, DocumentStore, StoreError, WriteBatch, WriteOp, merge_fields};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS documents (
    collection TEXT NOT NULL,
    id         TEXT NOT NULL,
    data       TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    PRIMARY KEY (collection, id)
)
"#;

#[derive(Debug, Clone)]
pub struct SqliteDocumentStore {
    pool: SqlitePool,
}

impl SqliteDocumentStore {
    /// Open (creating if needed) the database at `url` and ensure the schema.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| map_sqlx_error("parse_url", e))?
            .create_if_missing(true);

        let mut pool_options = SqlitePoolOptions::new().max_connections(5);
        if url.contains(":memory:") {
            // Every connection to `:memory:` is its own database; keep exactly one alive.
            pool_options = pool_options.max_connections(1).idle_timeout(None).max_lifetime(None);
        }

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;

        Self::with_pool(pool).await
    }

    pub async fn with_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        sqlx::query(SCHEMA)
            .execute(&pool)
            .await
            .map_err(|e| map_sqlx_error("create_schema", e))?;
        Ok(Self { pool })
    }

    async fn apply(tx: &mut Transaction<'_, Sqlite>, op: WriteOp) -> Result<(), StoreError> {
        match op {
            WriteOp::Create { collection, id, data } => {
                if load(tx, collection, &id).await?.is_some() {
                    return Err(StoreError::AlreadyExists { collection, id });
                }
                sqlx::query("INSERT INTO documents (collection, id, data, updated_at) VALUES (?, ?, ?, ?)")
                    .bind(collection.as_str())
                    .bind(id.as_str())
                    .bind(data.to_string())
                    .bind(Utc::now().to_rfc3339())
                    .execute(&mut **tx)
                    .await
                    .map_err(|e| {
                        if is_unique_violation(&e) {
                            StoreError::AlreadyExists { collection, id: id.clone() }
                        } else {
                            map_sqlx_error("create", e)
                        }
                    })?;
            }
            WriteOp::Set { collection, id, data } => {
                upsert(tx, collection, &id, &data).await?;
            }
            WriteOp::Merge { collection, id, fields } => {
                let Some(mut doc) = load(tx, collection, &id).await? else {
                    return Err(StoreError::NotFound { collection, id });
                };
                merge_fields(&mut doc, &fields)?;
                upsert(tx, collection, &id, &doc).await?;
            }
            WriteOp::Delete { collection, id } => {
                sqlx::query("DELETE FROM documents WHERE collection = ? AND id = ?")
                    .bind(collection.as_str())
                    .bind(id.as_str())
                    .execute(&mut **tx)
                    .await
                    .map_err(|e| map_sqlx_error("delete", e))?;
            }
            WriteOp::Clear(collection) => {
                sqlx::query("DELETE FROM documents WHERE collection = ?")
                    .bind(collection.as_str())
                    .execute(&mut **tx)
                    .await
                    .map_err(|e| map_sqlx_error("clear", e))?;
            }
        }
        Ok(())
    }
}

async fn load(
    tx: &mut Transaction<'_, Sqlite>,
    collection: Collection,
    id: &str,
) -> Result<Option<JsonValue>, StoreError> {
    let row = sqlx::query("SELECT data FROM documents WHERE collection = ? AND id = ?")
        .bind(collection.as_str())
        .bind(id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(|e| map_sqlx_error("load", e))?;

    row.map(|r| decode_row(&r)).transpose()
}

async fn upsert(
    tx: &mut Transaction<'_, Sqlite>,
    collection: Collection,
    id: &str,
    data: &JsonValue,
) -> Result<(), StoreError> {
    sqlx::query(
        r#"
        INSERT INTO documents (collection, id, data, updated_at)
        VALUES (?, ?, ?, ?)
        ON CONFLICT (collection, id)
        DO UPDATE SET
            data = excluded.data,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(collection.as_str())
    .bind(id)
    .bind(data.to_string())
    .bind(Utc::now().to_rfc3339())
    .execute(&mut **tx)
    .await
    .map_err(|e| map_sqlx_error("upsert", e))?;
    Ok(())
}

fn decode_row(row: &sqlx::sqlite::SqliteRow) -> Result<JsonValue, StoreError> {
    let raw: String = row
        .try_get("data")
        .map_err(|e| map_sqlx_error("decode_row", e))?;
    Ok(serde_json::from_str(&raw)?)
}

#[async_trait]
impl DocumentStore for SqliteDocumentStore {
    #[instrument(skip(self), err)]
    async fn list(&self, collection: Collection) -> Result<Vec<JsonValue>, StoreError> {
        let rows = sqlx::query("SELECT data FROM documents WHERE collection = ? ORDER BY id ASC")
            .bind(collection.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("list", e))?;

        rows.iter().map(decode_row).collect()
    }

    #[instrument(skip(self), err)]
    async fn get(&self, collection: Collection, id: &str) -> Result<Option<JsonValue>, StoreError> {
        let row = sqlx::query("SELECT data FROM documents WHERE collection = ? AND id = ?")
            .bind(collection.as_str())
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("get", e))?;

        row.map(|r| decode_row(&r)).transpose()
    }

    #[instrument(skip(self, batch), fields(ops = batch.len()), err)]
    async fn commit(&self, batch: WriteBatch) -> Result<(), StoreError> {
        if batch.is_empty() {
            return Ok(());
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        for op in batch.into_ops() {
            if let Err(err) = Self::apply(&mut tx, op).await {
                tx.rollback()
                    .await
                    .map_err(|e| map_sqlx_error("rollback", e))?;
                return Err(err);
            }
        }

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit_transaction", e))
    }
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            StoreError::Backend(format!("database error in {}: {}", operation, db_err.message()))
        }
        sqlx::Error::PoolClosed => {
            StoreError::Backend(format!("connection pool closed in {}", operation))
        }
        _ => StoreError::Backend(format!("sqlx error in {}: {}", operation, err)),
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

#[cfg(test)]
mod tests {
    use serde_json::{Map, json};

    use super::*;

    async fn store() -> SqliteDocumentStore {
        SqliteDocumentStore::connect("sqlite::memory:").await.unwrap()
    }

    #[tokio::test]
    async fn round_trips_documents_in_id_order() {
        let store = store().await;
        let mut batch = WriteBatch::new();
        batch
            .create(Collection::Parts, "P002", json!({ "id": "P002", "stock": 3 }))
            .create(Collection::Parts, "P001", json!({ "id": "P001", "stock": 5 }));
        store.commit(batch).await.unwrap();

        let parts = store.list(Collection::Parts).await.unwrap();
        assert_eq!(parts[0]["id"], "P001");
        assert_eq!(parts[1]["stock"], 3);
        assert!(store.list(Collection::Customers).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_batch_is_rolled_back() {
        let store = store().await;
        let mut seed = WriteBatch::new();
        seed.set(Collection::Parts, "P001", json!({ "id": "P001", "stock": 5 }))
            .set(Collection::Parts, "P002", json!({ "id": "P002", "stock": 1 }));
        store.commit(seed).await.unwrap();

        let mut fields = Map::new();
        fields.insert("stock".to_string(), json!(0));
        let mut batch = WriteBatch::new();
        batch
            .merge(Collection::Parts, "P001", fields.clone())
            .delete(Collection::Parts, "P002")
            .merge(Collection::Parts, "P404", fields);

        assert!(matches!(store.commit(batch).await, Err(StoreError::NotFound { .. })));

        let p1 = store.get(Collection::Parts, "P001").await.unwrap().unwrap();
        assert_eq!(p1["stock"], 5);
        assert!(store.get(Collection::Parts, "P002").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn create_rejects_existing_id() {
        let store = store().await;
        let mut batch = WriteBatch::new();
        batch.create(Collection::RepairJobs, "R001", json!({ "id": "R001" }));
        store.commit(batch.clone()).await.unwrap();

        assert!(matches!(store.commit(batch).await, Err(StoreError::AlreadyExists { .. })));
    }
}
