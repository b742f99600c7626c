//! Postgres-backed document store
//!
//! Persists each aggregate as one jsonb document with a seq column used for
//! the compare-and-swap. The document's embedded seq and the column are
//! written together so they never diverge.

use sqlx::PgPool;
use uuid::Uuid;

use crate::aggregate::RfiAggregate;

use super::{DocumentStore, StoreError};

/// jsonb document store over Postgres.
#[derive(Debug, Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl DocumentStore for PgDocumentStore {
    async fn insert(&self, rfi: &RfiAggregate) -> Result<(), StoreError> {
        let doc = serde_json::to_value(rfi)?;

        let result = sqlx::query(
            r#"
            INSERT INTO rfis (id, seq, doc, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(rfi.id())
        .bind(rfi.seq())
        .bind(doc)
        .bind(rfi.created_at())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(StoreError::AlreadyExists(rfi.id()))
            }
            Err(e) => Err(StoreError::Database(e)),
        }
    }

    async fn update(&self, rfi: &RfiAggregate) -> Result<(), StoreError> {
        let mut next = rfi.clone();
        next.bump_seq();
        let doc = serde_json::to_value(&next)?;

        let result = sqlx::query(
            r#"
            UPDATE rfis
            SET doc = $2, seq = $3
            WHERE id = $1 AND seq = $4
            "#,
        )
        .bind(rfi.id())
        .bind(doc)
        .bind(next.seq())
        .bind(rfi.seq())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            let found: Option<i64> = sqlx::query_scalar("SELECT seq FROM rfis WHERE id = $1")
                .bind(rfi.id())
                .fetch_optional(&self.pool)
                .await?;

            return match found {
                Some(found) => Err(StoreError::Conflict {
                    id: rfi.id(),
                    expected: rfi.seq(),
                    found,
                }),
                None => Err(StoreError::NotFound(rfi.id())),
            };
        }

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<RfiAggregate>, StoreError> {
        let doc: Option<serde_json::Value> =
            sqlx::query_scalar("SELECT doc FROM rfis WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        match doc {
            Some(doc) => Ok(Some(serde_json::from_value(doc)?)),
            None => Ok(None),
        }
    }

    async fn list(&self) -> Result<Vec<RfiAggregate>, StoreError> {
        let docs: Vec<serde_json::Value> =
            sqlx::query_scalar("SELECT doc FROM rfis ORDER BY created_at")
                .fetch_all(&self.pool)
                .await?;

        docs.into_iter()
            .map(|doc| serde_json::from_value(doc).map_err(StoreError::from))
            .collect()
    }
}
