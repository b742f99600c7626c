//! Postgres-backed user directory.

use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{Category, UserKind, UserProfile};

use super::{DirectoryError, UserDirectory};

type UserRow = (Uuid, String, String, String, Vec<String>);

/// Directory over the users table.
#[derive(Debug, Clone)]
pub struct PgUserDirectory {
    pool: PgPool,
}

impl PgUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn profile_from_row(row: UserRow) -> Result<UserProfile, DirectoryError> {
        let (id, name, email, kind, categories) = row;

        let kind: UserKind = kind
            .parse()
            .map_err(|e: String| DirectoryError::InvalidProfile(e))?;

        // Tolerate vocabulary drift in stored rows: unknown values are
        // logged and skipped rather than failing the whole lookup.
        let interest_categories = categories
            .iter()
            .filter_map(|raw| match raw.parse::<Category>() {
                Ok(category) => Some(category),
                Err(e) => {
                    tracing::warn!(user_id = %id, error = %e, "Skipping unknown interest category");
                    None
                }
            })
            .collect();

        Ok(UserProfile {
            id,
            name,
            email,
            kind,
            interest_categories,
        })
    }
}

#[async_trait::async_trait]
impl UserDirectory for PgUserDirectory {
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<UserProfile>, DirectoryError> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT id, name, email, kind, interest_categories
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::profile_from_row).transpose()
    }

    async fn find_vendors_by_categories(
        &self,
        categories: &[Category],
    ) -> Result<Vec<UserProfile>, DirectoryError> {
        let wanted: Vec<String> = categories.iter().map(|c| c.as_str().to_string()).collect();

        let rows: Vec<UserRow> = sqlx::query_as(
            r#"
            SELECT id, name, email, kind, interest_categories
            FROM users
            WHERE kind = 'vendor' AND interest_categories && $1
            "#,
        )
        .bind(&wanted)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::profile_from_row).collect()
    }
}
