use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Executor, FromRow, Sqlite, SqlitePool, Type};
use strum_macros::{Display, EnumString};
use ts_rs::TS;
use uuid::Uuid;

#[derive(
    Debug, Clone, Copy, Type, Serialize, Deserialize, PartialEq, TS, EnumString, Display, Default,
)]
#[sqlx(type_name = "application_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MerchantApplicationStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl MerchantApplicationStatus {
    /// Approved and rejected are terminal; only pending applications can be
    /// reviewed.
    pub fn can_review(&self) -> bool {
        matches!(self, MerchantApplicationStatus::Pending)
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct MerchantApplication {
    pub id: Uuid,
    pub user_id: Uuid,
    pub store_name: String,
    pub proposed_slug: String,
    pub description: Option<String>,
    pub status: MerchantApplicationStatus,
    pub reviewed_by: Option<Uuid>,
    pub review_note: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct CreateMerchantApplication {
    pub store_name: String,
    pub description: Option<String>,
}

impl MerchantApplication {
    pub async fn create(
        pool: &SqlitePool,
        user_id: Uuid,
        store_name: &str,
        proposed_slug: &str,
        description: Option<&str>,
    ) -> Result<Self, sqlx::Error> {
        let id = Uuid::new_v4();
        sqlx::query_as::<_, MerchantApplication>(
            "INSERT INTO merchant_applications (id, user_id, store_name, proposed_slug, description)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING *",
        )
        .bind(id)
        .bind(user_id)
        .bind(store_name)
        .bind(proposed_slug)
        .bind(description)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, MerchantApplication>(
            "SELECT * FROM merchant_applications WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn find_latest_by_user(
        pool: &SqlitePool,
        user_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, MerchantApplication>(
            "SELECT * FROM merchant_applications WHERE user_id = $1
             ORDER BY created_at DESC LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    pub async fn has_pending(pool: &SqlitePool, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM merchant_applications WHERE user_id = $1 AND status = $2",
        )
        .bind(user_id)
        .bind(MerchantApplicationStatus::Pending)
        .fetch_one(pool)
        .await?;
        Ok(count > 0)
    }

    pub async fn list_by_status(
        pool: &SqlitePool,
        status: Option<MerchantApplicationStatus>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        match status {
            Some(status) => {
                sqlx::query_as::<_, MerchantApplication>(
                    "SELECT * FROM merchant_applications WHERE status = $1
                     ORDER BY created_at DESC",
                )
                .bind(status)
                .fetch_all(pool)
                .await
            }
            None => {
                sqlx::query_as::<_, MerchantApplication>(
                    "SELECT * FROM merchant_applications ORDER BY created_at DESC",
                )
                .fetch_all(pool)
                .await
            }
        }
    }

    /// Stamp the review outcome. Runs inside the approval/rejection
    /// transaction; the status guard in the WHERE clause makes the
    /// pending -> reviewed transition atomic, so a lost race surfaces as
    /// `RowNotFound` and rolls the transaction back.
    pub async fn mark_reviewed<'e, E>(
        executor: E,
        id: Uuid,
        status: MerchantApplicationStatus,
        reviewer_id: Uuid,
        note: Option<&str>,
    ) -> Result<Self, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, MerchantApplication>(
            "UPDATE merchant_applications
             SET status = $2, reviewed_by = $3, review_note = $4,
                 reviewed_at = datetime('now', 'subsec')
             WHERE id = $1 AND status = $5
             RETURNING *",
        )
        .bind(id)
        .bind(status)
        .bind(reviewer_id)
        .bind(note)
        .bind(MerchantApplicationStatus::Pending)
        .fetch_one(executor)
        .await
    }
}
