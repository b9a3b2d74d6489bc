use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Executor, FromRow, QueryBuilder, Sqlite, SqlitePool, Type};
use strum_macros::{Display, EnumString};
use ts_rs::TS;
use uuid::Uuid;

#[derive(
    Debug, Clone, Copy, Type, Serialize, Deserialize, PartialEq, TS, EnumString, Display, Default,
)]
#[sqlx(type_name = "merchant_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MerchantStatus {
    #[default]
    Active,
    Suspended,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Merchant {
    pub id: Uuid,
    pub user_id: Uuid,
    pub store_name: String,
    pub slug: String,
    pub description: Option<String>,
    pub status: MerchantStatus,
    pub created_at: DateTime<Utc>,
}

impl Merchant {
    /// Insert a merchant row. Runs inside the approval transaction, so it
    /// takes any executor.
    pub async fn create<'e, E>(
        executor: E,
        user_id: Uuid,
        store_name: &str,
        slug: &str,
        description: Option<&str>,
    ) -> Result<Self, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let id = Uuid::new_v4();
        sqlx::query_as::<_, Merchant>(
            "INSERT INTO merchants (id, user_id, store_name, slug, description)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING *",
        )
        .bind(id)
        .bind(user_id)
        .bind(store_name)
        .bind(slug)
        .bind(description)
        .fetch_one(executor)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Merchant>("SELECT * FROM merchants WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_user_id(
        pool: &SqlitePool,
        user_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Merchant>("SELECT * FROM merchants WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn slug_exists<'e, E>(executor: E, slug: &str) -> Result<bool, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM merchants WHERE slug = $1")
                .bind(slug)
                .fetch_one(executor)
                .await?;
        Ok(count > 0)
    }

    pub async fn bulk_update_status(
        pool: &SqlitePool,
        ids: &[Uuid],
        status: MerchantStatus,
    ) -> Result<u64, sqlx::Error> {
        let mut qb = QueryBuilder::<Sqlite>::new("UPDATE merchants SET status = ");
        qb.push_bind(status).push(" WHERE id IN (");
        let mut separated = qb.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");
        let result = qb.build().execute(pool).await?;
        Ok(result.rows_affected())
    }
}
