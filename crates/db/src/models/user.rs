use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Executor, FromRow, QueryBuilder, Sqlite, SqlitePool, Type};
use strum_macros::{Display, EnumString};
use ts_rs::TS;
use uuid::Uuid;

#[derive(
    Debug, Clone, Copy, Type, Serialize, Deserialize, PartialEq, TS, EnumString, Display, Default,
)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum UserRole {
    #[default]
    Customer,
    Merchant,
    Admin,
}

#[derive(
    Debug, Clone, Copy, Type, Serialize, Deserialize, PartialEq, TS, EnumString, Display, Default,
)]
#[sqlx(type_name = "user_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum UserStatus {
    #[default]
    Active,
    Suspended,
    Banned,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateUser {
    pub email: String,
    pub password_hash: String,
    pub name: String,
}

impl User {
    pub async fn create(pool: &SqlitePool, data: &CreateUser) -> Result<Self, sqlx::Error> {
        let id = Uuid::new_v4();
        sqlx::query_as::<_, User>(
            "INSERT INTO users (id, email, password_hash, name) VALUES ($1, $2, $3, $4)
             RETURNING *",
        )
        .bind(id)
        .bind(&data.email)
        .bind(&data.password_hash)
        .bind(&data.name)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    pub async fn update_profile(
        pool: &SqlitePool,
        id: Uuid,
        name: &str,
        email: &str,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "UPDATE users SET name = $2, email = $3, updated_at = datetime('now', 'subsec')
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(name)
        .bind(email)
        .fetch_one(pool)
        .await
    }

    /// Promote the applicant during merchant approval; runs inside the
    /// approval transaction.
    pub async fn promote_to_merchant<'e, E>(executor: E, id: Uuid) -> Result<u64, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            "UPDATE users SET role = $2, status = $3, updated_at = datetime('now', 'subsec')
             WHERE id = $1",
        )
        .bind(id)
        .bind(UserRole::Merchant)
        .bind(UserStatus::Active)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn bulk_update_status(
        pool: &SqlitePool,
        ids: &[Uuid],
        status: UserStatus,
    ) -> Result<u64, sqlx::Error> {
        let mut qb = QueryBuilder::<Sqlite>::new("UPDATE users SET status = ");
        qb.push_bind(status)
            .push(", updated_at = datetime('now', 'subsec') WHERE id IN (");
        let mut separated = qb.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");
        let result = qb.build().execute(pool).await?;
        Ok(result.rows_affected())
    }

    pub async fn bulk_update_role(
        pool: &SqlitePool,
        ids: &[Uuid],
        role: UserRole,
    ) -> Result<u64, sqlx::Error> {
        let mut qb = QueryBuilder::<Sqlite>::new("UPDATE users SET role = ");
        qb.push_bind(role)
            .push(", updated_at = datetime('now', 'subsec') WHERE id IN (");
        let mut separated = qb.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");
        let result = qb.build().execute(pool).await?;
        Ok(result.rows_affected())
    }
}
