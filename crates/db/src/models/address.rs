use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: Uuid,
    pub user_id: Uuid,
    pub label: String,
    pub recipient: String,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub postal_code: String,
    pub country: String,
    pub is_default: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct CreateAddress {
    pub label: String,
    pub recipient: String,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub postal_code: String,
    pub country: String,
    #[serde(default)]
    pub is_default: bool,
}

impl Address {
    pub async fn create(
        pool: &SqlitePool,
        user_id: Uuid,
        data: &CreateAddress,
    ) -> Result<Self, sqlx::Error> {
        let mut tx = pool.begin().await?;
        if data.is_default {
            sqlx::query("UPDATE addresses SET is_default = 0 WHERE user_id = $1")
                .bind(user_id)
                .execute(&mut *tx)
                .await?;
        }
        let address = sqlx::query_as::<_, Address>(
            "INSERT INTO addresses (id, user_id, label, recipient, line1, line2, city, postal_code, country, is_default)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(&data.label)
        .bind(&data.recipient)
        .bind(&data.line1)
        .bind(&data.line2)
        .bind(&data.city)
        .bind(&data.postal_code)
        .bind(&data.country)
        .bind(data.is_default)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(address)
    }

    pub async fn list_by_user(pool: &SqlitePool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Address>(
            "SELECT * FROM addresses WHERE user_id = $1 ORDER BY is_default DESC, label ASC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Swap the default flag to the given address, clearing the previous
    /// default in the same transaction.
    pub async fn set_default(
        pool: &SqlitePool,
        user_id: Uuid,
        address_id: Uuid,
    ) -> Result<u64, sqlx::Error> {
        let mut tx = pool.begin().await?;
        sqlx::query("UPDATE addresses SET is_default = 0 WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query(
            "UPDATE addresses SET is_default = 1 WHERE id = $1 AND user_id = $2",
        )
        .bind(address_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;
        // Unknown id: keep the previous default instead of leaving none.
        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(0);
        }
        tx.commit().await?;
        Ok(result.rows_affected())
    }

    pub async fn delete_for_user(
        pool: &SqlitePool,
        address_id: Uuid,
        user_id: Uuid,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM addresses WHERE id = $1 AND user_id = $2")
            .bind(address_id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
