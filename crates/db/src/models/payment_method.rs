use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool, Type};
use strum_macros::{Display, EnumString};
use ts_rs::TS;
use uuid::Uuid;

#[derive(
    Debug, Clone, Copy, Type, Serialize, Deserialize, PartialEq, TS, EnumString, Display, Default,
)]
#[sqlx(type_name = "payment_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PaymentKind {
    #[default]
    Card,
    Paypal,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethod {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: PaymentKind,
    pub brand: String,
    pub last4: String,
    pub expiry: Option<String>,
    pub is_default: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentMethod {
    pub kind: PaymentKind,
    pub brand: String,
    pub last4: String,
    pub expiry: Option<String>,
    #[serde(default)]
    pub is_default: bool,
}

impl PaymentMethod {
    pub async fn create(
        pool: &SqlitePool,
        user_id: Uuid,
        data: &CreatePaymentMethod,
    ) -> Result<Self, sqlx::Error> {
        let mut tx = pool.begin().await?;
        if data.is_default {
            sqlx::query("UPDATE payment_methods SET is_default = 0 WHERE user_id = $1")
                .bind(user_id)
                .execute(&mut *tx)
                .await?;
        }
        let method = sqlx::query_as::<_, PaymentMethod>(
            "INSERT INTO payment_methods (id, user_id, kind, brand, last4, expiry, is_default)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(data.kind)
        .bind(&data.brand)
        .bind(&data.last4)
        .bind(&data.expiry)
        .bind(data.is_default)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(method)
    }

    pub async fn list_by_user(pool: &SqlitePool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, PaymentMethod>(
            "SELECT * FROM payment_methods WHERE user_id = $1 ORDER BY is_default DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    pub async fn set_default(
        pool: &SqlitePool,
        user_id: Uuid,
        method_id: Uuid,
    ) -> Result<u64, sqlx::Error> {
        let mut tx = pool.begin().await?;
        sqlx::query("UPDATE payment_methods SET is_default = 0 WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query(
            "UPDATE payment_methods SET is_default = 1 WHERE id = $1 AND user_id = $2",
        )
        .bind(method_id)
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
        method_id: Uuid,
        user_id: Uuid,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM payment_methods WHERE id = $1 AND user_id = $2")
            .bind(method_id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
