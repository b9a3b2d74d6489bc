use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool, types::Json};
use ts_rs::TS;
use uuid::Uuid;

use super::product::ProductStatus;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Cart {
    pub id: Uuid,
    pub user_id: Uuid,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct CartItem {
    pub id: Uuid,
    pub cart_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub selected_color: Option<String>,
    pub selected_size: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Cart line joined with the current product listing.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct CartItemDetail {
    pub id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub selected_color: Option<String>,
    pub selected_size: Option<String>,
    pub product_name: String,
    pub price_cents: i64,
    pub sale_price_cents: Option<i64>,
    pub on_sale: bool,
    pub stock_count: i32,
    pub product_status: ProductStatus,
    #[ts(type = "Array<string>")]
    pub images: Json<Vec<String>>,
    pub brand_name: Option<String>,
}

impl CartItemDetail {
    pub fn effective_price_cents(&self) -> i64 {
        if self.on_sale {
            self.sale_price_cents.unwrap_or(self.price_cents)
        } else {
            self.price_cents
        }
    }
}

impl Cart {
    pub async fn find_by_user(pool: &SqlitePool, user_id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Cart>("SELECT * FROM carts WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn create(pool: &SqlitePool, user_id: Uuid) -> Result<Self, sqlx::Error> {
        let id = Uuid::new_v4();
        sqlx::query_as::<_, Cart>(
            "INSERT INTO carts (id, user_id) VALUES ($1, $2) RETURNING *",
        )
        .bind(id)
        .bind(user_id)
        .fetch_one(pool)
        .await
    }

    pub async fn touch(pool: &SqlitePool, id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE carts SET updated_at = datetime('now', 'subsec') WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }
}

impl CartItem {
    /// Look up the line matching the variant key. `IS` makes the null
    /// selectors compare equal.
    pub async fn find_by_variant(
        pool: &SqlitePool,
        cart_id: Uuid,
        product_id: Uuid,
        selected_color: Option<&str>,
        selected_size: Option<&str>,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, CartItem>(
            "SELECT * FROM cart_items
             WHERE cart_id = $1 AND product_id = $2
               AND selected_color IS $3 AND selected_size IS $4",
        )
        .bind(cart_id)
        .bind(product_id)
        .bind(selected_color)
        .bind(selected_size)
        .fetch_optional(pool)
        .await
    }

    /// Fetch a line only if it belongs to the given user's cart. Keeps all
    /// item mutations scoped to their owner.
    pub async fn find_for_user(
        pool: &SqlitePool,
        item_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, CartItem>(
            "SELECT ci.* FROM cart_items ci
             JOIN carts c ON c.id = ci.cart_id
             WHERE ci.id = $1 AND c.user_id = $2",
        )
        .bind(item_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    pub async fn insert(
        pool: &SqlitePool,
        cart_id: Uuid,
        product_id: Uuid,
        quantity: i32,
        selected_color: Option<&str>,
        selected_size: Option<&str>,
    ) -> Result<Self, sqlx::Error> {
        let id = Uuid::new_v4();
        sqlx::query_as::<_, CartItem>(
            "INSERT INTO cart_items (id, cart_id, product_id, quantity, selected_color, selected_size)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING *",
        )
        .bind(id)
        .bind(cart_id)
        .bind(product_id)
        .bind(quantity)
        .bind(selected_color)
        .bind(selected_size)
        .fetch_one(pool)
        .await
    }

    pub async fn set_quantity(
        pool: &SqlitePool,
        item_id: Uuid,
        quantity: i32,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, CartItem>(
            "UPDATE cart_items SET quantity = $2 WHERE id = $1 RETURNING *",
        )
        .bind(item_id)
        .bind(quantity)
        .fetch_one(pool)
        .await
    }

    /// Delete scoped to the owner's cart; deleting someone else's line is a
    /// silent no-op.
    pub async fn delete_for_user(
        pool: &SqlitePool,
        item_id: Uuid,
        user_id: Uuid,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM cart_items
             WHERE id = $1
               AND cart_id IN (SELECT id FROM carts WHERE user_id = $2)",
        )
        .bind(item_id)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn list_details(
        pool: &SqlitePool,
        cart_id: Uuid,
    ) -> Result<Vec<CartItemDetail>, sqlx::Error> {
        sqlx::query_as::<_, CartItemDetail>(
            "SELECT ci.id, ci.product_id, ci.quantity, ci.selected_color, ci.selected_size,
                    p.name AS product_name, p.price_cents, p.sale_price_cents, p.on_sale,
                    p.stock_count, p.status AS product_status, p.images,
                    b.name AS brand_name
             FROM cart_items ci
             JOIN products p ON p.id = ci.product_id
             LEFT JOIN brands b ON b.id = p.brand_id
             WHERE ci.cart_id = $1
             ORDER BY ci.created_at ASC",
        )
        .bind(cart_id)
        .fetch_all(pool)
        .await
    }

    pub async fn total_quantity(pool: &SqlitePool, user_id: Uuid) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COALESCE(SUM(ci.quantity), 0)
             FROM cart_items ci
             JOIN carts c ON c.id = ci.cart_id
             WHERE c.user_id = $1",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await
    }

    pub async fn clear(pool: &SqlitePool, cart_id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM cart_items WHERE cart_id = $1")
            .bind(cart_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
