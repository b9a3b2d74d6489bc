use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool, types::Json};
use ts_rs::TS;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Wishlist {
    pub id: Uuid,
    pub user_id: Uuid,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct WishlistItem {
    pub id: Uuid,
    pub wishlist_id: Uuid,
    pub product_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Wishlist entry joined with the current product listing.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct WishlistItemDetail {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub price_cents: i64,
    pub sale_price_cents: Option<i64>,
    pub on_sale: bool,
    pub stock_count: i32,
    #[ts(type = "Array<string>")]
    pub images: Json<Vec<String>>,
    pub brand_name: Option<String>,
}

impl Wishlist {
    pub async fn find_by_user(pool: &SqlitePool, user_id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Wishlist>("SELECT * FROM wishlists WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn create(pool: &SqlitePool, user_id: Uuid) -> Result<Self, sqlx::Error> {
        let id = Uuid::new_v4();
        sqlx::query_as::<_, Wishlist>(
            "INSERT INTO wishlists (id, user_id) VALUES ($1, $2) RETURNING *",
        )
        .bind(id)
        .bind(user_id)
        .fetch_one(pool)
        .await
    }
}

impl WishlistItem {
    pub async fn contains(
        pool: &SqlitePool,
        wishlist_id: Uuid,
        product_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM wishlist_items WHERE wishlist_id = $1 AND product_id = $2",
        )
        .bind(wishlist_id)
        .bind(product_id)
        .fetch_one(pool)
        .await?;
        Ok(count > 0)
    }

    pub async fn insert(
        pool: &SqlitePool,
        wishlist_id: Uuid,
        product_id: Uuid,
    ) -> Result<Self, sqlx::Error> {
        let id = Uuid::new_v4();
        sqlx::query_as::<_, WishlistItem>(
            "INSERT INTO wishlist_items (id, wishlist_id, product_id)
             VALUES ($1, $2, $3)
             RETURNING *",
        )
        .bind(id)
        .bind(wishlist_id)
        .bind(product_id)
        .fetch_one(pool)
        .await
    }

    pub async fn delete_for_user(
        pool: &SqlitePool,
        user_id: Uuid,
        product_id: Uuid,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM wishlist_items
             WHERE product_id = $1
               AND wishlist_id IN (SELECT id FROM wishlists WHERE user_id = $2)",
        )
        .bind(product_id)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn list_details(
        pool: &SqlitePool,
        wishlist_id: Uuid,
    ) -> Result<Vec<WishlistItemDetail>, sqlx::Error> {
        sqlx::query_as::<_, WishlistItemDetail>(
            "SELECT wi.id, wi.product_id,
                    p.name AS product_name, p.price_cents, p.sale_price_cents, p.on_sale,
                    p.stock_count, p.images,
                    b.name AS brand_name
             FROM wishlist_items wi
             JOIN products p ON p.id = wi.product_id
             LEFT JOIN brands b ON b.id = p.brand_id
             WHERE wi.wishlist_id = $1
             ORDER BY wi.created_at DESC",
        )
        .bind(wishlist_id)
        .fetch_all(pool)
        .await
    }

    pub async fn count_for_user(pool: &SqlitePool, user_id: Uuid) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*)
             FROM wishlist_items wi
             JOIN wishlists w ON w.id = wi.wishlist_id
             WHERE w.user_id = $1",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await
    }

    pub async fn clear(pool: &SqlitePool, wishlist_id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM wishlist_items WHERE wishlist_id = $1")
            .bind(wishlist_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
