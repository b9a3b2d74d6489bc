use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;
use uuid::Uuid;

use super::product::ProductWithBrand;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Collection {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct CollectionWithProducts {
    #[serde(flatten)]
    #[ts(flatten)]
    pub collection: Collection,
    pub products: Vec<ProductWithBrand>,
}

impl Collection {
    pub async fn create(
        pool: &SqlitePool,
        name: &str,
        slug: &str,
        description: Option<&str>,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Collection>(
            "INSERT INTO collections (id, name, slug, description)
             VALUES ($1, $2, $3, $4)
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(slug)
        .bind(description)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_slug(pool: &SqlitePool, slug: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Collection>("SELECT * FROM collections WHERE slug = $1")
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_all(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Collection>("SELECT * FROM collections ORDER BY name ASC")
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &SqlitePool,
        id: Uuid,
        name: &str,
        description: Option<&str>,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Collection>(
            "UPDATE collections SET name = $2, description = $3 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .fetch_one(pool)
        .await
    }

    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM collections WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Curated membership; inserting an already-present product moves it to
    /// the new position instead of failing.
    pub async fn add_product(
        pool: &SqlitePool,
        collection_id: Uuid,
        product_id: Uuid,
        position: i32,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO collection_items (collection_id, product_id, position)
             VALUES ($1, $2, $3)
             ON CONFLICT (collection_id, product_id) DO UPDATE SET position = excluded.position",
        )
        .bind(collection_id)
        .bind(product_id)
        .bind(position)
        .execute(pool)
        .await?;
        Ok(())
    }

    pub async fn remove_product(
        pool: &SqlitePool,
        collection_id: Uuid,
        product_id: Uuid,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM collection_items WHERE collection_id = $1 AND product_id = $2",
        )
        .bind(collection_id)
        .bind(product_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn products(
        pool: &SqlitePool,
        collection_id: Uuid,
    ) -> Result<Vec<ProductWithBrand>, sqlx::Error> {
        sqlx::query_as::<_, ProductWithBrand>(
            "SELECT p.*, b.name AS brand_name
             FROM collection_items ci
             JOIN products p ON p.id = ci.product_id
             LEFT JOIN brands b ON b.id = p.brand_id
             WHERE ci.collection_id = $1
             ORDER BY ci.position ASC",
        )
        .bind(collection_id)
        .fetch_all(pool)
        .await
    }
}
