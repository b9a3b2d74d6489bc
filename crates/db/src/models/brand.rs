use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Brand {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub logo_url: Option<String>,
}

impl Brand {
    pub async fn create(
        pool: &SqlitePool,
        name: &str,
        slug: &str,
        logo_url: Option<&str>,
    ) -> Result<Self, sqlx::Error> {
        let id = Uuid::new_v4();
        sqlx::query_as::<_, Brand>(
            "INSERT INTO brands (id, name, slug, logo_url) VALUES ($1, $2, $3, $4)
             RETURNING *",
        )
        .bind(id)
        .bind(name)
        .bind(slug)
        .bind(logo_url)
        .fetch_one(pool)
        .await
    }

    pub async fn list_all(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Brand>("SELECT * FROM brands ORDER BY name ASC")
            .fetch_all(pool)
            .await
    }
}
