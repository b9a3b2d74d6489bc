use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool, Type, types::Json};
use strum_macros::{Display, EnumString};
use ts_rs::TS;
use uuid::Uuid;

#[derive(
    Debug, Clone, Copy, Type, Serialize, Deserialize, PartialEq, TS, EnumString, Display, Default,
)]
#[sqlx(type_name = "product_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ProductStatus {
    #[default]
    Active,
    Draft,
    Archived,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, TS, EnumString, Display, Default)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ProductSort {
    Price,
    Name,
    #[default]
    CreatedAt,
}

impl ProductSort {
    fn column(&self) -> &'static str {
        match self {
            ProductSort::Price => "p.price_cents",
            ProductSort::Name => "p.name",
            ProductSort::CreatedAt => "p.created_at",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, TS, EnumString, Display, Default)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    fn keyword(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Product {
    pub id: Uuid,
    pub merchant_id: Uuid,
    pub brand_id: Option<Uuid>,
    pub name: String,
    pub description: String,
    pub price_cents: i64,
    pub sale_price_cents: Option<i64>,
    pub stock_count: i32,
    pub category: Option<String>,
    #[ts(type = "Array<string>")]
    pub images: Json<Vec<String>>,
    pub status: ProductStatus,
    pub is_new: bool,
    pub on_sale: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Price a buyer actually pays right now.
    pub fn effective_price_cents(&self) -> i64 {
        if self.on_sale {
            self.sale_price_cents.unwrap_or(self.price_cents)
        } else {
            self.price_cents
        }
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct ProductWithBrand {
    #[sqlx(flatten)]
    #[serde(flatten)]
    #[ts(flatten)]
    pub product: Product,
    pub brand_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateProduct {
    pub merchant_id: Uuid,
    pub brand_id: Option<Uuid>,
    pub name: String,
    pub description: String,
    pub price_cents: i64,
    pub sale_price_cents: Option<i64>,
    pub stock_count: i32,
    pub category: Option<String>,
    pub images: Vec<String>,
    pub is_new: bool,
    pub on_sale: bool,
}

/// Catalog query parameters; everything is optional.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub search: Option<String>,
    pub category: Option<String>,
    pub brand_id: Option<Uuid>,
    pub min_price_cents: Option<i64>,
    pub max_price_cents: Option<i64>,
    pub on_sale: Option<bool>,
    pub is_new: Option<bool>,
    pub sort_by: ProductSort,
    pub sort_order: SortOrder,
    pub page: u32,
    pub per_page: u32,
}

impl ProductFilter {
    fn push_conditions(&self, qb: &mut QueryBuilder<'_, Sqlite>) {
        qb.push(" WHERE p.status = ").push_bind(ProductStatus::Active);
        if let Some(search) = &self.search {
            // LIKE wildcards in user input match literally.
            let escaped = search
                .replace('\\', "\\\\")
                .replace('%', "\\%")
                .replace('_', "\\_");
            let pattern = format!("%{escaped}%");
            qb.push(" AND (p.name LIKE ")
                .push_bind(pattern.clone())
                .push(" ESCAPE '\\' OR p.description LIKE ")
                .push_bind(pattern)
                .push(" ESCAPE '\\')");
        }
        if let Some(category) = &self.category {
            qb.push(" AND p.category = ").push_bind(category.clone());
        }
        if let Some(brand_id) = self.brand_id {
            qb.push(" AND p.brand_id = ").push_bind(brand_id);
        }
        if let Some(min) = self.min_price_cents {
            qb.push(" AND p.price_cents >= ").push_bind(min);
        }
        if let Some(max) = self.max_price_cents {
            qb.push(" AND p.price_cents <= ").push_bind(max);
        }
        if let Some(on_sale) = self.on_sale {
            qb.push(" AND p.on_sale = ").push_bind(on_sale);
        }
        if let Some(is_new) = self.is_new {
            qb.push(" AND p.is_new = ").push_bind(is_new);
        }
    }
}

impl Product {
    pub async fn create(pool: &SqlitePool, data: &CreateProduct) -> Result<Self, sqlx::Error> {
        let id = Uuid::new_v4();
        sqlx::query_as::<_, Product>(
            "INSERT INTO products (id, merchant_id, brand_id, name, description, price_cents,
                                   sale_price_cents, stock_count, category, images, is_new, on_sale)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING *",
        )
        .bind(id)
        .bind(data.merchant_id)
        .bind(data.brand_id)
        .bind(&data.name)
        .bind(&data.description)
        .bind(data.price_cents)
        .bind(data.sale_price_cents)
        .bind(data.stock_count)
        .bind(&data.category)
        .bind(Json(&data.images))
        .bind(data.is_new)
        .bind(data.on_sale)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_with_brand(
        pool: &SqlitePool,
        id: Uuid,
    ) -> Result<Option<ProductWithBrand>, sqlx::Error> {
        sqlx::query_as::<_, ProductWithBrand>(
            "SELECT p.*, b.name AS brand_name
             FROM products p
             LEFT JOIN brands b ON b.id = p.brand_id
             WHERE p.id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Filtered, sorted, paginated catalog page plus the unpaginated total.
    pub async fn search(
        pool: &SqlitePool,
        filter: &ProductFilter,
    ) -> Result<(Vec<ProductWithBrand>, i64), sqlx::Error> {
        let mut count_qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM products p");
        filter.push_conditions(&mut count_qb);
        let total: i64 = count_qb.build_query_scalar().fetch_one(pool).await?;

        let mut qb = QueryBuilder::<Sqlite>::new(
            "SELECT p.*, b.name AS brand_name FROM products p
             LEFT JOIN brands b ON b.id = p.brand_id",
        );
        filter.push_conditions(&mut qb);
        // Sort column and direction come from fixed enums, never user text.
        qb.push(format!(
            " ORDER BY {} {}",
            filter.sort_by.column(),
            filter.sort_order.keyword()
        ));
        let per_page = filter.per_page.clamp(1, 100) as i64;
        let page = filter.page.max(1) as i64;
        qb.push(" LIMIT ")
            .push_bind(per_page)
            .push(" OFFSET ")
            .push_bind((page - 1) * per_page);

        let rows = qb.build_query_as::<ProductWithBrand>().fetch_all(pool).await?;
        Ok((rows, total))
    }

    pub async fn bulk_update_status(
        pool: &SqlitePool,
        ids: &[Uuid],
        status: ProductStatus,
    ) -> Result<u64, sqlx::Error> {
        let mut qb = QueryBuilder::<Sqlite>::new("UPDATE products SET status = ");
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

    pub async fn bulk_delete(pool: &SqlitePool, ids: &[Uuid]) -> Result<u64, sqlx::Error> {
        let mut qb = QueryBuilder::<Sqlite>::new("DELETE FROM products WHERE id IN (");
        let mut separated = qb.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");
        let result = qb.build().execute(pool).await?;
        Ok(result.rows_affected())
    }
}
