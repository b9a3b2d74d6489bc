//! Catalog reads and admin-curated collections.

use db::models::{
    brand::Brand,
    collection::{Collection, CollectionWithProducts},
    product::{Product, ProductFilter, ProductWithBrand},
};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use thiserror::Error;
use ts_rs::TS;
use utils::text::slugify;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("product not found")]
    ProductNotFound,
    #[error("collection not found")]
    CollectionNotFound,
    #[error("a collection with that name already exists")]
    CollectionExists,
    #[error("collection name is required")]
    MissingName,
}

/// One page of catalog results.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct ProductPage {
    pub products: Vec<ProductWithBrand>,
    pub total: i64,
    pub page: u32,
    pub per_page: u32,
    pub total_pages: u32,
}

pub struct CatalogService;

impl CatalogService {
    pub async fn list_products(
        pool: &SqlitePool,
        filter: &ProductFilter,
    ) -> Result<ProductPage, CatalogError> {
        let (products, total) = Product::search(pool, filter).await?;
        let per_page = filter.per_page.clamp(1, 100);
        let page = filter.page.max(1);
        let total_pages = ((total as u32) + per_page - 1) / per_page;
        Ok(ProductPage {
            products,
            total,
            page,
            per_page,
            total_pages,
        })
    }

    pub async fn get_product(
        pool: &SqlitePool,
        id: Uuid,
    ) -> Result<ProductWithBrand, CatalogError> {
        Product::find_with_brand(pool, id)
            .await?
            .ok_or(CatalogError::ProductNotFound)
    }

    pub async fn list_brands(pool: &SqlitePool) -> Result<Vec<Brand>, CatalogError> {
        Ok(Brand::list_all(pool).await?)
    }

    pub async fn list_collections(pool: &SqlitePool) -> Result<Vec<Collection>, CatalogError> {
        Ok(Collection::list_all(pool).await?)
    }

    pub async fn get_collection(
        pool: &SqlitePool,
        slug: &str,
    ) -> Result<CollectionWithProducts, CatalogError> {
        let collection = Collection::find_by_slug(pool, slug)
            .await?
            .ok_or(CatalogError::CollectionNotFound)?;
        let products = Collection::products(pool, collection.id).await?;
        Ok(CollectionWithProducts {
            collection,
            products,
        })
    }

    pub async fn create_collection(
        pool: &SqlitePool,
        name: &str,
        description: Option<&str>,
    ) -> Result<Collection, CatalogError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CatalogError::MissingName);
        }
        match Collection::create(pool, name, &slugify(name), description).await {
            Ok(collection) => Ok(collection),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(CatalogError::CollectionExists)
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn update_collection(
        pool: &SqlitePool,
        slug: &str,
        name: &str,
        description: Option<&str>,
    ) -> Result<Collection, CatalogError> {
        let collection = Collection::find_by_slug(pool, slug)
            .await?
            .ok_or(CatalogError::CollectionNotFound)?;
        Ok(Collection::update(pool, collection.id, name, description).await?)
    }

    pub async fn delete_collection(pool: &SqlitePool, slug: &str) -> Result<(), CatalogError> {
        let collection = Collection::find_by_slug(pool, slug)
            .await?
            .ok_or(CatalogError::CollectionNotFound)?;
        Collection::delete(pool, collection.id).await?;
        Ok(())
    }

    pub async fn add_to_collection(
        pool: &SqlitePool,
        slug: &str,
        product_id: Uuid,
        position: i32,
    ) -> Result<(), CatalogError> {
        let collection = Collection::find_by_slug(pool, slug)
            .await?
            .ok_or(CatalogError::CollectionNotFound)?;
        Product::find_by_id(pool, product_id)
            .await?
            .ok_or(CatalogError::ProductNotFound)?;
        Collection::add_product(pool, collection.id, product_id, position).await?;
        Ok(())
    }

    pub async fn remove_from_collection(
        pool: &SqlitePool,
        slug: &str,
        product_id: Uuid,
    ) -> Result<(), CatalogError> {
        let collection = Collection::find_by_slug(pool, slug)
            .await?
            .ok_or(CatalogError::CollectionNotFound)?;
        Collection::remove_product(pool, collection.id, product_id).await?;
        Ok(())
    }
}
