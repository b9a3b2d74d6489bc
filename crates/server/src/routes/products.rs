//! Catalog browsing routes.

use axum::{
    Router,
    extract::{Path, Query, State},
    response::Json as ResponseJson,
    routing::get,
};
use db::models::product::{ProductFilter, ProductSort, ProductWithBrand, SortOrder};
use serde::Deserialize;
use services::services::catalog::{CatalogService, ProductPage};
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub brand_id: Option<Uuid>,
    /// Price bounds in whole currency units, e.g. `minPrice=100`.
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub on_sale: Option<bool>,
    pub is_new: Option<bool>,
    #[serde(default)]
    pub sort_by: ProductSort,
    #[serde(default)]
    pub sort_order: SortOrder,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl From<ProductListQuery> for ProductFilter {
    fn from(query: ProductListQuery) -> Self {
        ProductFilter {
            search: query.search,
            category: query.category,
            brand_id: query.brand_id,
            min_price_cents: query.min_price.map(|p| (p * 100.0).round() as i64),
            max_price_cents: query.max_price.map(|p| (p * 100.0).round() as i64),
            on_sale: query.on_sale,
            is_new: query.is_new,
            sort_by: query.sort_by,
            sort_order: query.sort_order,
            page: query.page.unwrap_or(1),
            per_page: query.per_page.unwrap_or(20),
        }
    }
}

pub async fn list_products(
    State(app): State<AppState>,
    Query(query): Query<ProductListQuery>,
) -> Result<ResponseJson<ApiResponse<ProductPage>>, ApiError> {
    let filter = ProductFilter::from(query);
    let page = CatalogService::list_products(&app.db().pool, &filter).await?;
    Ok(ResponseJson(ApiResponse::success(page)))
}

pub async fn get_product(
    State(app): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<ProductWithBrand>>, ApiError> {
    let product = CatalogService::get_product(&app.db().pool, id).await?;
    Ok(ResponseJson(ApiResponse::success(product)))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products))
        .route("/products/{id}", get(get_product))
}
