//! Curated collections: public reads, admin-gated writes.

use axum::{
    Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::{delete, get, post},
};
use db::models::collection::{Collection, CollectionWithProducts};
use serde::Deserialize;
use services::services::catalog::CatalogService;
use ts_rs::TS;
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError, session::AdminUser};

#[derive(Debug, Deserialize, TS)]
pub struct CreateCollectionRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
pub struct UpdateCollectionRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct AddCollectionItemRequest {
    pub product_id: Uuid,
    #[serde(default)]
    pub position: i32,
}

pub async fn list_collections(
    State(app): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<Collection>>>, ApiError> {
    let collections = CatalogService::list_collections(&app.db().pool).await?;
    Ok(ResponseJson(ApiResponse::success(collections)))
}

pub async fn get_collection(
    State(app): State<AppState>,
    Path(slug): Path<String>,
) -> Result<ResponseJson<ApiResponse<CollectionWithProducts>>, ApiError> {
    let collection = CatalogService::get_collection(&app.db().pool, &slug).await?;
    Ok(ResponseJson(ApiResponse::success(collection)))
}

pub async fn create_collection(
    State(app): State<AppState>,
    AdminUser(_admin): AdminUser,
    axum::Json(payload): axum::Json<CreateCollectionRequest>,
) -> Result<ResponseJson<ApiResponse<Collection>>, ApiError> {
    let collection = CatalogService::create_collection(
        &app.db().pool,
        &payload.name,
        payload.description.as_deref(),
    )
    .await?;
    Ok(ResponseJson(ApiResponse::success(collection)))
}

pub async fn update_collection(
    State(app): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(slug): Path<String>,
    axum::Json(payload): axum::Json<UpdateCollectionRequest>,
) -> Result<ResponseJson<ApiResponse<Collection>>, ApiError> {
    let collection = CatalogService::update_collection(
        &app.db().pool,
        &slug,
        &payload.name,
        payload.description.as_deref(),
    )
    .await?;
    Ok(ResponseJson(ApiResponse::success(collection)))
}

pub async fn delete_collection(
    State(app): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(slug): Path<String>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    CatalogService::delete_collection(&app.db().pool, &slug).await?;
    Ok(ResponseJson(ApiResponse::success(())))
}

pub async fn add_item(
    State(app): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(slug): Path<String>,
    axum::Json(payload): axum::Json<AddCollectionItemRequest>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    CatalogService::add_to_collection(&app.db().pool, &slug, payload.product_id, payload.position)
        .await?;
    Ok(ResponseJson(ApiResponse::success(())))
}

pub async fn remove_item(
    State(app): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path((slug, product_id)): Path<(String, Uuid)>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    CatalogService::remove_from_collection(&app.db().pool, &slug, product_id).await?;
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/collections",
            get(list_collections).post(create_collection),
        )
        .route(
            "/collections/{slug}",
            get(get_collection)
                .put(update_collection)
                .delete(delete_collection),
        )
        .route("/collections/{slug}/items", post(add_item))
        .route(
            "/collections/{slug}/items/{product_id}",
            delete(remove_item),
        )
}
