//! Admin routes: application review and the bulk mutation actions. Every
//! handler takes `AdminUser`, which rejects non-admin sessions before any
//! work happens.

use axum::{
    Router,
    extract::{Path, Query, State},
    response::Json as ResponseJson,
    routing::{get, post},
};
use db::models::{
    merchant::{Merchant, MerchantStatus},
    merchant_application::{MerchantApplication, MerchantApplicationStatus},
    order::OrderStatus,
    product::ProductStatus,
    user::{UserRole, UserStatus},
};
use serde::{Deserialize, Serialize};
use services::services::{admin::AdminService, merchant_application::MerchantApplicationService};
use ts_rs::TS;
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError, session::AdminUser};

#[derive(Debug, Deserialize)]
pub struct ApplicationListQuery {
    pub status: Option<MerchantApplicationStatus>,
}

#[derive(Debug, Deserialize, TS)]
pub struct RejectRequest {
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
pub struct BulkRequest<V> {
    pub ids: Vec<Uuid>,
    pub value: V,
}

#[derive(Debug, Deserialize, TS)]
pub struct BulkDeleteRequest {
    pub ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize, TS)]
pub struct BulkOutcome {
    pub affected: u64,
}

pub async fn list_applications(
    State(app): State<AppState>,
    AdminUser(_admin): AdminUser,
    Query(query): Query<ApplicationListQuery>,
) -> Result<ResponseJson<ApiResponse<Vec<MerchantApplication>>>, ApiError> {
    let applications =
        MerchantApplicationService::list(&app.db().pool, query.status).await?;
    Ok(ResponseJson(ApiResponse::success(applications)))
}

pub async fn approve_application(
    State(app): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Merchant>>, ApiError> {
    let merchant =
        MerchantApplicationService::approve(&app.db().pool, id, admin.sub).await?;
    Ok(ResponseJson(ApiResponse::success(merchant)))
}

pub async fn reject_application(
    State(app): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
    axum::Json(payload): axum::Json<RejectRequest>,
) -> Result<ResponseJson<ApiResponse<MerchantApplication>>, ApiError> {
    let application = MerchantApplicationService::reject(
        &app.db().pool,
        id,
        admin.sub,
        payload.reason.as_deref(),
    )
    .await?;
    Ok(ResponseJson(ApiResponse::success(application)))
}

pub async fn update_merchant_status(
    State(app): State<AppState>,
    AdminUser(_admin): AdminUser,
    axum::Json(payload): axum::Json<BulkRequest<MerchantStatus>>,
) -> Result<ResponseJson<ApiResponse<BulkOutcome>>, ApiError> {
    let affected =
        AdminService::update_merchant_status(&app.db().pool, &payload.ids, payload.value).await?;
    Ok(ResponseJson(ApiResponse::success(BulkOutcome { affected })))
}

pub async fn update_user_status(
    State(app): State<AppState>,
    AdminUser(_admin): AdminUser,
    axum::Json(payload): axum::Json<BulkRequest<UserStatus>>,
) -> Result<ResponseJson<ApiResponse<BulkOutcome>>, ApiError> {
    let affected =
        AdminService::update_user_status(&app.db().pool, &payload.ids, payload.value).await?;
    Ok(ResponseJson(ApiResponse::success(BulkOutcome { affected })))
}

pub async fn update_user_role(
    State(app): State<AppState>,
    AdminUser(_admin): AdminUser,
    axum::Json(payload): axum::Json<BulkRequest<UserRole>>,
) -> Result<ResponseJson<ApiResponse<BulkOutcome>>, ApiError> {
    let affected =
        AdminService::update_user_role(&app.db().pool, &payload.ids, payload.value).await?;
    Ok(ResponseJson(ApiResponse::success(BulkOutcome { affected })))
}

pub async fn update_product_status(
    State(app): State<AppState>,
    AdminUser(_admin): AdminUser,
    axum::Json(payload): axum::Json<BulkRequest<ProductStatus>>,
) -> Result<ResponseJson<ApiResponse<BulkOutcome>>, ApiError> {
    let affected =
        AdminService::update_product_status(&app.db().pool, &payload.ids, payload.value).await?;
    Ok(ResponseJson(ApiResponse::success(BulkOutcome { affected })))
}

pub async fn delete_products(
    State(app): State<AppState>,
    AdminUser(_admin): AdminUser,
    axum::Json(payload): axum::Json<BulkDeleteRequest>,
) -> Result<ResponseJson<ApiResponse<BulkOutcome>>, ApiError> {
    let affected = AdminService::delete_products(&app.db().pool, &payload.ids).await?;
    Ok(ResponseJson(ApiResponse::success(BulkOutcome { affected })))
}

pub async fn update_orders_status(
    State(app): State<AppState>,
    AdminUser(_admin): AdminUser,
    axum::Json(payload): axum::Json<BulkRequest<OrderStatus>>,
) -> Result<ResponseJson<ApiResponse<BulkOutcome>>, ApiError> {
    let affected =
        AdminService::update_orders_status(&app.db().pool, &payload.ids, payload.value).await?;
    Ok(ResponseJson(ApiResponse::success(BulkOutcome { affected })))
}

pub fn router() -> Router<AppState> {
    Router::new().nest(
        "/admin",
        Router::new()
            .route("/applications", get(list_applications))
            .route("/applications/{id}/approve", post(approve_application))
            .route("/applications/{id}/reject", post(reject_application))
            .route("/merchants/status", post(update_merchant_status))
            .route("/users/status", post(update_user_status))
            .route("/users/role", post(update_user_role))
            .route("/products/status", post(update_product_status))
            .route("/products/delete", post(delete_products))
            .route("/orders/status", post(update_orders_status)),
    )
}
