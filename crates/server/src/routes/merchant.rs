//! Merchant onboarding routes for the applicant side.

use axum::{Router, extract::State, response::Json as ResponseJson, routing::{get, post}};
use db::models::merchant_application::{CreateMerchantApplication, MerchantApplication};
use services::services::merchant_application::MerchantApplicationService;
use utils::response::ApiResponse;

use crate::{AppState, error::ApiError, session::SessionUser};

pub async fn apply(
    State(app): State<AppState>,
    SessionUser(session): SessionUser,
    axum::Json(payload): axum::Json<CreateMerchantApplication>,
) -> Result<ResponseJson<ApiResponse<MerchantApplication>>, ApiError> {
    let application =
        MerchantApplicationService::submit(&app.db().pool, session.sub, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(application)))
}

/// The applicant's most recent application, if any.
pub async fn my_application(
    State(app): State<AppState>,
    SessionUser(session): SessionUser,
) -> Result<ResponseJson<ApiResponse<Option<MerchantApplication>>>, ApiError> {
    let application =
        MerchantApplicationService::latest_for_user(&app.db().pool, session.sub).await?;
    Ok(ResponseJson(ApiResponse::success(application)))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/merchant/apply", post(apply))
        .route("/merchant/application", get(my_application))
}
