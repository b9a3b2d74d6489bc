use axum::{Router, extract::State, response::Json as ResponseJson, routing::get};
use db::models::brand::Brand;
use services::services::catalog::CatalogService;
use utils::response::ApiResponse;

use crate::{AppState, error::ApiError};

pub async fn list_brands(
    State(app): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<Brand>>>, ApiError> {
    let brands = CatalogService::list_brands(&app.db().pool).await?;
    Ok(ResponseJson(ApiResponse::success(brands)))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/brands", get(list_brands))
}
