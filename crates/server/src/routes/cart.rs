//! Routes for the shopping cart.

use axum::{
    Router,
    extract::{Query, State},
    response::Json as ResponseJson,
    routing::get,
};
use serde::{Deserialize, Serialize};
use services::services::cart::{CartService, CartView};
use ts_rs::TS;
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{
    AppState,
    error::ApiError,
    session::{OptionalSession, SessionUser},
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartQuery {
    #[serde(default)]
    pub count_only: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CartCount {
    pub count: i64,
}

#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: Uuid,
    pub quantity: i32,
    pub selected_color: Option<String>,
    pub selected_size: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuantityRequest {
    pub item_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteCartQuery {
    pub item_id: Option<Uuid>,
    #[serde(default)]
    pub clear: bool,
}

#[derive(Debug, Clone, Serialize, TS)]
#[serde(untagged)]
pub enum CartGetResponse {
    Count(CartCount),
    View(CartView),
}

/// `GET /api/cart` returns the cart; `?countOnly=true` returns just the
/// badge count and degrades to a zero count for anonymous visitors instead
/// of a 401.
pub async fn get_cart(
    State(app): State<AppState>,
    OptionalSession(session): OptionalSession,
    Query(query): Query<CartQuery>,
) -> Result<ResponseJson<ApiResponse<CartGetResponse>>, ApiError> {
    if query.count_only {
        let Some(session) = session else {
            return Ok(ResponseJson(ApiResponse::failure(
                CartGetResponse::Count(CartCount { count: 0 }),
                "authentication required",
            )));
        };
        let count = CartService::item_count(&app.db().pool, session.sub).await?;
        return Ok(ResponseJson(ApiResponse::success(CartGetResponse::Count(
            CartCount { count },
        ))));
    }

    let session = session.ok_or(ApiError::Unauthenticated)?;
    let view = CartService::get_cart(&app.db().pool, session.sub).await?;
    Ok(ResponseJson(ApiResponse::success(CartGetResponse::View(
        view,
    ))))
}

pub async fn add_to_cart(
    State(app): State<AppState>,
    SessionUser(session): SessionUser,
    axum::Json(payload): axum::Json<AddToCartRequest>,
) -> Result<ResponseJson<ApiResponse<CartView>>, ApiError> {
    CartService::add_to_cart(
        &app.db().pool,
        session.sub,
        payload.product_id,
        payload.quantity,
        payload.selected_color.as_deref(),
        payload.selected_size.as_deref(),
    )
    .await?;
    let view = CartService::get_cart(&app.db().pool, session.sub).await?;
    Ok(ResponseJson(ApiResponse::success(view)))
}

pub async fn update_quantity(
    State(app): State<AppState>,
    SessionUser(session): SessionUser,
    axum::Json(payload): axum::Json<UpdateQuantityRequest>,
) -> Result<ResponseJson<ApiResponse<CartView>>, ApiError> {
    CartService::update_item_quantity(
        &app.db().pool,
        session.sub,
        payload.item_id,
        payload.quantity,
    )
    .await?;
    let view = CartService::get_cart(&app.db().pool, session.sub).await?;
    Ok(ResponseJson(ApiResponse::success(view)))
}

/// `DELETE /api/cart?itemId=...` removes one line, `?clear=true` empties
/// the cart.
pub async fn delete_from_cart(
    State(app): State<AppState>,
    SessionUser(session): SessionUser,
    Query(query): Query<DeleteCartQuery>,
) -> Result<ResponseJson<ApiResponse<CartView>>, ApiError> {
    if query.clear {
        CartService::clear(&app.db().pool, session.sub).await?;
    } else if let Some(item_id) = query.item_id {
        CartService::remove_item(&app.db().pool, session.sub, item_id).await?;
    }
    let view = CartService::get_cart(&app.db().pool, session.sub).await?;
    Ok(ResponseJson(ApiResponse::success(view)))
}

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/cart",
        get(get_cart)
            .post(add_to_cart)
            .put(update_quantity)
            .delete(delete_from_cart),
    )
}
