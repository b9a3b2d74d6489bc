//! Order tracking routes. Orders are read-only for customers; status moves
//! only through the admin bulk action.

use axum::{
    Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::get,
};
use db::models::order::{Order, OrderWithItems};
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError, session::SessionUser};

pub async fn list_orders(
    State(app): State<AppState>,
    SessionUser(session): SessionUser,
) -> Result<ResponseJson<ApiResponse<Vec<OrderWithItems>>>, ApiError> {
    let pool = &app.db().pool;
    let orders = Order::list_by_user(pool, session.sub).await?;
    let mut result = Vec::with_capacity(orders.len());
    for order in orders {
        let items = Order::items(pool, order.id).await?;
        result.push(OrderWithItems { order, items });
    }
    Ok(ResponseJson(ApiResponse::success(result)))
}

pub async fn get_order(
    State(app): State<AppState>,
    SessionUser(session): SessionUser,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<OrderWithItems>>, ApiError> {
    let pool = &app.db().pool;
    let order = Order::find_for_user(pool, id, session.sub)
        .await?
        .ok_or(ApiError::NotFound)?;
    let items = Order::items(pool, order.id).await?;
    Ok(ResponseJson(ApiResponse::success(OrderWithItems {
        order,
        items,
    })))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/orders", get(list_orders))
        .route("/orders/{id}", get(get_order))
}
