//! Routes for the wishlist.

use axum::{
    Router,
    extract::{Query, State},
    response::Json as ResponseJson,
    routing::get,
};
use db::models::wishlist::WishlistItemDetail;
use serde::{Deserialize, Serialize};
use services::services::wishlist::WishlistService;
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
pub struct WishlistQuery {
    #[serde(default)]
    pub count_only: bool,
    pub product_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all_fields = "camelCase", untagged)]
pub enum WishlistGetResponse {
    Membership { in_wishlist: bool },
    Count { count: i64 },
    Items(Vec<WishlistItemDetail>),
}

#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct AddToWishlistRequest {
    pub product_id: Uuid,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteWishlistQuery {
    pub product_id: Option<Uuid>,
    #[serde(default)]
    pub clear: bool,
}

/// `GET /api/wishlist` lists items; `?productId=` checks membership and
/// `?countOnly=true` returns the badge count. The latter two degrade for
/// anonymous visitors so UI chrome can render a neutral state.
pub async fn get_wishlist(
    State(app): State<AppState>,
    OptionalSession(session): OptionalSession,
    Query(query): Query<WishlistQuery>,
) -> Result<ResponseJson<ApiResponse<WishlistGetResponse>>, ApiError> {
    if let Some(product_id) = query.product_id {
        let Some(session) = session else {
            return Ok(ResponseJson(ApiResponse::failure(
                WishlistGetResponse::Membership { in_wishlist: false },
                "authentication required",
            )));
        };
        let in_wishlist =
            WishlistService::contains(&app.db().pool, session.sub, product_id).await?;
        return Ok(ResponseJson(ApiResponse::success(
            WishlistGetResponse::Membership { in_wishlist },
        )));
    }

    if query.count_only {
        let Some(session) = session else {
            return Ok(ResponseJson(ApiResponse::failure(
                WishlistGetResponse::Count { count: 0 },
                "authentication required",
            )));
        };
        let count = WishlistService::count(&app.db().pool, session.sub).await?;
        return Ok(ResponseJson(ApiResponse::success(
            WishlistGetResponse::Count { count },
        )));
    }

    let session = session.ok_or(ApiError::Unauthenticated)?;
    let items = WishlistService::list(&app.db().pool, session.sub).await?;
    Ok(ResponseJson(ApiResponse::success(
        WishlistGetResponse::Items(items),
    )))
}

pub async fn add_to_wishlist(
    State(app): State<AppState>,
    SessionUser(session): SessionUser,
    axum::Json(payload): axum::Json<AddToWishlistRequest>,
) -> Result<ResponseJson<ApiResponse<Vec<WishlistItemDetail>>>, ApiError> {
    WishlistService::add(&app.db().pool, session.sub, payload.product_id).await?;
    let items = WishlistService::list(&app.db().pool, session.sub).await?;
    Ok(ResponseJson(ApiResponse::success(items)))
}

pub async fn delete_from_wishlist(
    State(app): State<AppState>,
    SessionUser(session): SessionUser,
    Query(query): Query<DeleteWishlistQuery>,
) -> Result<ResponseJson<ApiResponse<Vec<WishlistItemDetail>>>, ApiError> {
    if query.clear {
        WishlistService::clear(&app.db().pool, session.sub).await?;
    } else if let Some(product_id) = query.product_id {
        WishlistService::remove(&app.db().pool, session.sub, product_id).await?;
    }
    let items = WishlistService::list(&app.db().pool, session.sub).await?;
    Ok(ResponseJson(ApiResponse::success(items)))
}

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/wishlist",
        get(get_wishlist)
            .post(add_to_wishlist)
            .delete(delete_from_wishlist),
    )
}
