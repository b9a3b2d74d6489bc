//! Account routes: profile, addresses, payment methods, notifications.

use axum::{
    Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::{delete, get, post},
};
use db::models::{
    address::{Address, CreateAddress},
    notification::Notification,
    payment_method::{CreatePaymentMethod, PaymentMethod},
    user::User,
};
use services::services::auth::{AuthService, UpdateProfileInput};
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError, session::SessionUser};

pub async fn get_profile(
    State(app): State<AppState>,
    SessionUser(session): SessionUser,
) -> Result<ResponseJson<ApiResponse<User>>, ApiError> {
    let user = AuthService::get_profile(&app.db().pool, session.sub).await?;
    Ok(ResponseJson(ApiResponse::success(user)))
}

pub async fn update_profile(
    State(app): State<AppState>,
    SessionUser(session): SessionUser,
    axum::Json(payload): axum::Json<UpdateProfileInput>,
) -> Result<ResponseJson<ApiResponse<User>>, ApiError> {
    let user = AuthService::update_profile(&app.db().pool, session.sub, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(user)))
}

pub async fn list_addresses(
    State(app): State<AppState>,
    SessionUser(session): SessionUser,
) -> Result<ResponseJson<ApiResponse<Vec<Address>>>, ApiError> {
    let addresses = Address::list_by_user(&app.db().pool, session.sub).await?;
    Ok(ResponseJson(ApiResponse::success(addresses)))
}

pub async fn create_address(
    State(app): State<AppState>,
    SessionUser(session): SessionUser,
    axum::Json(payload): axum::Json<CreateAddress>,
) -> Result<ResponseJson<ApiResponse<Address>>, ApiError> {
    let address = Address::create(&app.db().pool, session.sub, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(address)))
}

pub async fn set_default_address(
    State(app): State<AppState>,
    SessionUser(session): SessionUser,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let affected = Address::set_default(&app.db().pool, session.sub, id).await?;
    if affected == 0 {
        return Err(ApiError::NotFound);
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

pub async fn delete_address(
    State(app): State<AppState>,
    SessionUser(session): SessionUser,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    Address::delete_for_user(&app.db().pool, id, session.sub).await?;
    Ok(ResponseJson(ApiResponse::success(())))
}

pub async fn list_payment_methods(
    State(app): State<AppState>,
    SessionUser(session): SessionUser,
) -> Result<ResponseJson<ApiResponse<Vec<PaymentMethod>>>, ApiError> {
    let methods = PaymentMethod::list_by_user(&app.db().pool, session.sub).await?;
    Ok(ResponseJson(ApiResponse::success(methods)))
}

pub async fn create_payment_method(
    State(app): State<AppState>,
    SessionUser(session): SessionUser,
    axum::Json(payload): axum::Json<CreatePaymentMethod>,
) -> Result<ResponseJson<ApiResponse<PaymentMethod>>, ApiError> {
    let method = PaymentMethod::create(&app.db().pool, session.sub, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(method)))
}

pub async fn set_default_payment_method(
    State(app): State<AppState>,
    SessionUser(session): SessionUser,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let affected = PaymentMethod::set_default(&app.db().pool, session.sub, id).await?;
    if affected == 0 {
        return Err(ApiError::NotFound);
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

pub async fn delete_payment_method(
    State(app): State<AppState>,
    SessionUser(session): SessionUser,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    PaymentMethod::delete_for_user(&app.db().pool, id, session.sub).await?;
    Ok(ResponseJson(ApiResponse::success(())))
}

pub async fn list_notifications(
    State(app): State<AppState>,
    SessionUser(session): SessionUser,
) -> Result<ResponseJson<ApiResponse<Vec<Notification>>>, ApiError> {
    let notifications = Notification::list_by_user(&app.db().pool, session.sub).await?;
    Ok(ResponseJson(ApiResponse::success(notifications)))
}

pub async fn mark_notification_read(
    State(app): State<AppState>,
    SessionUser(session): SessionUser,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    Notification::mark_read(&app.db().pool, id, session.sub).await?;
    Ok(ResponseJson(ApiResponse::success(())))
}

pub async fn mark_all_notifications_read(
    State(app): State<AppState>,
    SessionUser(session): SessionUser,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    Notification::mark_all_read(&app.db().pool, session.sub).await?;
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/profile", get(get_profile).put(update_profile))
        .route(
            "/profile/addresses",
            get(list_addresses).post(create_address),
        )
        .route("/profile/addresses/{id}", delete(delete_address))
        .route(
            "/profile/addresses/{id}/default",
            post(set_default_address),
        )
        .route(
            "/profile/payment-methods",
            get(list_payment_methods).post(create_payment_method),
        )
        .route(
            "/profile/payment-methods/{id}",
            delete(delete_payment_method),
        )
        .route(
            "/profile/payment-methods/{id}/default",
            post(set_default_payment_method),
        )
        .route("/profile/notifications", get(list_notifications))
        .route(
            "/profile/notifications/{id}/read",
            post(mark_notification_read),
        )
        .route(
            "/profile/notifications/read-all",
            post(mark_all_notifications_read),
        )
}
