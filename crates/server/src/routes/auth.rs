//! Registration and session management. The session is a signed JWT in an
//! HttpOnly cookie.

use axum::{
    Router,
    extract::State,
    http::{HeaderMap, HeaderValue, header::SET_COOKIE},
    response::Json as ResponseJson,
    routing::post,
};
use db::models::user::User;
use services::services::auth::{AuthService, LoginInput, RegisterInput};
use utils::{
    jwt::{self, SESSION_COOKIE, SessionClaims},
    response::ApiResponse,
};

use crate::{AppState, error::ApiError};

fn session_cookie(app: &AppState, user: &User) -> Result<HeaderValue, ApiError> {
    let config = app.config();
    let claims = SessionClaims::new(user.id, user.role.to_string(), config.jwt_ttl_hours);
    let token = jwt::sign(&claims, &config.jwt_secret)
        .map_err(|_| ApiError::Internal)?;
    let cookie = format!(
        "{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        config.jwt_ttl_hours * 3600
    );
    HeaderValue::from_str(&cookie).map_err(|_| ApiError::Internal)
}

pub async fn register(
    State(app): State<AppState>,
    axum::Json(payload): axum::Json<RegisterInput>,
) -> Result<(HeaderMap, ResponseJson<ApiResponse<User>>), ApiError> {
    let user = AuthService::register(&app.db().pool, payload).await?;
    let mut headers = HeaderMap::new();
    headers.insert(SET_COOKIE, session_cookie(&app, &user)?);
    Ok((headers, ResponseJson(ApiResponse::success(user))))
}

pub async fn login(
    State(app): State<AppState>,
    axum::Json(payload): axum::Json<LoginInput>,
) -> Result<(HeaderMap, ResponseJson<ApiResponse<User>>), ApiError> {
    let user = AuthService::login(&app.db().pool, payload).await?;
    let mut headers = HeaderMap::new();
    headers.insert(SET_COOKIE, session_cookie(&app, &user)?);
    Ok((headers, ResponseJson(ApiResponse::success(user))))
}

pub async fn logout() -> (HeaderMap, ResponseJson<ApiResponse<()>>) {
    let mut headers = HeaderMap::new();
    headers.insert(
        SET_COOKIE,
        HeaderValue::from_static("session=; Path=/; HttpOnly; Max-Age=0"),
    );
    (headers, ResponseJson(ApiResponse::success(())))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
}
