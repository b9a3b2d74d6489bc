//! Session extractors. Role checks live here once instead of inside every
//! handler.

use axum::{extract::FromRequestParts, http::header::COOKIE, http::request::Parts};
use utils::jwt::{self, SESSION_COOKIE, SessionClaims};

use crate::{AppState, error::ApiError};

fn claims_from_parts(parts: &Parts, state: &AppState) -> Option<SessionClaims> {
    let cookies = parts.headers.get_all(COOKIE);
    for header in cookies {
        let Ok(value) = header.to_str() else { continue };
        for pair in value.split(';') {
            let pair = pair.trim();
            if let Some(token) = pair.strip_prefix(SESSION_COOKIE).and_then(|rest| rest.strip_prefix('=')) {
                if let Ok(claims) = jwt::verify(token, &state.config().jwt_secret) {
                    return Some(claims);
                }
            }
        }
    }
    None
}

/// A valid session. Rejects with 401 when the cookie is missing or invalid.
pub struct SessionUser(pub SessionClaims);

impl FromRequestParts<AppState> for SessionUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        claims_from_parts(parts, state)
            .map(SessionUser)
            .ok_or(ApiError::Unauthenticated)
    }
}

/// A session if one is present. Endpoints that must render for anonymous
/// visitors (cart badge, wishlist hearts) use this and degrade gracefully.
pub struct OptionalSession(pub Option<SessionClaims>);

impl FromRequestParts<AppState> for OptionalSession {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(OptionalSession(claims_from_parts(parts, state)))
    }
}

/// An admin session. 401 without a session, 403 for any other role.
pub struct AdminUser(pub SessionClaims);

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let claims = claims_from_parts(parts, state).ok_or(ApiError::Unauthenticated)?;
        if !claims.is_admin() {
            return Err(ApiError::Forbidden);
        }
        Ok(AdminUser(claims))
    }
}
