//! Maps service errors onto HTTP status codes and the JSON envelope.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use services::services::{
    admin::AdminError, auth::AuthError, cart::CartError, catalog::CatalogError,
    merchant_application::MerchantApplicationError, wishlist::WishlistError,
};
use thiserror::Error;
use tracing::error;
use utils::response::ApiResponse;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("authentication required")]
    Unauthenticated,
    #[error("insufficient permissions")]
    Forbidden,
    #[error("not found")]
    NotFound,
    #[error("internal error")]
    Internal,
    #[error(transparent)]
    Cart(#[from] CartError),
    #[error(transparent)]
    Wishlist(#[from] WishlistError),
    #[error(transparent)]
    MerchantApplication(#[from] MerchantApplicationError),
    #[error(transparent)]
    Admin(#[from] AdminError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Cart(e) => match e {
                CartError::ProductNotFound | CartError::ItemNotFound => StatusCode::NOT_FOUND,
                CartError::InvalidQuantity | CartError::InsufficientStock { .. } => {
                    StatusCode::BAD_REQUEST
                }
                CartError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Wishlist(e) => match e {
                WishlistError::ProductNotFound => StatusCode::NOT_FOUND,
                WishlistError::AlreadyInWishlist => StatusCode::BAD_REQUEST,
                WishlistError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::MerchantApplication(e) => match e {
                MerchantApplicationError::NotFound => StatusCode::NOT_FOUND,
                MerchantApplicationError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
                _ => StatusCode::BAD_REQUEST,
            },
            ApiError::Admin(e) => match e {
                AdminError::EmptyIdList => StatusCode::BAD_REQUEST,
                AdminError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Catalog(e) => match e {
                CatalogError::ProductNotFound | CatalogError::CollectionNotFound => {
                    StatusCode::NOT_FOUND
                }
                CatalogError::CollectionExists | CatalogError::MissingName => {
                    StatusCode::BAD_REQUEST
                }
                CatalogError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Auth(e) => match e {
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::UserNotFound => StatusCode::NOT_FOUND,
                AuthError::EmailTaken | AuthError::MissingFields => StatusCode::BAD_REQUEST,
                AuthError::Database(_) | AuthError::Hash(_) | AuthError::Join(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %self, "request failed");
            "internal server error".to_string()
        } else {
            self.to_string()
        };
        (status, Json(ApiResponse::<()>::error(message))).into_response()
    }
}
