//! Registration, login, and profile updates. Password hashing runs on the
//! blocking pool.

use bcrypt::{DEFAULT_COST, hash, verify};
use db::models::user::{CreateUser, User};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::info;
use ts_rs::TS;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("an account with that email already exists")]
    EmailTaken,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("user not found")]
    UserNotFound,
    #[error("email and password are required")]
    MissingFields,
    #[error("hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),
    #[error("blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

#[derive(Debug, Clone, Deserialize, TS)]
pub struct RegisterInput {
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, TS)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, TS)]
pub struct UpdateProfileInput {
    pub name: String,
    pub email: String,
}

pub struct AuthService;

impl AuthService {
    pub async fn register(pool: &SqlitePool, input: RegisterInput) -> Result<User, AuthError> {
        let email = input.email.trim().to_lowercase();
        if email.is_empty() || input.password.is_empty() {
            return Err(AuthError::MissingFields);
        }
        if User::find_by_email(pool, &email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let password = input.password;
        let password_hash =
            tokio::task::spawn_blocking(move || hash(password, DEFAULT_COST)).await??;

        let user = match User::create(
            pool,
            &CreateUser {
                email,
                password_hash,
                name: input.name,
            },
        )
        .await
        {
            Ok(user) => user,
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                return Err(AuthError::EmailTaken);
            }
            Err(e) => return Err(e.into()),
        };
        info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    pub async fn login(pool: &SqlitePool, input: LoginInput) -> Result<User, AuthError> {
        let email = input.email.trim().to_lowercase();
        let user = User::find_by_email(pool, &email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let password = input.password;
        let stored = user.password_hash.clone();
        let matches =
            tokio::task::spawn_blocking(move || verify(password, &stored)).await??;
        if !matches {
            return Err(AuthError::InvalidCredentials);
        }
        Ok(user)
    }

    pub async fn get_profile(pool: &SqlitePool, user_id: Uuid) -> Result<User, AuthError> {
        User::find_by_id(pool, user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    pub async fn update_profile(
        pool: &SqlitePool,
        user_id: Uuid,
        input: &UpdateProfileInput,
    ) -> Result<User, AuthError> {
        let email = input.email.trim().to_lowercase();
        if email.is_empty() || input.name.trim().is_empty() {
            return Err(AuthError::MissingFields);
        }
        match User::update_profile(pool, user_id, input.name.trim(), &email).await {
            Ok(user) => Ok(user),
            Err(sqlx::Error::RowNotFound) => Err(AuthError::UserNotFound),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(AuthError::EmailTaken),
            Err(e) => Err(e.into()),
        }
    }
}
