//! Wishlist operations, mirroring the cart's lazy-creation pattern.

use db::models::{
    product::Product,
    wishlist::{Wishlist, WishlistItem, WishlistItemDetail},
};
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum WishlistError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("product not found")]
    ProductNotFound,
    #[error("product is already in your wishlist")]
    AlreadyInWishlist,
}

pub struct WishlistService;

impl WishlistService {
    async fn get_or_create(pool: &SqlitePool, user_id: Uuid) -> Result<Wishlist, WishlistError> {
        if let Some(wishlist) = Wishlist::find_by_user(pool, user_id).await? {
            return Ok(wishlist);
        }
        match Wishlist::create(pool, user_id).await {
            Ok(wishlist) => Ok(wishlist),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                debug!(%user_id, "lost wishlist creation race, re-reading");
                Wishlist::find_by_user(pool, user_id)
                    .await?
                    .ok_or(sqlx::Error::RowNotFound)
                    .map_err(WishlistError::from)
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn add(
        pool: &SqlitePool,
        user_id: Uuid,
        product_id: Uuid,
    ) -> Result<WishlistItem, WishlistError> {
        Product::find_by_id(pool, product_id)
            .await?
            .ok_or(WishlistError::ProductNotFound)?;
        let wishlist = Self::get_or_create(pool, user_id).await?;
        if WishlistItem::contains(pool, wishlist.id, product_id).await? {
            return Err(WishlistError::AlreadyInWishlist);
        }
        match WishlistItem::insert(pool, wishlist.id, product_id).await {
            Ok(item) => Ok(item),
            // Two concurrent adds can both pass the pre-check; the unique
            // constraint settles it.
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(WishlistError::AlreadyInWishlist)
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn remove(
        pool: &SqlitePool,
        user_id: Uuid,
        product_id: Uuid,
    ) -> Result<(), WishlistError> {
        WishlistItem::delete_for_user(pool, user_id, product_id).await?;
        Ok(())
    }

    pub async fn contains(
        pool: &SqlitePool,
        user_id: Uuid,
        product_id: Uuid,
    ) -> Result<bool, WishlistError> {
        let Some(wishlist) = Wishlist::find_by_user(pool, user_id).await? else {
            return Ok(false);
        };
        Ok(WishlistItem::contains(pool, wishlist.id, product_id).await?)
    }

    pub async fn list(
        pool: &SqlitePool,
        user_id: Uuid,
    ) -> Result<Vec<WishlistItemDetail>, WishlistError> {
        let Some(wishlist) = Wishlist::find_by_user(pool, user_id).await? else {
            return Ok(vec![]);
        };
        Ok(WishlistItem::list_details(pool, wishlist.id).await?)
    }

    pub async fn count(pool: &SqlitePool, user_id: Uuid) -> Result<i64, WishlistError> {
        Ok(WishlistItem::count_for_user(pool, user_id).await?)
    }

    pub async fn clear(pool: &SqlitePool, user_id: Uuid) -> Result<(), WishlistError> {
        if let Some(wishlist) = Wishlist::find_by_user(pool, user_id).await? {
            WishlistItem::clear(pool, wishlist.id).await?;
        }
        Ok(())
    }
}
