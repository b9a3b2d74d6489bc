//! Cart operations: lazy per-user cart, variant-key merging, stock checks.

use db::models::{
    cart::{Cart, CartItem, CartItemDetail},
    product::Product,
};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::debug;
use ts_rs::TS;
use utils::text::format_cents;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CartError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("product not found")]
    ProductNotFound,
    #[error("cart item not found")]
    ItemNotFound,
    #[error("quantity must be at least 1")]
    InvalidQuantity,
    #[error("only {available} in stock")]
    InsufficientStock { available: i32 },
}

/// The cart as the storefront renders it. Totals are derived at read time,
/// never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartItemDetail>,
    pub total_items: i64,
    pub total_amount: String,
}

pub struct CartService;

impl CartService {
    /// Find the user's cart, creating it on first use. A concurrent first
    /// add can lose the insert race on the unique user_id; fall back to
    /// re-reading the row that won.
    async fn get_or_create(pool: &SqlitePool, user_id: Uuid) -> Result<Cart, CartError> {
        if let Some(cart) = Cart::find_by_user(pool, user_id).await? {
            return Ok(cart);
        }
        match Cart::create(pool, user_id).await {
            Ok(cart) => Ok(cart),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                debug!(%user_id, "lost cart creation race, re-reading");
                Cart::find_by_user(pool, user_id)
                    .await?
                    .ok_or(sqlx::Error::RowNotFound)
                    .map_err(CartError::from)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Add a product to the cart, merging into an existing line when the
    /// variant key matches. The merged quantity may never exceed the
    /// product's current stock.
    pub async fn add_to_cart(
        pool: &SqlitePool,
        user_id: Uuid,
        product_id: Uuid,
        quantity: i32,
        selected_color: Option<&str>,
        selected_size: Option<&str>,
    ) -> Result<CartItem, CartError> {
        if quantity < 1 {
            return Err(CartError::InvalidQuantity);
        }
        let product = Product::find_by_id(pool, product_id)
            .await?
            .ok_or(CartError::ProductNotFound)?;
        let cart = Self::get_or_create(pool, user_id).await?;

        let existing =
            CartItem::find_by_variant(pool, cart.id, product_id, selected_color, selected_size)
                .await?;
        let merged = existing.as_ref().map_or(0, |i| i.quantity) + quantity;
        if merged > product.stock_count {
            return Err(CartError::InsufficientStock {
                available: product.stock_count,
            });
        }

        let item = match existing {
            Some(item) => CartItem::set_quantity(pool, item.id, merged).await?,
            None => {
                match CartItem::insert(
                    pool,
                    cart.id,
                    product_id,
                    quantity,
                    selected_color,
                    selected_size,
                )
                .await
                {
                    Ok(item) => item,
                    // A concurrent add created this line between our lookup
                    // and the insert; merge into the row that won.
                    Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                        debug!(%product_id, "lost cart line insert race, merging");
                        Self::merge_into_winning_line(
                            pool,
                            cart.id,
                            &product,
                            quantity,
                            selected_color,
                            selected_size,
                        )
                        .await?
                    }
                    Err(e) => return Err(e.into()),
                }
            }
        };
        Cart::touch(pool, cart.id).await?;
        Ok(item)
    }

    /// Recovery for a lost insert race on the variant key: re-read the line
    /// the other writer created and merge into it, still capped by stock.
    async fn merge_into_winning_line(
        pool: &SqlitePool,
        cart_id: Uuid,
        product: &Product,
        quantity: i32,
        selected_color: Option<&str>,
        selected_size: Option<&str>,
    ) -> Result<CartItem, CartError> {
        let item =
            CartItem::find_by_variant(pool, cart_id, product.id, selected_color, selected_size)
                .await?
                .ok_or(CartError::Database(sqlx::Error::RowNotFound))?;
        let merged = item.quantity + quantity;
        if merged > product.stock_count {
            return Err(CartError::InsufficientStock {
                available: product.stock_count,
            });
        }
        Ok(CartItem::set_quantity(pool, item.id, merged).await?)
    }

    /// Set a line's quantity. Zero or negative means remove.
    pub async fn update_item_quantity(
        pool: &SqlitePool,
        user_id: Uuid,
        item_id: Uuid,
        quantity: i32,
    ) -> Result<Option<CartItem>, CartError> {
        if quantity <= 0 {
            Self::remove_item(pool, user_id, item_id).await?;
            return Ok(None);
        }
        let item = CartItem::find_for_user(pool, item_id, user_id)
            .await?
            .ok_or(CartError::ItemNotFound)?;
        let product = Product::find_by_id(pool, item.product_id)
            .await?
            .ok_or(CartError::ProductNotFound)?;
        if quantity > product.stock_count {
            return Err(CartError::InsufficientStock {
                available: product.stock_count,
            });
        }
        let updated = CartItem::set_quantity(pool, item.id, quantity).await?;
        Cart::touch(pool, item.cart_id).await?;
        Ok(Some(updated))
    }

    /// Idempotent, owner-scoped removal. Removing a line that is not in the
    /// caller's cart is a silent no-op.
    pub async fn remove_item(
        pool: &SqlitePool,
        user_id: Uuid,
        item_id: Uuid,
    ) -> Result<(), CartError> {
        CartItem::delete_for_user(pool, item_id, user_id).await?;
        Ok(())
    }

    pub async fn get_cart(pool: &SqlitePool, user_id: Uuid) -> Result<CartView, CartError> {
        let Some(cart) = Cart::find_by_user(pool, user_id).await? else {
            return Ok(CartView {
                items: vec![],
                total_items: 0,
                total_amount: format_cents(0),
            });
        };
        let items = CartItem::list_details(pool, cart.id).await?;
        let total_items: i64 = items.iter().map(|i| i.quantity as i64).sum();
        let total_cents: i64 = items
            .iter()
            .map(|i| i.effective_price_cents() * i.quantity as i64)
            .sum();
        Ok(CartView {
            items,
            total_items,
            total_amount: format_cents(total_cents),
        })
    }

    pub async fn item_count(pool: &SqlitePool, user_id: Uuid) -> Result<i64, CartError> {
        Ok(CartItem::total_quantity(pool, user_id).await?)
    }

    pub async fn clear(pool: &SqlitePool, user_id: Uuid) -> Result<(), CartError> {
        if let Some(cart) = Cart::find_by_user(pool, user_id).await? {
            CartItem::clear(pool, cart.id).await?;
            Cart::touch(pool, cart.id).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fixtures::{seed_merchant, seed_product, seed_user};
    use db::DBService;

    #[tokio::test]
    async fn same_variant_key_merges_into_one_line() {
        let db = DBService::new_in_memory().await.unwrap();
        let user = seed_user(&db.pool, "a@example.com").await;
        let merchant = seed_merchant(&db.pool, "store-a").await;
        let product = seed_product(&db.pool, merchant.id, 10).await;

        CartService::add_to_cart(&db.pool, user.id, product.id, 2, Some("Black"), None)
            .await
            .unwrap();
        let item =
            CartService::add_to_cart(&db.pool, user.id, product.id, 1, Some("Black"), None)
                .await
                .unwrap();

        assert_eq!(item.quantity, 3);
        let view = CartService::get_cart(&db.pool, user.id).await.unwrap();
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.total_items, 3);
    }

    #[tokio::test]
    async fn different_selectors_are_separate_lines() {
        let db = DBService::new_in_memory().await.unwrap();
        let user = seed_user(&db.pool, "a@example.com").await;
        let merchant = seed_merchant(&db.pool, "store-a").await;
        let product = seed_product(&db.pool, merchant.id, 10).await;

        CartService::add_to_cart(&db.pool, user.id, product.id, 1, Some("Black"), None)
            .await
            .unwrap();
        CartService::add_to_cart(&db.pool, user.id, product.id, 1, Some("Ivory"), None)
            .await
            .unwrap();
        CartService::add_to_cart(&db.pool, user.id, product.id, 1, None, None)
            .await
            .unwrap();

        let view = CartService::get_cart(&db.pool, user.id).await.unwrap();
        assert_eq!(view.items.len(), 3);
    }

    #[tokio::test]
    async fn losing_the_insert_race_merges_into_the_winning_line() {
        let db = DBService::new_in_memory().await.unwrap();
        let user = seed_user(&db.pool, "a@example.com").await;
        let merchant = seed_merchant(&db.pool, "store-a").await;
        let product = seed_product(&db.pool, merchant.id, 5).await;

        // Another writer's line already exists by the time ours fails.
        CartService::add_to_cart(&db.pool, user.id, product.id, 2, Some("Black"), None)
            .await
            .unwrap();
        let cart = Cart::find_by_user(&db.pool, user.id).await.unwrap().unwrap();

        let item = CartService::merge_into_winning_line(
            &db.pool,
            cart.id,
            &product,
            1,
            Some("Black"),
            None,
        )
        .await
        .unwrap();
        assert_eq!(item.quantity, 3);

        // The merge is still capped by stock.
        let err = CartService::merge_into_winning_line(
            &db.pool,
            cart.id,
            &product,
            5,
            Some("Black"),
            None,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, CartError::InsufficientStock { available: 5 }));

        let view = CartService::get_cart(&db.pool, user.id).await.unwrap();
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.total_items, 3);
    }

    #[tokio::test]
    async fn merged_quantity_cannot_exceed_stock() {
        let db = DBService::new_in_memory().await.unwrap();
        let user = seed_user(&db.pool, "a@example.com").await;
        let merchant = seed_merchant(&db.pool, "store-a").await;
        let product = seed_product(&db.pool, merchant.id, 3).await;

        CartService::add_to_cart(&db.pool, user.id, product.id, 2, None, None)
            .await
            .unwrap();
        let err = CartService::add_to_cart(&db.pool, user.id, product.id, 2, None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, CartError::InsufficientStock { available: 3 }));

        // The stored line is untouched.
        let view = CartService::get_cart(&db.pool, user.id).await.unwrap();
        assert_eq!(view.total_items, 2);
    }

    #[tokio::test]
    async fn zero_quantity_update_removes_and_is_idempotent() {
        let db = DBService::new_in_memory().await.unwrap();
        let user = seed_user(&db.pool, "a@example.com").await;
        let merchant = seed_merchant(&db.pool, "store-a").await;
        let product = seed_product(&db.pool, merchant.id, 5).await;

        let item = CartService::add_to_cart(&db.pool, user.id, product.id, 2, None, None)
            .await
            .unwrap();
        let removed = CartService::update_item_quantity(&db.pool, user.id, item.id, 0)
            .await
            .unwrap();
        assert!(removed.is_none());
        // Removing again is a no-op, not an error.
        CartService::update_item_quantity(&db.pool, user.id, item.id, -1)
            .await
            .unwrap();

        let view = CartService::get_cart(&db.pool, user.id).await.unwrap();
        assert!(view.items.is_empty());
    }

    #[tokio::test]
    async fn cross_user_removal_is_a_noop() {
        let db = DBService::new_in_memory().await.unwrap();
        let alice = seed_user(&db.pool, "alice@example.com").await;
        let mallory = seed_user(&db.pool, "mallory@example.com").await;
        let merchant = seed_merchant(&db.pool, "store-a").await;
        let product = seed_product(&db.pool, merchant.id, 5).await;

        let item = CartService::add_to_cart(&db.pool, alice.id, product.id, 1, None, None)
            .await
            .unwrap();
        CartService::remove_item(&db.pool, mallory.id, item.id)
            .await
            .unwrap();

        let view = CartService::get_cart(&db.pool, alice.id).await.unwrap();
        assert_eq!(view.items.len(), 1);
    }

    #[tokio::test]
    async fn totals_are_derived_from_current_prices() {
        let db = DBService::new_in_memory().await.unwrap();
        let user = seed_user(&db.pool, "a@example.com").await;
        let merchant = seed_merchant(&db.pool, "store-a").await;
        let product = seed_product(&db.pool, merchant.id, 10).await;

        CartService::add_to_cart(&db.pool, user.id, product.id, 2, None, None)
            .await
            .unwrap();
        let view = CartService::get_cart(&db.pool, user.id).await.unwrap();
        // 2 x 249.00
        assert_eq!(view.total_amount, "498.00");
        assert_eq!(view.total_items, 2);
    }

    #[tokio::test]
    async fn unknown_product_is_rejected() {
        let db = DBService::new_in_memory().await.unwrap();
        let user = seed_user(&db.pool, "a@example.com").await;
        let err = CartService::add_to_cart(&db.pool, user.id, Uuid::new_v4(), 1, None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, CartError::ProductNotFound));
    }

    #[tokio::test]
    async fn clear_empties_the_cart() {
        let db = DBService::new_in_memory().await.unwrap();
        let user = seed_user(&db.pool, "a@example.com").await;
        let merchant = seed_merchant(&db.pool, "store-a").await;
        let product = seed_product(&db.pool, merchant.id, 10).await;

        CartService::add_to_cart(&db.pool, user.id, product.id, 2, None, None)
            .await
            .unwrap();
        CartService::clear(&db.pool, user.id).await.unwrap();
        assert_eq!(CartService::item_count(&db.pool, user.id).await.unwrap(), 0);
    }
}
