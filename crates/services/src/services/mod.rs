pub mod admin;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod merchant_application;
pub mod wishlist;

#[cfg(test)]
pub(crate) mod fixtures {
    use db::models::{
        merchant::Merchant,
        product::{CreateProduct, Product},
        user::{CreateUser, User},
    };
    use sqlx::SqlitePool;
    use uuid::Uuid;

    pub async fn seed_user(pool: &SqlitePool, email: &str) -> User {
        User::create(
            pool,
            &CreateUser {
                email: email.to_string(),
                password_hash: "$2b$10$fixture".to_string(),
                name: "Test User".to_string(),
            },
        )
        .await
        .unwrap()
    }

    pub async fn seed_merchant(pool: &SqlitePool, slug: &str) -> Merchant {
        let owner = seed_user(pool, &format!("{slug}-owner@example.com")).await;
        Merchant::create(pool, owner.id, "Fixture Store", slug, None)
            .await
            .unwrap()
    }

    pub async fn seed_product(pool: &SqlitePool, merchant_id: Uuid, stock: i32) -> Product {
        Product::create(
            pool,
            &CreateProduct {
                merchant_id,
                brand_id: None,
                name: "Silk Scarf".to_string(),
                description: "Hand-rolled edges".to_string(),
                price_cents: 24900,
                sale_price_cents: None,
                stock_count: stock,
                category: Some("accessories".to_string()),
                images: vec![],
                is_new: false,
                on_sale: false,
            },
        )
        .await
        .unwrap()
    }
}
