//! Admin bulk mutations. One contract for all of them: validate the id
//! list, run a single batched statement, report the affected row count.
//! There is no per-row error isolation; a failure aborts the whole batch.

use db::models::{
    merchant::{Merchant, MerchantStatus},
    order::{Order, OrderStatus},
    product::{Product, ProductStatus},
    user::{User, UserRole, UserStatus},
};
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum AdminError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("id list cannot be empty")]
    EmptyIdList,
}

pub struct AdminService;

impl AdminService {
    fn validate_ids(ids: &[Uuid]) -> Result<(), AdminError> {
        if ids.is_empty() {
            return Err(AdminError::EmptyIdList);
        }
        Ok(())
    }

    pub async fn update_merchant_status(
        pool: &SqlitePool,
        ids: &[Uuid],
        status: MerchantStatus,
    ) -> Result<u64, AdminError> {
        Self::validate_ids(ids)?;
        let affected = Merchant::bulk_update_status(pool, ids, status).await?;
        info!(affected, %status, "bulk merchant status update");
        Ok(affected)
    }

    pub async fn update_user_status(
        pool: &SqlitePool,
        ids: &[Uuid],
        status: UserStatus,
    ) -> Result<u64, AdminError> {
        Self::validate_ids(ids)?;
        let affected = User::bulk_update_status(pool, ids, status).await?;
        info!(affected, %status, "bulk user status update");
        Ok(affected)
    }

    pub async fn update_user_role(
        pool: &SqlitePool,
        ids: &[Uuid],
        role: UserRole,
    ) -> Result<u64, AdminError> {
        Self::validate_ids(ids)?;
        let affected = User::bulk_update_role(pool, ids, role).await?;
        info!(affected, %role, "bulk user role update");
        Ok(affected)
    }

    pub async fn update_product_status(
        pool: &SqlitePool,
        ids: &[Uuid],
        status: ProductStatus,
    ) -> Result<u64, AdminError> {
        Self::validate_ids(ids)?;
        let affected = Product::bulk_update_status(pool, ids, status).await?;
        info!(affected, %status, "bulk product status update");
        Ok(affected)
    }

    pub async fn delete_products(pool: &SqlitePool, ids: &[Uuid]) -> Result<u64, AdminError> {
        Self::validate_ids(ids)?;
        let affected = Product::bulk_delete(pool, ids).await?;
        info!(affected, "bulk product delete");
        Ok(affected)
    }

    pub async fn update_orders_status(
        pool: &SqlitePool,
        ids: &[Uuid],
        status: OrderStatus,
    ) -> Result<u64, AdminError> {
        Self::validate_ids(ids)?;
        let affected = Order::bulk_update_status(pool, ids, status).await?;
        info!(affected, %status, "bulk order status update");
        Ok(affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fixtures::{seed_merchant, seed_product, seed_user};
    use db::DBService;

    #[tokio::test]
    async fn empty_id_list_is_rejected() {
        let db = DBService::new_in_memory().await.unwrap();
        let err = AdminService::update_user_status(&db.pool, &[], UserStatus::Suspended)
            .await
            .unwrap_err();
        assert!(matches!(err, AdminError::EmptyIdList));
    }

    #[tokio::test]
    async fn bulk_update_touches_only_given_ids() {
        let db = DBService::new_in_memory().await.unwrap();
        let a = seed_user(&db.pool, "a@example.com").await;
        let b = seed_user(&db.pool, "b@example.com").await;
        let c = seed_user(&db.pool, "c@example.com").await;

        let affected =
            AdminService::update_user_status(&db.pool, &[a.id, b.id], UserStatus::Suspended)
                .await
                .unwrap();
        assert_eq!(affected, 2);

        let untouched = User::find_by_id(&db.pool, c.id).await.unwrap().unwrap();
        assert_eq!(untouched.status, UserStatus::Active);
    }

    #[tokio::test]
    async fn bulk_delete_removes_products() {
        let db = DBService::new_in_memory().await.unwrap();
        let merchant = seed_merchant(&db.pool, "store-a").await;
        let p1 = seed_product(&db.pool, merchant.id, 5).await;
        let p2 = seed_product(&db.pool, merchant.id, 5).await;

        let affected = AdminService::delete_products(&db.pool, &[p1.id]).await.unwrap();
        assert_eq!(affected, 1);
        assert!(Product::find_by_id(&db.pool, p1.id).await.unwrap().is_none());
        assert!(Product::find_by_id(&db.pool, p2.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn unknown_ids_affect_zero_rows() {
        let db = DBService::new_in_memory().await.unwrap();
        let affected = AdminService::update_product_status(
            &db.pool,
            &[Uuid::new_v4()],
            ProductStatus::Archived,
        )
        .await
        .unwrap();
        assert_eq!(affected, 0);
    }
}
