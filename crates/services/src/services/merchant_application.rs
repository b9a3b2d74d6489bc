//! Merchant onboarding: submit, approve, reject.
//!
//! Approval creates the merchant row, promotes the applicant, and stamps
//! the application in a single transaction, so a partially promoted user
//! can never be observed.

use db::models::{
    merchant::Merchant,
    merchant_application::{CreateMerchantApplication, MerchantApplication, MerchantApplicationStatus},
    notification::Notification,
    user::User,
};
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{info, warn};
use utils::text::slugify;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum MerchantApplicationError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("application not found")]
    NotFound,
    #[error("you already have a merchant account")]
    AlreadyMerchant,
    #[error("you already have a pending application")]
    AlreadyPending,
    #[error("application has already been reviewed")]
    AlreadyReviewed,
    #[error("store name is required")]
    MissingStoreName,
}

pub struct MerchantApplicationService;

impl MerchantApplicationService {
    /// Submit an application. The proposed slug is recorded for preview
    /// only; uniqueness is settled at approval time.
    pub async fn submit(
        pool: &SqlitePool,
        user_id: Uuid,
        input: &CreateMerchantApplication,
    ) -> Result<MerchantApplication, MerchantApplicationError> {
        let store_name = input.store_name.trim();
        if store_name.is_empty() {
            return Err(MerchantApplicationError::MissingStoreName);
        }
        if Merchant::find_by_user_id(pool, user_id).await?.is_some() {
            return Err(MerchantApplicationError::AlreadyMerchant);
        }
        if MerchantApplication::has_pending(pool, user_id).await? {
            return Err(MerchantApplicationError::AlreadyPending);
        }

        let proposed_slug = slugify(store_name);
        let application = MerchantApplication::create(
            pool,
            user_id,
            store_name,
            &proposed_slug,
            input.description.as_deref(),
        )
        .await?;
        info!(application_id = %application.id, %user_id, "merchant application submitted");
        Ok(application)
    }

    /// Approve a pending application. All three writes happen inside one
    /// transaction.
    pub async fn approve(
        pool: &SqlitePool,
        application_id: Uuid,
        reviewer_id: Uuid,
    ) -> Result<Merchant, MerchantApplicationError> {
        let application = MerchantApplication::find_by_id(pool, application_id)
            .await?
            .ok_or(MerchantApplicationError::NotFound)?;
        if !application.status.can_review() {
            return Err(MerchantApplicationError::AlreadyReviewed);
        }

        let mut tx = pool.begin().await?;

        let slug = Self::unique_slug(&mut tx, &application.proposed_slug).await?;
        let merchant = Merchant::create(
            &mut *tx,
            application.user_id,
            &application.store_name,
            &slug,
            application.description.as_deref(),
        )
        .await?;
        User::promote_to_merchant(&mut *tx, application.user_id).await?;
        match MerchantApplication::mark_reviewed(
            &mut *tx,
            application_id,
            MerchantApplicationStatus::Approved,
            reviewer_id,
            None,
        )
        .await
        {
            Ok(_) => {}
            // Status guard failed: someone reviewed it between our read and
            // this update. Roll everything back.
            Err(sqlx::Error::RowNotFound) => {
                tx.rollback().await?;
                return Err(MerchantApplicationError::AlreadyReviewed);
            }
            Err(e) => return Err(e.into()),
        }

        tx.commit().await?;
        info!(%application_id, merchant_id = %merchant.id, slug = %merchant.slug, "merchant application approved");

        // Best-effort notification after the commit; the approval stands
        // even if this write fails.
        if let Err(e) = Notification::create(
            pool,
            application.user_id,
            "Application approved",
            &format!("Welcome aboard — your store \"{}\" is live.", application.store_name),
        )
        .await
        {
            warn!(%application_id, error = %e, "failed to write approval notification");
        }

        Ok(merchant)
    }

    pub async fn reject(
        pool: &SqlitePool,
        application_id: Uuid,
        reviewer_id: Uuid,
        reason: Option<&str>,
    ) -> Result<MerchantApplication, MerchantApplicationError> {
        let application = MerchantApplication::find_by_id(pool, application_id)
            .await?
            .ok_or(MerchantApplicationError::NotFound)?;
        if !application.status.can_review() {
            return Err(MerchantApplicationError::AlreadyReviewed);
        }

        let rejected = match MerchantApplication::mark_reviewed(
            pool,
            application_id,
            MerchantApplicationStatus::Rejected,
            reviewer_id,
            reason,
        )
        .await
        {
            Ok(application) => application,
            Err(sqlx::Error::RowNotFound) => {
                return Err(MerchantApplicationError::AlreadyReviewed);
            }
            Err(e) => return Err(e.into()),
        };
        info!(%application_id, "merchant application rejected");

        if let Err(e) = Notification::create(
            pool,
            application.user_id,
            "Application update",
            reason.unwrap_or("Your merchant application was not approved."),
        )
        .await
        {
            warn!(%application_id, error = %e, "failed to write rejection notification");
        }

        Ok(rejected)
    }

    pub async fn list(
        pool: &SqlitePool,
        status: Option<MerchantApplicationStatus>,
    ) -> Result<Vec<MerchantApplication>, MerchantApplicationError> {
        Ok(MerchantApplication::list_by_status(pool, status).await?)
    }

    pub async fn latest_for_user(
        pool: &SqlitePool,
        user_id: Uuid,
    ) -> Result<Option<MerchantApplication>, MerchantApplicationError> {
        Ok(MerchantApplication::find_latest_by_user(pool, user_id).await?)
    }

    /// Probe `base`, `base-1`, `base-2`, ... against existing merchants
    /// until a free slug is found. Runs on the approval transaction, so the
    /// final insert and the probes see the same snapshot.
    async fn unique_slug(
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        proposed: &str,
    ) -> Result<String, sqlx::Error> {
        let base = if proposed.is_empty() { "store" } else { proposed };
        if !Merchant::slug_exists(&mut **tx, base).await? {
            return Ok(base.to_string());
        }
        let mut n = 1u32;
        loop {
            let candidate = format!("{base}-{n}");
            if !Merchant::slug_exists(&mut **tx, &candidate).await? {
                return Ok(candidate);
            }
            n += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fixtures::seed_user;
    use db::{DBService, models::user::UserRole};

    fn application_input(store_name: &str) -> CreateMerchantApplication {
        CreateMerchantApplication {
            store_name: store_name.to_string(),
            description: Some("Fine goods".to_string()),
        }
    }

    #[tokio::test]
    async fn submit_records_proposed_slug() {
        let db = DBService::new_in_memory().await.unwrap();
        let user = seed_user(&db.pool, "a@example.com").await;
        let application =
            MerchantApplicationService::submit(&db.pool, user.id, &application_input("Chanel Atelier"))
                .await
                .unwrap();
        assert_eq!(application.proposed_slug, "chanel-atelier");
        assert_eq!(application.status, MerchantApplicationStatus::Pending);
    }

    #[tokio::test]
    async fn second_pending_submission_is_rejected() {
        let db = DBService::new_in_memory().await.unwrap();
        let user = seed_user(&db.pool, "a@example.com").await;
        MerchantApplicationService::submit(&db.pool, user.id, &application_input("Store One"))
            .await
            .unwrap();
        let err =
            MerchantApplicationService::submit(&db.pool, user.id, &application_input("Store Two"))
                .await
                .unwrap_err();
        assert!(matches!(err, MerchantApplicationError::AlreadyPending));

        let all = MerchantApplicationService::list(&db.pool, None).await.unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn approval_promotes_user_and_stamps_reviewer() {
        let db = DBService::new_in_memory().await.unwrap();
        let applicant = seed_user(&db.pool, "applicant@example.com").await;
        let admin = seed_user(&db.pool, "admin@example.com").await;

        let application = MerchantApplicationService::submit(
            &db.pool,
            applicant.id,
            &application_input("Chanel Atelier"),
        )
        .await
        .unwrap();
        let merchant =
            MerchantApplicationService::approve(&db.pool, application.id, admin.id)
                .await
                .unwrap();

        assert_eq!(merchant.slug, "chanel-atelier");
        assert_eq!(merchant.user_id, applicant.id);

        let user = User::find_by_id(&db.pool, applicant.id).await.unwrap().unwrap();
        assert_eq!(user.role, UserRole::Merchant);

        let reviewed = MerchantApplication::find_by_id(&db.pool, application.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reviewed.status, MerchantApplicationStatus::Approved);
        assert_eq!(reviewed.reviewed_by, Some(admin.id));
        assert!(reviewed.reviewed_at.is_some());
    }

    #[tokio::test]
    async fn slug_collision_gets_numeric_suffix() {
        let db = DBService::new_in_memory().await.unwrap();
        let admin = seed_user(&db.pool, "admin@example.com").await;

        for (i, expected) in ["chanel-atelier", "chanel-atelier-1", "chanel-atelier-2"]
            .iter()
            .enumerate()
        {
            let applicant = seed_user(&db.pool, &format!("user{i}@example.com")).await;
            let application = MerchantApplicationService::submit(
                &db.pool,
                applicant.id,
                &application_input("Chanel Atelier"),
            )
            .await
            .unwrap();
            let merchant =
                MerchantApplicationService::approve(&db.pool, application.id, admin.id)
                    .await
                    .unwrap();
            assert_eq!(&merchant.slug, expected);
        }
    }

    #[tokio::test]
    async fn reviewing_twice_fails_and_changes_nothing() {
        let db = DBService::new_in_memory().await.unwrap();
        let applicant = seed_user(&db.pool, "applicant@example.com").await;
        let admin = seed_user(&db.pool, "admin@example.com").await;

        let application = MerchantApplicationService::submit(
            &db.pool,
            applicant.id,
            &application_input("Maison d'Or"),
        )
        .await
        .unwrap();
        MerchantApplicationService::reject(&db.pool, application.id, admin.id, Some("incomplete"))
            .await
            .unwrap();

        let err = MerchantApplicationService::approve(&db.pool, application.id, admin.id)
            .await
            .unwrap_err();
        assert!(matches!(err, MerchantApplicationError::AlreadyReviewed));

        // No merchant was created, the user was not promoted.
        assert!(Merchant::find_by_user_id(&db.pool, applicant.id)
            .await
            .unwrap()
            .is_none());
        let user = User::find_by_id(&db.pool, applicant.id).await.unwrap().unwrap();
        assert_eq!(user.role, UserRole::Customer);
    }

    #[tokio::test]
    async fn existing_merchant_cannot_apply() {
        let db = DBService::new_in_memory().await.unwrap();
        let applicant = seed_user(&db.pool, "applicant@example.com").await;
        let admin = seed_user(&db.pool, "admin@example.com").await;

        let application = MerchantApplicationService::submit(
            &db.pool,
            applicant.id,
            &application_input("First Store"),
        )
        .await
        .unwrap();
        MerchantApplicationService::approve(&db.pool, application.id, admin.id)
            .await
            .unwrap();

        let err = MerchantApplicationService::submit(
            &db.pool,
            applicant.id,
            &application_input("Second Store"),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, MerchantApplicationError::AlreadyMerchant));
    }

    #[tokio::test]
    async fn rejection_records_reason() {
        let db = DBService::new_in_memory().await.unwrap();
        let applicant = seed_user(&db.pool, "applicant@example.com").await;
        let admin = seed_user(&db.pool, "admin@example.com").await;

        let application = MerchantApplicationService::submit(
            &db.pool,
            applicant.id,
            &application_input("Maison d'Or"),
        )
        .await
        .unwrap();
        let rejected = MerchantApplicationService::reject(
            &db.pool,
            application.id,
            admin.id,
            Some("incomplete profile"),
        )
        .await
        .unwrap();
        assert_eq!(rejected.status, MerchantApplicationStatus::Rejected);
        assert_eq!(rejected.review_note.as_deref(), Some("incomplete profile"));
        assert_eq!(rejected.reviewed_by, Some(admin.id));
    }
}
