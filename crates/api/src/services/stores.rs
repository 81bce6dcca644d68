//! Store lifecycle: application, lookup and admin approval.
//!
//! ```text
//! (none) --apply--> PENDING --approve--> APPROVED
//! ```
//!
//! There is no rejection or re-application path. Applying promotes the user
//! to `STORE` right away; listing products waits for approval.

use sqlx::PgPool;
use thiserror::Error;

use corner_store_core::{StoreId, UserId};

use crate::db::RepositoryError;
use crate::db::stores::{OWNER_UNIQUE, STORE_NAME_UNIQUE, StoreRepository};
use crate::models::{NewStore, Store};

use super::non_blank;

/// Maximum length of a store name, in characters.
pub const MAX_STORE_NAME_LENGTH: usize = 100;

/// Errors from store lifecycle operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The user already owns a store.
    #[error("user already has a store")]
    AlreadyApplied,

    /// Another store uses this name.
    #[error("store name is taken")]
    NameTaken,

    /// The store name is blank or too long.
    #[error("invalid store name: {0}")]
    InvalidName(String),

    /// The user has no store.
    #[error("store not found for user")]
    NotFound,

    /// No store with this ID is awaiting approval.
    #[error("pending store not found")]
    PendingNotFound,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Store application as received from the client.
#[derive(Debug, Clone, Default)]
pub struct Application {
    pub store_name: String,
    pub bio: Option<String>,
    pub store_type: Option<String>,
    pub payout_details: Option<String>,
}

impl Application {
    /// Validate and normalize into a [`NewStore`].
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidName` if the name is blank or longer than
    /// [`MAX_STORE_NAME_LENGTH`] characters.
    pub fn validate(self) -> Result<NewStore, StoreError> {
        let store_name = self.store_name.trim();
        if store_name.is_empty() {
            return Err(StoreError::InvalidName("Store name is required".to_string()));
        }
        if store_name.chars().count() > MAX_STORE_NAME_LENGTH {
            return Err(StoreError::InvalidName(format!(
                "Store name must be at most {MAX_STORE_NAME_LENGTH} characters"
            )));
        }

        Ok(NewStore {
            store_name: store_name.to_owned(),
            bio: non_blank(self.bio),
            store_type: non_blank(self.store_type),
            payout_details: non_blank(self.payout_details),
        })
    }
}

/// Store lifecycle service.
pub struct StoreService<'a> {
    stores: StoreRepository<'a>,
}

impl<'a> StoreService<'a> {
    /// Create a new store service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            stores: StoreRepository::new(pool),
        }
    }

    /// Apply for a store on behalf of `user_id`.
    ///
    /// Creates the store in `PENDING` and promotes the user to `STORE` in one
    /// transaction. Duplicates are detected by the unique constraints, so two
    /// concurrent applications cannot both succeed.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidName` for a blank or overlong name.
    /// Returns `StoreError::AlreadyApplied` if the user already owns a store.
    /// Returns `StoreError::NameTaken` if the name is in use.
    pub async fn apply(&self, user_id: UserId, application: Application) -> Result<Store, StoreError> {
        let new = application.validate()?;

        let store = self
            .stores
            .create_application(user_id, &new)
            .await
            .map_err(|e| {
                if e.is_conflict_on(OWNER_UNIQUE) {
                    StoreError::AlreadyApplied
                } else if e.is_conflict_on(STORE_NAME_UNIQUE) {
                    StoreError::NameTaken
                } else {
                    StoreError::Repository(e)
                }
            })?;

        tracing::info!(
            store_id = %store.id,
            user_id = %user_id,
            store_name = %store.store_name,
            "Store application submitted"
        );

        Ok(store)
    }

    /// Get the store owned by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the user has no store.
    pub async fn get_own(&self, user_id: UserId) -> Result<Store, StoreError> {
        self.stores
            .get_by_user(user_id)
            .await?
            .ok_or(StoreError::NotFound)
    }

    /// Approve a pending store. Not idempotent: a second call fails.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::PendingNotFound` if no store with this ID is pending.
    pub async fn approve(&self, store_id: StoreId, admin_id: UserId) -> Result<Store, StoreError> {
        let store = self
            .stores
            .approve_pending(store_id)
            .await?
            .ok_or(StoreError::PendingNotFound)?;

        tracing::info!(store_id = %store.id, admin_id = %admin_id, "Store approved");

        Ok(store)
    }

    /// List stores awaiting approval.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Repository` if the query fails.
    pub async fn list_pending(&self) -> Result<Vec<Store>, StoreError> {
        Ok(self.stores.list_pending().await?)
    }
}
