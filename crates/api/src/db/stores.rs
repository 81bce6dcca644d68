//! Store repository for database operations.

use sqlx::PgPool;

use corner_store_core::{Role, StoreId, UserId};

use super::RepositoryError;
use crate::models::{NewStore, Store};

/// Unique constraint on `stores.user_id` (one store per user).
pub const OWNER_UNIQUE: &str = "stores_user_id_key";

/// Unique constraint on `stores.store_name`.
pub const STORE_NAME_UNIQUE: &str = "stores_store_name_key";

/// Repository for store database operations.
pub struct StoreRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> StoreRepository<'a> {
    /// Create a new store repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get the store owned by a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_user(&self, user_id: UserId) -> Result<Option<Store>, RepositoryError> {
        let store = sqlx::query_as::<_, Store>(
            r"
            SELECT id, user_id, store_name, bio, store_type, payout_details,
                   status, is_verified, created_at
            FROM stores
            WHERE user_id = $1
            ",
        )
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(store)
    }

    /// Create a `PENDING` store and promote its owner to `STORE`.
    ///
    /// Both writes commit together or not at all.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` naming [`OWNER_UNIQUE`] or
    /// [`STORE_NAME_UNIQUE`] when the user already has a store or the name is taken.
    /// Returns `RepositoryError::NotFound` if the user no longer exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create_application(
        &self,
        user_id: UserId,
        new: &NewStore,
    ) -> Result<Store, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let store = sqlx::query_as::<_, Store>(
            r"
            INSERT INTO stores (user_id, store_name, bio, store_type, payout_details, status)
            VALUES ($1, $2, $3, $4, $5, 'PENDING')
            RETURNING id, user_id, store_name, bio, store_type, payout_details,
                      status, is_verified, created_at
            ",
        )
        .bind(user_id)
        .bind(&new.store_name)
        .bind(new.bio.as_deref())
        .bind(new.store_type.as_deref())
        .bind(new.payout_details.as_deref())
        .fetch_one(&mut *tx)
        .await
        .map_err(RepositoryError::from_write)?;

        let promoted = sqlx::query("UPDATE users SET role = $2 WHERE id = $1")
            .bind(user_id)
            .bind(Role::Store)
            .execute(&mut *tx)
            .await?;

        if promoted.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        tx.commit().await?;

        Ok(store)
    }

    /// Approve a `PENDING` store and mark it verified.
    ///
    /// Returns `None` if no store with this ID is pending, including stores
    /// that were already approved.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn approve_pending(&self, id: StoreId) -> Result<Option<Store>, RepositoryError> {
        let store = sqlx::query_as::<_, Store>(
            r"
            UPDATE stores
            SET status = 'APPROVED', is_verified = TRUE
            WHERE id = $1 AND status = 'PENDING'
            RETURNING id, user_id, store_name, bio, store_type, payout_details,
                      status, is_verified, created_at
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(store)
    }

    /// List stores awaiting approval, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_pending(&self) -> Result<Vec<Store>, RepositoryError> {
        let stores = sqlx::query_as::<_, Store>(
            r"
            SELECT id, user_id, store_name, bio, store_type, payout_details,
                   status, is_verified, created_at
            FROM stores
            WHERE status = 'PENDING'
            ORDER BY id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(stores)
    }
}
