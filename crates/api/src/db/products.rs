//! Product repository for database operations.
//!
//! Public reads only ever see `ACTIVE` products of `APPROVED` stores. Owner
//! writes lock the row, check ownership and write inside one transaction.

use sqlx::PgPool;

use corner_store_core::{ProductId, StoreId};

use super::RepositoryError;
use crate::models::{NewProduct, Product, ProductChanges, ProductDetail, PublicProduct};

/// Outcome of a write that only the owning store may perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OwnedWrite<T> {
    /// The write was applied.
    Applied(T),
    /// No product with this ID exists.
    Missing,
    /// The product belongs to another store. Nothing was written.
    NotOwner,
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert an `ACTIVE` product for a store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(
        &self,
        store_id: StoreId,
        new: &NewProduct,
    ) -> Result<Product, RepositoryError> {
        sqlx::query_as::<_, Product>(
            r"
            INSERT INTO products
                (store_id, name, description, price_inr, condition, size, measurements, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, 'ACTIVE')
            RETURNING id, store_id, name, description, price_inr, condition, size,
                      measurements, status, created_at
            ",
        )
        .bind(store_id)
        .bind(&new.name)
        .bind(new.description.as_deref())
        .bind(new.price_inr)
        .bind(new.condition.as_deref())
        .bind(new.size.as_deref())
        .bind(new.measurements.as_deref())
        .fetch_one(self.pool)
        .await
        .map_err(RepositoryError::from_write)
    }

    /// List publicly visible products, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_public(&self) -> Result<Vec<PublicProduct>, RepositoryError> {
        let products = sqlx::query_as::<_, PublicProduct>(
            r"
            SELECT p.id, p.store_id, p.name, p.description, p.price_inr, p.condition,
                   p.size, p.measurements, p.status, p.created_at,
                   s.store_name
            FROM products p
            JOIN stores s ON s.id = p.store_id
            WHERE p.status = 'ACTIVE' AND s.status = 'APPROVED'
            ORDER BY p.id DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// Get a publicly visible product with its store's profile.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_public(&self, id: ProductId) -> Result<Option<ProductDetail>, RepositoryError> {
        let product = sqlx::query_as::<_, ProductDetail>(
            r"
            SELECT p.id, p.store_id, p.name, p.description, p.price_inr, p.condition,
                   p.size, p.measurements, p.status, p.created_at,
                   s.store_name, s.bio, s.is_verified
            FROM products p
            JOIN stores s ON s.id = p.store_id
            WHERE p.id = $1 AND p.status = 'ACTIVE' AND s.status = 'APPROVED'
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(product)
    }

    /// Apply a partial update to a product owned by `owner`.
    ///
    /// `changes` is only evaluated once the row is locked and ownership is
    /// confirmed, so a missing or foreign product is reported before any
    /// input error.
    ///
    /// # Errors
    ///
    /// Returns the error from `changes`, or a `RepositoryError` if any query
    /// fails.
    pub async fn update_owned<E>(
        &self,
        id: ProductId,
        owner: StoreId,
        changes: impl FnOnce() -> Result<ProductChanges, E>,
    ) -> Result<OwnedWrite<Product>, E>
    where
        E: From<RepositoryError>,
    {
        let mut tx = self.pool.begin().await.map_err(RepositoryError::from)?;

        let current = sqlx::query_as::<_, Product>(
            r"
            SELECT id, store_id, name, description, price_inr, condition, size,
                   measurements, status, created_at
            FROM products
            WHERE id = $1
            FOR UPDATE
            ",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(RepositoryError::from)?;

        let Some(mut product) = current else {
            return Ok(OwnedWrite::Missing);
        };
        if product.store_id != owner {
            return Ok(OwnedWrite::NotOwner);
        }

        changes()?.apply_to(&mut product);

        let updated = sqlx::query_as::<_, Product>(
            r"
            UPDATE products
            SET name = $2, description = $3, price_inr = $4, condition = $5,
                size = $6, measurements = $7, status = $8
            WHERE id = $1
            RETURNING id, store_id, name, description, price_inr, condition, size,
                      measurements, status, created_at
            ",
        )
        .bind(id)
        .bind(&product.name)
        .bind(product.description.as_deref())
        .bind(product.price_inr)
        .bind(product.condition.as_deref())
        .bind(product.size.as_deref())
        .bind(product.measurements.as_deref())
        .bind(product.status)
        .fetch_one(&mut *tx)
        .await
        .map_err(RepositoryError::from)?;

        tx.commit().await.map_err(RepositoryError::from)?;

        Ok(OwnedWrite::Applied(updated))
    }

    /// Permanently delete a product owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any query fails.
    pub async fn delete_owned(
        &self,
        id: ProductId,
        owner: StoreId,
    ) -> Result<OwnedWrite<()>, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let store_id = sqlx::query_scalar::<_, StoreId>(
            "SELECT store_id FROM products WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        match store_id {
            None => return Ok(OwnedWrite::Missing),
            Some(store_id) if store_id != owner => return Ok(OwnedWrite::NotOwner),
            Some(_) => {}
        }

        sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(OwnedWrite::Applied(()))
    }
}
