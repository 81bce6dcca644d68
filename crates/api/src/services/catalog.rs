//! Product catalog: public reads and owner-scoped writes.

use sqlx::PgPool;
use thiserror::Error;

use corner_store_core::{Inr, ProductId, ProductStatus, UserId};

use crate::db::products::{OwnedWrite, ProductRepository};
use crate::db::{RepositoryError, StoreRepository};
use crate::models::{NewProduct, Product, ProductChanges, ProductDetail, PublicProduct, Store};

use super::non_blank;

/// Errors from catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The acting user has no store.
    #[error("user does not have a store")]
    NoStore,

    /// The acting user's store is still pending.
    #[error("store is not approved")]
    StoreNotApproved,

    /// The product belongs to another store.
    #[error("product belongs to another store")]
    NotOwner(Write),

    /// No visible product with this ID.
    #[error("product not found")]
    NotFound,

    /// Invalid product fields.
    #[error("invalid product: {0}")]
    Invalid(String),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Owner write that was refused, for the error message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Write {
    Update,
    Delete,
}

/// Listing input as received from the client.
#[derive(Debug, Clone, Default)]
pub struct Listing {
    pub name: String,
    pub description: Option<String>,
    pub price_inr: Inr,
    pub condition: Option<String>,
    pub size: Option<String>,
    pub measurements: Option<String>,
}

impl Listing {
    /// Validate and normalize into a [`NewProduct`].
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Invalid` if the name is blank.
    pub fn validate(self) -> Result<NewProduct, CatalogError> {
        Ok(NewProduct {
            name: required_name(&self.name)?,
            description: non_blank(self.description),
            price_inr: self.price_inr,
            condition: non_blank(self.condition),
            size: non_blank(self.size),
            measurements: non_blank(self.measurements),
        })
    }
}

/// Partial update as received from the client.
#[derive(Debug, Clone, Default)]
pub struct ListingUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price_inr: Option<Inr>,
    pub condition: Option<String>,
    pub size: Option<String>,
    pub measurements: Option<String>,
    pub status: Option<ProductStatus>,
}

impl ListingUpdate {
    /// Validate and normalize into [`ProductChanges`].
    ///
    /// Blank optional text is treated as omitted.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Invalid` if a name is supplied but blank.
    pub fn validate(self) -> Result<ProductChanges, CatalogError> {
        Ok(ProductChanges {
            name: self.name.as_deref().map(required_name).transpose()?,
            description: non_blank(self.description),
            price_inr: self.price_inr,
            condition: non_blank(self.condition),
            size: non_blank(self.size),
            measurements: non_blank(self.measurements),
            status: self.status,
        })
    }
}

fn required_name(name: &str) -> Result<String, CatalogError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CatalogError::Invalid("Product name is required".to_string()));
    }
    Ok(name.to_owned())
}

/// Check that `store` (if any) may list new products.
///
/// # Errors
///
/// Returns `CatalogError::NoStore` or `CatalogError::StoreNotApproved`.
pub fn ensure_can_list(store: Option<&Store>) -> Result<&Store, CatalogError> {
    let store = store.ok_or(CatalogError::NoStore)?;
    if !store.status.can_list_products() {
        return Err(CatalogError::StoreNotApproved);
    }
    Ok(store)
}

fn owned<T>(outcome: OwnedWrite<T>, write: Write) -> Result<T, CatalogError> {
    match outcome {
        OwnedWrite::Applied(value) => Ok(value),
        OwnedWrite::Missing => Err(CatalogError::NotFound),
        OwnedWrite::NotOwner => Err(CatalogError::NotOwner(write)),
    }
}

/// Product catalog service.
pub struct CatalogService<'a> {
    products: ProductRepository<'a>,
    stores: StoreRepository<'a>,
}

impl<'a> CatalogService<'a> {
    /// Create a new catalog service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            products: ProductRepository::new(pool),
            stores: StoreRepository::new(pool),
        }
    }

    /// Create an `ACTIVE` product in the acting user's approved store.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NoStore` or `CatalogError::StoreNotApproved`
    /// when the user may not list products, and `CatalogError::Invalid` for
    /// bad input.
    pub async fn create(&self, user_id: UserId, listing: Listing) -> Result<Product, CatalogError> {
        let store = self.stores.get_by_user(user_id).await?;
        let store = ensure_can_list(store.as_ref())?;
        let new = listing.validate()?;

        let product = self.products.create(store.id, &new).await?;

        tracing::info!(product_id = %product.id, store_id = %store.id, "Product listed");

        Ok(product)
    }

    /// List the public catalog.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the query fails.
    pub async fn list_public(&self) -> Result<Vec<PublicProduct>, CatalogError> {
        Ok(self.products.list_public().await?)
    }

    /// Get one product from the public catalog.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the product does not exist, is not
    /// `ACTIVE`, or its store is not `APPROVED`.
    pub async fn get_public(&self, id: ProductId) -> Result<ProductDetail, CatalogError> {
        self.products
            .get_public(id)
            .await?
            .ok_or(CatalogError::NotFound)
    }

    /// Apply a partial update to a product of the acting user's store.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NoStore` if the user has no store,
    /// `CatalogError::NotFound` if the product does not exist and
    /// `CatalogError::NotOwner` if it belongs to another store. Input is
    /// validated only after those checks pass, so `CatalogError::Invalid`
    /// is reserved for the owner.
    pub async fn update(
        &self,
        user_id: UserId,
        id: ProductId,
        update: ListingUpdate,
    ) -> Result<Product, CatalogError> {
        let store = self
            .stores
            .get_by_user(user_id)
            .await?
            .ok_or(CatalogError::NoStore)?;

        let outcome = self
            .products
            .update_owned(id, store.id, move || update.validate())
            .await?;
        let product = owned(outcome, Write::Update)?;

        tracing::info!(product_id = %product.id, store_id = %store.id, "Product updated");

        Ok(product)
    }

    /// Permanently delete a product of the acting user's store.
    ///
    /// # Errors
    ///
    /// Same as [`CatalogService::update`].
    pub async fn delete(&self, user_id: UserId, id: ProductId) -> Result<(), CatalogError> {
        let store = self
            .stores
            .get_by_user(user_id)
            .await?
            .ok_or(CatalogError::NoStore)?;

        let outcome = self.products.delete_owned(id, store.id).await?;
        owned(outcome, Write::Delete)?;

        tracing::info!(product_id = %id, store_id = %store.id, "Product deleted");

        Ok(())
    }
}
