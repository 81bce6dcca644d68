//! Product catalog routes.
//!
//! Reads are public and only ever show `ACTIVE` products of `APPROVED`
//! stores. Writes require the `STORE` role and, for existing products,
//! ownership.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use corner_store_core::{Inr, ProductId, ProductStatus};

use crate::error::Result;
use crate::middleware::RequireStore;
use crate::models::{Product, ProductDetail, PublicProduct};
use crate::services::CatalogService;
use crate::services::catalog::{Listing, ListingUpdate};
use crate::state::AppState;

use super::{JsonBody, PathParam};

/// New listing form.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
    pub price_inr: Inr,
    pub condition: Option<String>,
    pub size: Option<String>,
    pub measurements: Option<String>,
}

impl From<CreateProductRequest> for Listing {
    fn from(form: CreateProductRequest) -> Self {
        Self {
            name: form.name,
            description: form.description,
            price_inr: form.price_inr,
            condition: form.condition,
            size: form.size,
            measurements: form.measurements,
        }
    }
}

/// Partial update form. Omitted fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price_inr: Option<Inr>,
    pub condition: Option<String>,
    pub size: Option<String>,
    pub measurements: Option<String>,
    pub status: Option<ProductStatus>,
}

impl From<UpdateProductRequest> for ListingUpdate {
    fn from(form: UpdateProductRequest) -> Self {
        Self {
            name: form.name,
            description: form.description,
            price_inr: form.price_inr,
            condition: form.condition,
            size: form.size,
            measurements: form.measurements,
            status: form.status,
        }
    }
}

/// Plain message body.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub msg: &'static str,
}

/// Public catalog, newest first.
///
/// GET /api/products
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<PublicProduct>>> {
    let products = CatalogService::new(state.pool()).list_public().await?;
    Ok(Json(products))
}

/// One public product with its store's details.
///
/// GET /api/products/{id}
pub async fn show(
    State(state): State<AppState>,
    PathParam(id): PathParam<ProductId>,
) -> Result<Json<ProductDetail>> {
    let product = CatalogService::new(state.pool()).get_public(id).await?;
    Ok(Json(product))
}

/// List a new product in the caller's approved store.
///
/// POST /api/products
pub async fn create(
    State(state): State<AppState>,
    RequireStore { user, .. }: RequireStore,
    JsonBody(form): JsonBody<CreateProductRequest>,
) -> Result<(StatusCode, Json<Product>)> {
    let product = CatalogService::new(state.pool())
        .create(user.id, form.into())
        .await?;

    Ok((StatusCode::CREATED, Json(product)))
}

/// Update one of the caller's products.
///
/// PUT /api/products/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireStore { user, .. }: RequireStore,
    PathParam(id): PathParam<ProductId>,
    JsonBody(form): JsonBody<UpdateProductRequest>,
) -> Result<Json<Product>> {
    let product = CatalogService::new(state.pool())
        .update(user.id, id, form.into())
        .await?;

    Ok(Json(product))
}

/// Delete one of the caller's products.
///
/// DELETE /api/products/{id}
pub async fn destroy(
    State(state): State<AppState>,
    RequireStore { user, .. }: RequireStore,
    PathParam(id): PathParam<ProductId>,
) -> Result<Json<MessageResponse>> {
    CatalogService::new(state.pool()).delete(user.id, id).await?;

    Ok(Json(MessageResponse {
        msg: "Product removed",
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_requires_price() {
        let missing = serde_json::from_str::<CreateProductRequest>(r#"{"name":"Kurta"}"#);
        assert!(missing.is_err());

        let negative =
            serde_json::from_str::<CreateProductRequest>(r#"{"name":"Kurta","priceInr":-1}"#);
        assert!(negative.is_err());

        let form: CreateProductRequest =
            serde_json::from_str(r#"{"name":"Kurta","priceInr":"799.5","size":"M"}"#).unwrap();
        assert_eq!(form.price_inr.amount().to_string(), "799.50");
        assert_eq!(form.size.as_deref(), Some("M"));
    }

    #[test]
    fn test_update_request_is_partial() {
        let form: UpdateProductRequest = serde_json::from_str(r#"{"status":"SOLD"}"#).unwrap();
        let update = ListingUpdate::from(form);
        assert_eq!(update.status, Some(ProductStatus::Sold));
        assert_eq!(update.name, None);
        assert_eq!(update.price_inr, None);

        assert!(serde_json::from_str::<UpdateProductRequest>(r#"{"status":"GONE"}"#).is_err());
    }
}
