//! Product domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use corner_store_core::{Inr, ProductId, ProductStatus, StoreId};

/// A product listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Product {
    pub id: ProductId,
    /// Owning store. Only that store's user may change the listing.
    pub store_id: StoreId,
    pub name: String,
    pub description: Option<String>,
    pub price_inr: Inr,
    pub condition: Option<String>,
    pub size: Option<String>,
    pub measurements: Option<String>,
    pub status: ProductStatus,
    pub created_at: DateTime<Utc>,
}

/// A product in the public catalog listing.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct PublicProduct {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub product: Product,
    pub store_name: String,
}

/// A single public product with its store's profile.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ProductDetail {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub product: Product,
    pub store_name: String,
    pub bio: Option<String>,
    pub is_verified: bool,
}

/// A validated new listing. Status is always `ACTIVE` on insert.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub price_inr: Inr,
    pub condition: Option<String>,
    pub size: Option<String>,
    pub measurements: Option<String>,
}

/// A partial update. `None` keeps the stored value.
///
/// Optional text columns cannot be cleared through an update, only replaced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price_inr: Option<Inr>,
    pub condition: Option<String>,
    pub size: Option<String>,
    pub measurements: Option<String>,
    pub status: Option<ProductStatus>,
}

impl ProductChanges {
    /// Whether the update would change nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price_inr.is_none()
            && self.condition.is_none()
            && self.size.is_none()
            && self.measurements.is_none()
            && self.status.is_none()
    }

    /// Merge the supplied fields into `product`.
    pub fn apply_to(self, product: &mut Product) {
        if let Some(name) = self.name {
            product.name = name;
        }
        if let Some(description) = self.description {
            product.description = Some(description);
        }
        if let Some(price) = self.price_inr {
            product.price_inr = price;
        }
        if let Some(condition) = self.condition {
            product.condition = Some(condition);
        }
        if let Some(size) = self.size {
            product.size = Some(size);
        }
        if let Some(measurements) = self.measurements {
            product.measurements = Some(measurements);
        }
        if let Some(status) = self.status {
            product.status = status;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn listing() -> Product {
        Product {
            id: ProductId::new(1),
            store_id: StoreId::new(3),
            name: "Linen shirt".to_string(),
            description: Some("Barely worn".to_string()),
            price_inr: "1200".parse().unwrap(),
            condition: Some("Like new".to_string()),
            size: Some("M".to_string()),
            measurements: None,
            status: ProductStatus::Active,
            created_at: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
        }
    }

    #[test]
    fn test_single_field_update_leaves_rest_untouched() {
        let original = listing();
        let mut updated = original.clone();

        ProductChanges {
            price_inr: Some("999.50".parse().unwrap()),
            ..ProductChanges::default()
        }
        .apply_to(&mut updated);

        assert_eq!(updated.price_inr.amount().to_string(), "999.50");
        assert_eq!(
            Product {
                price_inr: original.price_inr,
                ..updated
            },
            original
        );
    }

    #[test]
    fn test_empty_changes_are_a_no_op() {
        let changes = ProductChanges::default();
        assert!(changes.is_empty());

        let mut product = listing();
        changes.apply_to(&mut product);
        assert_eq!(product, listing());
    }

    #[test]
    fn test_status_and_optional_fields_update() {
        let mut product = listing();
        ProductChanges {
            measurements: Some("Chest 40in".to_string()),
            status: Some(ProductStatus::Sold),
            ..ProductChanges::default()
        }
        .apply_to(&mut product);

        assert_eq!(product.measurements.as_deref(), Some("Chest 40in"));
        assert_eq!(product.status, ProductStatus::Sold);
        assert_eq!(product.name, "Linen shirt");
    }

    #[test]
    fn test_public_product_serializes_flat() {
        let public = PublicProduct {
            product: listing(),
            store_name: "AliceShop".to_string(),
        };
        let json = serde_json::to_value(&public).unwrap();

        assert_eq!(json["store_name"], "AliceShop");
        assert_eq!(json["price_inr"], "1200.00");
        assert_eq!(json["status"], "ACTIVE");
        assert_eq!(json["store_id"], 3);
    }
}
