//! Role and status enums.
//!
//! Each enum is stored as a `PostgreSQL` enum type whose labels match the
//! serialized form (`BUYER`, `PENDING`, `ACTIVE`, ...).

use serde::{Deserialize, Serialize};

/// Account role. Gates which operations a user may invoke.
///
/// Every account starts as [`Role::Buyer`], becomes [`Role::Store`] when it
/// applies for a store, and [`Role::Admin`] is only ever granted out-of-band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "user_role", rename_all = "SCREAMING_SNAKE_CASE")
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    #[default]
    Buyer,
    Store,
    Admin,
}

impl Role {
    /// The label used in storage, tokens and JSON.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Buyer => "BUYER",
            Self::Store => "STORE",
            Self::Admin => "ADMIN",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Store approval status.
///
/// A store is created `Pending` and moves to `Approved` only through an admin
/// action. There is no transition back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "store_status", rename_all = "SCREAMING_SNAKE_CASE")
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StoreStatus {
    #[default]
    Pending,
    Approved,
}

impl StoreStatus {
    /// Whether a store in this status may list products.
    #[must_use]
    pub const fn can_list_products(self) -> bool {
        matches!(self, Self::Approved)
    }
}

impl std::fmt::Display for StoreStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => f.write_str("PENDING"),
            Self::Approved => f.write_str("APPROVED"),
        }
    }
}

/// Product listing status.
///
/// New products are always `Active`; the owning store may move a product to
/// any other status through an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "product_status", rename_all = "SCREAMING_SNAKE_CASE")
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductStatus {
    /// Listed and publicly visible (when the store is approved).
    #[default]
    Active,
    /// Sold; kept for the store's records but hidden from the catalog.
    Sold,
    /// Withdrawn by the store.
    Archived,
}

impl std::fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => f.write_str("ACTIVE"),
            Self::Sold => f.write_str("SOLD"),
            Self::Archived => f.write_str("ARCHIVED"),
        }
    }
}
