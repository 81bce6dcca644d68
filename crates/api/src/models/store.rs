//! Store domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use corner_store_core::{StoreId, StoreStatus, UserId};

/// A seller storefront owned by exactly one user.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Store {
    pub id: StoreId,
    /// Owning user (unique across stores).
    pub user_id: UserId,
    /// Public name (unique across stores).
    pub store_name: String,
    pub bio: Option<String>,
    pub store_type: Option<String>,
    pub payout_details: Option<String>,
    /// `PENDING` until an admin approves the store.
    pub status: StoreStatus,
    /// Set together with approval.
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

/// A validated store application.
#[derive(Debug, Clone)]
pub struct NewStore {
    pub store_name: String,
    pub bio: Option<String>,
    pub store_type: Option<String>,
    pub payout_details: Option<String>,
}
