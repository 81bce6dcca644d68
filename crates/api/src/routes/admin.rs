//! Admin panel routes. Every handler requires the `ADMIN` role.

use axum::{Json, extract::State};
use serde::Serialize;

use corner_store_core::StoreId;

use crate::db::UserRepository;
use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::models::{Store, User};
use crate::services::StoreService;
use crate::state::AppState;

use super::PathParam;

/// Response body for a store approval.
#[derive(Debug, Serialize)]
pub struct ApprovalResponse {
    pub msg: &'static str,
    pub store: Store,
}

/// Stores awaiting approval, oldest first.
///
/// GET /api/admin/stores/pending
pub async fn pending_stores(
    State(state): State<AppState>,
    _admin: RequireAdmin,
) -> Result<Json<Vec<Store>>> {
    let stores = StoreService::new(state.pool()).list_pending().await?;
    Ok(Json(stores))
}

/// Approve a pending store.
///
/// PUT /api/admin/stores/approve/{storeId}
pub async fn approve_store(
    State(state): State<AppState>,
    RequireAdmin { user, .. }: RequireAdmin,
    PathParam(store_id): PathParam<StoreId>,
) -> Result<Json<ApprovalResponse>> {
    let store = StoreService::new(state.pool())
        .approve(store_id, user.id)
        .await?;

    Ok(Json(ApprovalResponse {
        msg: "Store approved successfully",
        store,
    }))
}

/// All users. Password hashes are never selected.
///
/// GET /api/admin/users
pub async fn users(State(state): State<AppState>, _admin: RequireAdmin) -> Result<Json<Vec<User>>> {
    let users = UserRepository::new(state.pool()).list_all().await?;
    Ok(Json(users))
}
