//! Store application and store dashboard routes.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;

use crate::error::Result;
use crate::middleware::{RequireBuyer, RequireStore};
use crate::models::Store;
use crate::services::StoreService;
use crate::services::stores::Application;
use crate::state::AppState;

use super::JsonBody;

/// Store application form.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApplyRequest {
    pub store_name: String,
    pub bio: Option<String>,
    pub store_type: Option<String>,
    pub payout_details: Option<String>,
}

impl From<ApplyRequest> for Application {
    fn from(form: ApplyRequest) -> Self {
        Self {
            store_name: form.store_name,
            bio: form.bio,
            store_type: form.store_type,
            payout_details: form.payout_details,
        }
    }
}

/// Apply for a store. The caller becomes a `STORE` user with a pending store.
///
/// POST /api/stores/apply
pub async fn apply(
    State(state): State<AppState>,
    RequireBuyer { user, .. }: RequireBuyer,
    JsonBody(form): JsonBody<ApplyRequest>,
) -> Result<(StatusCode, Json<Store>)> {
    let store = StoreService::new(state.pool())
        .apply(user.id, form.into())
        .await?;

    Ok((StatusCode::CREATED, Json(store)))
}

/// The caller's own store, whatever its status.
///
/// GET /api/stores/me
pub async fn me(
    State(state): State<AppState>,
    RequireStore { user, .. }: RequireStore,
) -> Result<Json<Store>> {
    let store = StoreService::new(state.pool()).get_own(user.id).await?;
    Ok(Json(store))
}
