//! Registration and login routes.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use corner_store_core::{Email, Role, UserId};

use crate::error::Result;
use crate::services::AuthService;
use crate::services::auth::{Registration, Session};
use crate::state::AppState;

use super::JsonBody;

/// Registration form.
///
/// Missing fields deserialize as empty and are rejected by the service with
/// a field-specific message.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// Login form.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// User summary returned after registration.
#[derive(Debug, Serialize)]
pub struct RegisteredUser {
    pub id: UserId,
    pub email: Email,
    pub role: Role,
}

/// User summary returned after login.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedInUser {
    pub id: UserId,
    pub email: Email,
    pub first_name: String,
    pub role: Role,
}

/// Token plus user summary.
#[derive(Debug, Serialize)]
pub struct TokenResponse<U> {
    pub token: String,
    pub user: U,
}

/// Create a `BUYER` account.
///
/// POST /api/auth/register
#[tracing::instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    JsonBody(form): JsonBody<RegisterRequest>,
) -> Result<(StatusCode, Json<TokenResponse<RegisteredUser>>)> {
    let auth = AuthService::new(state.pool(), state.tokens());
    let Session { token, user } = auth
        .register(&Registration {
            first_name: &form.first_name,
            last_name: &form.last_name,
            email: &form.email,
            password: &form.password,
        })
        .await?;

    let body = TokenResponse {
        token,
        user: RegisteredUser {
            id: user.id,
            email: user.email,
            role: user.role,
        },
    };

    Ok((StatusCode::CREATED, Json(body)))
}

/// Sign in with email and password.
///
/// POST /api/auth/login
#[tracing::instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    JsonBody(form): JsonBody<LoginRequest>,
) -> Result<Json<TokenResponse<SignedInUser>>> {
    let auth = AuthService::new(state.pool(), state.tokens());
    let Session { token, user } = auth.login(&form.email, &form.password).await?;

    Ok(Json(TokenResponse {
        token,
        user: SignedInUser {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            role: user.role,
        },
    }))
}
