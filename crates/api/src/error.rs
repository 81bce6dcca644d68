//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server errors to Sentry
//! before responding. All route handlers return `Result<T, AppError>`, and
//! every error body has the shape `{"msg": "..."}`.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::catalog::Write;
use crate::services::{AuthError, CatalogError, StoreError};

/// Message returned for every 5xx response.
pub const SERVER_ERROR_MESSAGE: &str = "Server Error";

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Store lifecycle operation failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Catalog operation failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Missing or invalid credentials.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated but not allowed.
    #[error("Forbidden: {0}")]
    Forbidden(String),
}

impl AppError {
    /// Whether this error is the server's fault.
    const fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Database(_)
                | Self::Auth(AuthError::Repository(_) | AuthError::PasswordHash | AuthError::Token(_))
                | Self::Store(StoreError::Repository(_))
                | Self::Catalog(CatalogError::Repository(_))
        )
    }

    fn status(&self) -> StatusCode {
        if self.is_server_error() {
            return StatusCode::INTERNAL_SERVER_ERROR;
        }

        match self {
            Self::Auth(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Store(err) => match err {
                StoreError::NotFound | StoreError::PendingNotFound => StatusCode::NOT_FOUND,
                _ => StatusCode::BAD_REQUEST,
            },
            Self::Catalog(err) => match err {
                CatalogError::NoStore
                | CatalogError::StoreNotApproved
                | CatalogError::NotOwner(_) => StatusCode::FORBIDDEN,
                CatalogError::NotFound => StatusCode::NOT_FOUND,
                _ => StatusCode::BAD_REQUEST,
            },
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing message. Internal details never leave the server.
    fn message(&self) -> String {
        if self.is_server_error() {
            return SERVER_ERROR_MESSAGE.to_string();
        }

        match self {
            Self::Auth(err) => match err {
                AuthError::UserAlreadyExists => "User with this email already exists".to_string(),
                AuthError::InvalidCredentials => "Invalid credentials".to_string(),
                AuthError::InvalidEmail(e) => format!("Invalid email: {e}"),
                AuthError::WeakPassword(msg) => msg.clone(),
                AuthError::MissingField(field) => format!("{field} is required"),
                _ => SERVER_ERROR_MESSAGE.to_string(),
            },
            Self::Store(err) => match err {
                StoreError::AlreadyApplied => "You have already applied for a store.".to_string(),
                StoreError::NameTaken => "This store name is already taken.".to_string(),
                StoreError::InvalidName(msg) => msg.clone(),
                StoreError::NotFound => "Store not found for this user.".to_string(),
                StoreError::PendingNotFound => "Pending store not found.".to_string(),
                StoreError::Repository(_) => SERVER_ERROR_MESSAGE.to_string(),
            },
            Self::Catalog(err) => match err {
                CatalogError::NoStore => "User does not have a store.".to_string(),
                CatalogError::StoreNotApproved => {
                    "Your store is not yet approved to add products.".to_string()
                }
                CatalogError::NotOwner(Write::Update) => {
                    "Not authorized to update this product".to_string()
                }
                CatalogError::NotOwner(Write::Delete) => {
                    "Not authorized to delete this product".to_string()
                }
                CatalogError::NotFound => "Product not found".to_string(),
                CatalogError::Invalid(msg) => msg.clone(),
                CatalogError::Repository(_) => SERVER_ERROR_MESSAGE.to_string(),
            },
            Self::BadRequest(msg) | Self::Unauthorized(msg) | Self::Forbidden(msg) => msg.clone(),
            Self::Database(_) => SERVER_ERROR_MESSAGE.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        (self.status(), Json(json!({ "msg": self.message() }))).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context after successful authentication.
pub fn set_sentry_user(user_id: &impl ToString) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            ..Default::default()
        }));
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::to_bytes;

    use super::*;

    async fn body_msg(err: AppError) -> (StatusCode, String) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        (status, json["msg"].as_str().unwrap().to_string())
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::Forbidden("product 12".to_string());
        assert_eq!(err.to_string(), "Forbidden: product 12");
    }

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::from(AuthError::UserAlreadyExists), StatusCode::BAD_REQUEST),
            (AppError::from(AuthError::InvalidCredentials), StatusCode::BAD_REQUEST),
            (AppError::from(StoreError::NameTaken), StatusCode::BAD_REQUEST),
            (AppError::from(StoreError::NotFound), StatusCode::NOT_FOUND),
            (AppError::from(StoreError::PendingNotFound), StatusCode::NOT_FOUND),
            (AppError::from(CatalogError::NoStore), StatusCode::FORBIDDEN),
            (AppError::from(CatalogError::StoreNotApproved), StatusCode::FORBIDDEN),
            (AppError::from(CatalogError::NotOwner(Write::Update)), StatusCode::FORBIDDEN),
            (AppError::from(CatalogError::NotFound), StatusCode::NOT_FOUND),
            (AppError::Unauthorized("x".to_string()), StatusCode::UNAUTHORIZED),
            (AppError::Forbidden("x".to_string()), StatusCode::FORBIDDEN),
            (AppError::from(RepositoryError::NotFound), StatusCode::INTERNAL_SERVER_ERROR),
            (
                AppError::from(StoreError::Repository(RepositoryError::NotFound)),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[tokio::test]
    async fn test_bodies_are_json_msg() {
        let (status, msg) = body_msg(StoreError::AlreadyApplied.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(msg, "You have already applied for a store.");

        let (_, msg) = body_msg(CatalogError::NotOwner(Write::Delete).into()).await;
        assert_eq!(msg, "Not authorized to delete this product");
    }

    #[tokio::test]
    async fn test_internal_details_are_hidden() {
        let err = AppError::from(RepositoryError::Database(sqlx::Error::PoolTimedOut));
        let (status, msg) = body_msg(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(msg, SERVER_ERROR_MESSAGE);
    }
}
