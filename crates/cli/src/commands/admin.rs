//! Admin account management commands.
//!
//! # Usage
//!
//! ```bash
//! # Create a new admin account
//! cs-cli admin create -e admin@example.in -p 'long-password' --first-name Asha --last-name Iyer
//!
//! # Promote an existing user
//! cs-cli admin promote -e asha@example.in
//! ```
//!
//! # Environment Variables
//!
//! - `CORNER_STORE_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)

use corner_store_api::db::{RepositoryError, UserRepository};
use corner_store_api::services::AuthError;
use corner_store_api::services::auth::{Registration, create_account};
use corner_store_core::{Email, EmailError, Role, UserId};
use thiserror::Error;

use super::{ConnectError, connect};

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Could not connect.
    #[error(transparent)]
    Connect(#[from] ConnectError),

    /// Account creation was rejected.
    #[error("Could not create admin: {0}")]
    Create(#[from] AuthError),

    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// No user with that email.
    #[error("No user found with email: {0}")]
    UserNotFound(String),

    /// Database error.
    #[error("Database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Create a new user with role `ADMIN`.
///
/// Uses the same password rules and hashing as public registration.
///
/// # Returns
///
/// The ID of the created user.
pub async fn create_user(
    email: &str,
    password: &str,
    first_name: &str,
    last_name: &str,
) -> Result<UserId, AdminError> {
    let pool = connect().await?;
    let users = UserRepository::new(&pool);

    let user = create_account(
        &users,
        &Registration {
            first_name,
            last_name,
            email,
            password,
        },
        Role::Admin,
    )
    .await?;

    tracing::info!(
        "Admin user created successfully! ID: {}, Email: {}",
        user.id,
        user.email
    );

    Ok(user.id)
}

/// Give an existing user the `ADMIN` role.
///
/// A store owner promoted this way keeps their store but can no longer
/// manage it through the `STORE` routes.
pub async fn promote_user(email: &str) -> Result<UserId, AdminError> {
    let email = Email::parse(email)?;

    let pool = connect().await?;
    let users = UserRepository::new(&pool);

    let user = users
        .set_role_by_email(&email, Role::Admin)
        .await?
        .ok_or_else(|| AdminError::UserNotFound(email.to_string()))?;

    tracing::info!(
        "User promoted to admin. ID: {}, Email: {}",
        user.id,
        user.email
    );

    Ok(user.id)
}
