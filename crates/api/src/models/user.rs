//! User domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use corner_store_core::{Email, Role, UserId};

/// A marketplace account.
///
/// Never carries the password hash; credential lookups go through
/// [`UserRepository::get_password_hash`](crate::db::UserRepository::get_password_hash).
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Login email (normalized, unique).
    pub email: Email,
    /// Current role. Always read fresh from storage for authorization.
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
    /// When the account was registered.
    pub created_at: DateTime<Utc>,
}

/// Fields required to create a user.
#[derive(Debug, Clone)]
pub struct NewUser<'a> {
    pub email: &'a Email,
    pub password_hash: &'a str,
    pub role: Role,
    pub first_name: &'a str,
    pub last_name: &'a str,
}
