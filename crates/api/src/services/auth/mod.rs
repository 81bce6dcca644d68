//! Authentication service.
//!
//! Provides password registration and login, issuing a bearer token on
//! success.

mod error;
mod token;

pub use error::AuthError;
pub use token::{Claims, TokenError, TokenService};

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;

use corner_store_core::{Email, Role};

use crate::db::users::{EMAIL_UNIQUE, UserRepository};
use crate::models::{NewUser, User};

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Registration input as received from the client.
#[derive(Debug, Clone)]
pub struct Registration<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

/// A user together with a freshly issued bearer token.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user: User,
}

/// Authentication service.
///
/// Handles user registration and password login.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
    tokens: &'a TokenService,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, tokens: &'a TokenService) -> Self {
        Self {
            users: UserRepository::new(pool),
            tokens,
        }
    }

    /// Register a new `BUYER` account and sign it in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::MissingField` if a name is blank.
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered.
    pub async fn register(&self, input: &Registration<'_>) -> Result<Session, AuthError> {
        let user = create_account(&self.users, input, Role::Buyer).await?;
        let token = self.tokens.issue(user.id, user.role)?;

        tracing::info!(user_id = %user.id, "User registered");

        Ok(Session { token, user })
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email is unknown, malformed
    /// or the password is wrong.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        let (user, password_hash) = self
            .users
            .get_password_hash(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        let token = self.tokens.issue(user.id, user.role)?;

        Ok(Session { token, user })
    }
}

/// Validate input, hash the password and insert a user with `role`.
///
/// Shared by registration and admin provisioning so both apply the same
/// rules.
///
/// # Errors
///
/// See [`AuthService::register`].
pub async fn create_account(
    users: &UserRepository<'_>,
    input: &Registration<'_>,
    role: Role,
) -> Result<User, AuthError> {
    let email = Email::parse(input.email)?;
    let first_name = required(input.first_name, "firstName")?;
    let last_name = required(input.last_name, "lastName")?;
    validate_password(input.password)?;

    let password_hash = hash_password(input.password)?;

    users
        .create(&NewUser {
            email: &email,
            password_hash: &password_hash,
            role,
            first_name,
            last_name,
        })
        .await
        .map_err(|e| {
            if e.is_conflict_on(EMAIL_UNIQUE) {
                AuthError::UserAlreadyExists
            } else {
                AuthError::Repository(e)
            }
        })
}

fn required<'s>(value: &'s str, field: &'static str) -> Result<&'s str, AuthError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AuthError::MissingField(field));
    }
    Ok(trimmed)
}

/// Validate password requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Hash a password with Argon2id and a random salt.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a stored PHC hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::PasswordHash)?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
