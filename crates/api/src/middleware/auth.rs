//! Bearer-token authentication and role extractors.
//!
//! [`RequireUser`] verifies the `Authorization: Bearer <token>` header, then
//! reloads the user from the database so a role change takes effect on the
//! next request. [`RequireRole`] runs the same check and then requires the
//! stored role to be one of the roles named by its marker type.

use std::marker::PhantomData;

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
    response::{IntoResponse, Response},
};
use tracing::Span;

use corner_store_core::Role;

use crate::db::{RepositoryError, UserRepository};
use crate::error::{AppError, set_sentry_user};
use crate::models::User;
use crate::state::AppState;

/// Extractor that requires a valid bearer token for an existing user.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(RequireUser(user): RequireUser) -> impl IntoResponse {
///     format!("Hello, {}!", user.first_name)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RequireUser(pub User);

/// Error returned when authentication or the role check fails.
#[derive(Debug)]
pub enum AuthRejection {
    /// No bearer token in the request.
    NoToken,
    /// Token is malformed, expired or has a bad signature.
    TokenFailed,
    /// Token is valid but its user no longer exists.
    UserNotFound,
    /// User's role is not allowed here.
    Forbidden,
    /// The user lookup failed.
    Lookup(RepositoryError),
}

impl From<AuthRejection> for AppError {
    fn from(rejection: AuthRejection) -> Self {
        match rejection {
            AuthRejection::NoToken => Self::Unauthorized("Not authorized, no token".to_string()),
            AuthRejection::TokenFailed => {
                Self::Unauthorized("Not authorized, token failed".to_string())
            }
            AuthRejection::UserNotFound => {
                Self::Unauthorized("Not authorized, user not found".to_string())
            }
            AuthRejection::Forbidden => {
                Self::Forbidden("Forbidden: You do not have the required role".to_string())
            }
            AuthRejection::Lookup(err) => Self::Database(err),
        }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header.
///
/// The scheme is matched case-insensitively. Returns `None` for a missing
/// header, another scheme or an empty token.
#[must_use]
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Require `role` to be one of `allowed`.
///
/// # Errors
///
/// Returns `AuthRejection::Forbidden` otherwise.
pub fn check_role(role: Role, allowed: &[Role]) -> Result<(), AuthRejection> {
    if allowed.contains(&role) {
        Ok(())
    } else {
        Err(AuthRejection::Forbidden)
    }
}

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or(AuthRejection::NoToken)?;

        let user_id = state
            .tokens()
            .verify(token)
            .and_then(|claims| claims.user_id())
            .map_err(|e| {
                tracing::debug!(error = %e, "Bearer token rejected");
                AuthRejection::TokenFailed
            })?;

        let user = UserRepository::new(state.pool())
            .get_by_id(user_id)
            .await
            .map_err(AuthRejection::Lookup)?
            .ok_or(AuthRejection::UserNotFound)?;

        Span::current().record("user_id", user.id.as_i32());
        set_sentry_user(&user.id);

        Ok(Self(user))
    }
}

/// A set of roles allowed through a [`RequireRole`] extractor.
pub trait AllowedRoles {
    /// Roles allowed through.
    const ROLES: &'static [Role];
}

/// Marker: buyers only (store applications).
#[derive(Debug, Clone, Copy)]
pub struct BuyerOnly;

/// Marker: store owners only (store dashboard, product writes).
#[derive(Debug, Clone, Copy)]
pub struct StoreOnly;

/// Marker: administrators only.
#[derive(Debug, Clone, Copy)]
pub struct AdminOnly;

impl AllowedRoles for BuyerOnly {
    const ROLES: &'static [Role] = &[Role::Buyer];
}

impl AllowedRoles for StoreOnly {
    const ROLES: &'static [Role] = &[Role::Store];
}

impl AllowedRoles for AdminOnly {
    const ROLES: &'static [Role] = &[Role::Admin];
}

/// Extractor that requires authentication and one of `R::ROLES`.
///
/// Authentication always runs first, so a missing or bad token is a 401
/// even on routes the caller could never access.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(RequireAdmin { user, .. }: RequireAdmin) -> impl IntoResponse {
///     format!("Hello admin {}!", user.first_name)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RequireRole<R> {
    /// The authenticated user.
    pub user: User,
    _allowed: PhantomData<R>,
}

/// Requires role `BUYER`.
pub type RequireBuyer = RequireRole<BuyerOnly>;
/// Requires role `STORE`.
pub type RequireStore = RequireRole<StoreOnly>;
/// Requires role `ADMIN`.
pub type RequireAdmin = RequireRole<AdminOnly>;

impl<R> FromRequestParts<AppState> for RequireRole<R>
where
    R: AllowedRoles + Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let RequireUser(user) = RequireUser::from_request_parts(parts, state).await?;

        check_role(user.role, R::ROLES).inspect_err(|_| {
            tracing::warn!(
                user_id = %user.id,
                role = %user.role,
                path = %parts.uri.path(),
                "Role check failed"
            );
        })?;

        Ok(Self {
            user,
            _allowed: PhantomData,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(authorization: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static(authorization));
        headers
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token(&headers("Bearer abc.def.ghi")), Some("abc.def.ghi"));
        assert_eq!(bearer_token(&headers("bearer   tok ")), Some("tok"));
        assert_eq!(bearer_token(&headers("Basic dXNlcjpwYXNz")), None);
        assert_eq!(bearer_token(&headers("Bearer ")), None);
        assert_eq!(bearer_token(&headers("Bearer")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn test_check_role() {
        assert!(check_role(Role::Admin, AdminOnly::ROLES).is_ok());
        assert!(check_role(Role::Store, StoreOnly::ROLES).is_ok());
        assert!(check_role(Role::Buyer, BuyerOnly::ROLES).is_ok());

        assert!(matches!(
            check_role(Role::Buyer, StoreOnly::ROLES),
            Err(AuthRejection::Forbidden)
        ));
        assert!(matches!(
            check_role(Role::Store, AdminOnly::ROLES),
            Err(AuthRejection::Forbidden)
        ));
        assert!(matches!(
            check_role(Role::Admin, BuyerOnly::ROLES),
            Err(AuthRejection::Forbidden)
        ));
    }

    #[test]
    fn test_rejection_statuses() {
        use axum::http::StatusCode;

        assert_eq!(
            AuthRejection::NoToken.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthRejection::TokenFailed.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthRejection::UserNotFound.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthRejection::Forbidden.into_response().status(),
            StatusCode::FORBIDDEN
        );
    }
}
