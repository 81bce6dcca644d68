//! Bearer token issuing and verification (HS256 JWT).

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use corner_store_core::{Role, UserId};

/// Claims carried by a bearer token.
///
/// `role` is informational; authorization always uses the role stored on
/// the user row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user ID.
    pub sub: String,
    /// Role at issue time.
    pub role: Role,
    /// Issued at (Unix timestamp).
    pub iat: i64,
    /// Expiration (Unix timestamp).
    pub exp: i64,
}

impl Claims {
    /// The user ID named by `sub`.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::InvalidSubject` if `sub` is not an integer ID.
    pub fn user_id(&self) -> Result<UserId, TokenError> {
        self.sub
            .parse::<i32>()
            .map(UserId::new)
            .map_err(|_| TokenError::InvalidSubject)
    }
}

/// Errors from token verification.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Bad signature, malformed token or expired.
    #[error("invalid token: {0}")]
    Invalid(#[from] jsonwebtoken::errors::Error),

    /// The subject claim is not a user ID.
    #[error("token subject is not a user id")]
    InvalidSubject,
}

/// Issues and verifies bearer tokens with a shared HS256 secret.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    /// Create a token service from the signing secret and token lifetime.
    #[must_use]
    pub fn new(secret: &SecretString, ttl_hours: u32) -> Self {
        let key = secret.expose_secret().as_bytes();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(key),
            decoding: DecodingKey::from_secret(key),
            validation,
            ttl: Duration::hours(i64::from(ttl_hours)),
        }
    }

    /// Issue a token for a user.
    ///
    /// # Errors
    ///
    /// Returns `jsonwebtoken::errors::Error` if encoding fails.
    pub fn issue(&self, user_id: UserId, role: Role) -> Result<String, jsonwebtoken::errors::Error> {
        self.issue_at(user_id, role, Utc::now())
    }

    fn issue_at(
        &self,
        user_id: UserId,
        role: Role,
        now: DateTime<Utc>,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = Claims {
            sub: user_id.to_string(),
            role,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
    }

    /// Verify a token's signature and expiry and return its claims.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Invalid` if the token is malformed, expired or
    /// signed with another secret.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn service(secret: &str) -> TokenService {
        TokenService::new(&SecretString::from(secret), 1)
    }

    #[test]
    fn test_issue_and_verify() {
        let tokens = service("Vb7#kQ2!xR9$mT4@pL6^wZ1&nH8*cJ3%");
        let token = tokens.issue(UserId::new(17), Role::Buyer).unwrap();

        let claims = tokens.verify(&token).unwrap();
        assert_eq!(claims.user_id().unwrap(), UserId::new(17));
        assert_eq!(claims.role, Role::Buyer);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = service("Vb7#kQ2!xR9$mT4@pL6^wZ1&nH8*cJ3%")
            .issue(UserId::new(1), Role::Admin)
            .unwrap();

        let other = service("Gd5@sW8!yF3#uE7$iO2%aK9^lM4&zX6*");
        assert!(matches!(other.verify(&token), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_expired_token_rejected() {
        let tokens = service("Vb7#kQ2!xR9$mT4@pL6^wZ1&nH8*cJ3%");
        let yesterday = Utc::now() - Duration::days(1);
        let token = tokens.issue_at(UserId::new(1), Role::Store, yesterday).unwrap();

        assert!(tokens.verify(&token).is_err());
    }

    #[test]
    fn test_garbage_rejected() {
        let tokens = service("Vb7#kQ2!xR9$mT4@pL6^wZ1&nH8*cJ3%");
        assert!(tokens.verify("not.a.jwt").is_err());
        assert!(tokens.verify("").is_err());
    }

    #[test]
    fn test_non_numeric_subject() {
        let claims = Claims {
            sub: "alice".to_string(),
            role: Role::Buyer,
            iat: 0,
            exp: 0,
        };
        assert!(matches!(claims.user_id(), Err(TokenError::InvalidSubject)));
    }
}
