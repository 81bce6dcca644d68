//! HTTP middleware stack for the API.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request span with `request_id` and `user_id` fields)
//! 3. Request ID (record on span, echo in response)
//! 4. Security headers
//! 5. CORS
//! 6. Rate limiting on `/api/auth/*` (governor)
//!
//! Authentication is not a layer: handlers opt in through the
//! [`RequireUser`] and [`RequireRole`] extractors.

pub mod auth;
pub mod rate_limit;
pub mod request_id;
pub mod security_headers;

pub use auth::{
    AdminOnly, AuthRejection, BuyerOnly, RequireAdmin, RequireBuyer, RequireRole, RequireStore,
    RequireUser, StoreOnly,
};
pub use rate_limit::auth_rate_limiter;
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
