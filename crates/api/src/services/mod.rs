//! Business logic layered over the repositories.
//!
//! Services own the domain rules and name every failure; handlers only map
//! their errors to HTTP responses.

pub mod auth;
pub mod catalog;
pub mod stores;

pub use auth::{AuthError, AuthService, TokenService};
pub use catalog::{CatalogError, CatalogService};
pub use stores::{StoreError, StoreService};

/// Trim a free-text field, treating blank input as absent.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(None), None);
        assert_eq!(non_blank(Some("   ".to_string())), None);
        assert_eq!(non_blank(Some("  Vintage ".to_string())).as_deref(), Some("Vintage"));
    }
}
