//! Domain models for the marketplace API.
//!
//! Row types derive `sqlx::FromRow` and serialize with the column names
//! (snake_case) that API clients see.

pub mod product;
pub mod store;
pub mod user;

pub use product::{NewProduct, Product, ProductChanges, ProductDetail, PublicProduct};
pub use store::{NewStore, Store};
pub use user::{NewUser, User};
