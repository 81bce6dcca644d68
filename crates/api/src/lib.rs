//! Corner Store marketplace API library.
//!
//! The binary in `main.rs` only wires configuration, logging and the
//! listener. Everything else lives here so the integration tests can drive
//! the same router.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
