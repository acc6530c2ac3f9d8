//! vodify API server library.
//!
//! Exposes the building blocks (config, state, error handling, routes,
//! converter client, notifications) so integration tests and the binary
//! entrypoint can both access them.

pub mod config;
pub mod converter;
pub mod error;
pub mod notifications;
pub mod router;
pub mod routes;
pub mod state;
