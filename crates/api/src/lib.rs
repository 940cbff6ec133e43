//! Lung-risk prediction API server.
//!
//! The binary in `main.rs` only wires configuration, the pool, and the
//! background sweeper around [`app::build_router`].

pub mod app;
pub mod auth;
pub mod background;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod state;
