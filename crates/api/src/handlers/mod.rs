//! Request handlers, one submodule per resource. Domain and storage errors
//! bubble up as [`crate::error::AppError`].

pub mod auth;
pub mod catalog;
pub mod feedback;
pub mod health;
pub mod medical_history;
pub mod prediction;
