//! Domain types, constants, and pure logic for the lung-risk backend.
//!
//! This crate has no I/O: the scorer, input validation, and the resource
//! keys used by the lock table and version ledger all live here so the
//! repository and HTTP layers agree on them.

pub mod concurrency;
pub mod error;
pub mod feedback;
pub mod medical_history;
pub mod pagination;
pub mod prediction;
pub mod risk;
pub mod types;
