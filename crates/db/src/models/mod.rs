//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create / upsert DTO where the API writes the table

pub mod catalog;
pub mod feedback;
pub mod lock;
pub mod medical_history;
pub mod prediction;
pub mod session;
pub mod user;
pub mod version;
