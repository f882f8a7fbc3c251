//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - Where the entity can be patched, an update DTO with all-`Option` fields

pub mod exercise;
pub mod tracking;
pub mod user;
pub mod workout;
