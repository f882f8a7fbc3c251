//! Domain primitives shared by the database and API crates.
//!
//! Nothing in this crate performs I/O.

pub mod error;
pub mod exercise_type;
pub mod tracking;
pub mod types;
