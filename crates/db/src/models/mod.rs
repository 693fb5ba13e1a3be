//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - `FromRow` + `Serialize` entity structs matching the database rows
//! - `Deserialize` create/update DTOs
//! - conversions into the `heist_core` skill types used by the engine

pub mod heist;
pub mod member;
pub mod status;
