//! Row models and DTOs.
//!
//! Each submodule contains:
//! - `FromRow` + `Serialize` structs matching database rows
//! - `Deserialize` DTOs for inserts and upserts

pub mod business;
pub mod notification;
