//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` struct matching the database row
//! - `Deserialize` create/update DTOs where the entity is writable

pub mod filter_template;
pub mod point;
pub mod profile;
pub mod video_config;
pub mod webcam;
