pub mod database;
pub mod matcher;

pub use database::{ReferenceDatabase, ReferenceMaterial, DEFAULT_DATABASE_PATH};
pub use matcher::{best_match, match_materials, normalize, suggest};
