//! Content loaders for reading combat data from files.
//!
//! Each loader has a `load(path)` entry point and a `parse(str)` variant
//! used by tests and embedded data.

pub mod config;
pub mod factory;
pub mod item;
pub mod skill;
pub mod status;

pub use config::ConfigLoader;
pub use factory::{ContentBundle, ContentFactory};
pub use item::ItemLoader;
pub use skill::SkillLoader;
pub use status::StatusLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
