//! Data-driven combat content and loaders.
//!
//! This crate reads the static catalogs consumed by the combat engine:
//! - Item definitions (RON)
//! - Skill trees per creature type (RON)
//! - Status effect definitions (RON)
//! - Combat tuning (TOML)
//!
//! Content is handed to runtime oracles and never appears in battle state.
//! All loaders deserialize `combat-core` types directly via serde.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    ConfigLoader, ContentBundle, ContentFactory, ItemLoader, LoadResult, SkillLoader, StatusLoader,
};
