//! Content factory for building oracles from data files.

use std::path::{Path, PathBuf};

use combat_core::{CombatConfig, ItemDefinition, SkillDefinition, StatusEffectDefinition};

use crate::loaders::{ConfigLoader, ItemLoader, LoadResult, SkillLoader, StatusLoader};

/// Every catalog loaded from one data directory.
#[derive(Debug, Clone)]
pub struct ContentBundle {
    pub config: CombatConfig,
    pub items: Vec<ItemDefinition>,
    pub skills: Vec<SkillDefinition>,
    pub statuses: Vec<StatusEffectDefinition>,
}

/// Content factory that loads all combat content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── combat.toml
/// ├── items.ron
/// ├── skills.ron
/// └── statuses.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    ///
    /// # Arguments
    ///
    /// * `data_dir` - Path to the directory containing data files
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Factory over the data files shipped with this crate.
    pub fn bundled() -> Self {
        Self::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("data"))
    }

    /// Load combat configuration from `combat.toml`.
    pub fn load_config(&self) -> LoadResult<CombatConfig> {
        let path = self.data_dir.join("combat.toml");
        ConfigLoader::load(&path)
    }

    /// Load item catalog from `items.ron`.
    pub fn load_items(&self) -> LoadResult<Vec<ItemDefinition>> {
        let path = self.data_dir.join("items.ron");
        ItemLoader::load(&path)
    }

    /// Load skill trees from `skills.ron`.
    pub fn load_skills(&self) -> LoadResult<Vec<SkillDefinition>> {
        let path = self.data_dir.join("skills.ron");
        SkillLoader::load(&path)
    }

    /// Load status effect definitions from `statuses.ron`.
    pub fn load_statuses(&self) -> LoadResult<Vec<StatusEffectDefinition>> {
        let path = self.data_dir.join("statuses.ron");
        StatusLoader::load(&path)
    }

    /// Load every catalog, failing on the first broken file.
    pub fn load_all(&self) -> LoadResult<ContentBundle> {
        let bundle = ContentBundle {
            config: self.load_config()?,
            items: self.load_items()?,
            skills: self.load_skills()?,
            statuses: self.load_statuses()?,
        };
        tracing::info!(
            data_dir = %self.data_dir.display(),
            items = bundle.items.len(),
            skills = bundle.skills.len(),
            statuses = bundle.statuses.len(),
            "combat content loaded"
        );
        Ok(bundle)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
