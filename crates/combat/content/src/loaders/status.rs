//! Status effect catalog loader.

use std::collections::HashSet;
use std::path::Path;

use combat_core::StatusEffectDefinition;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Status catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusCatalog {
    pub statuses: Vec<StatusEffectDefinition>,
}

/// Loader for status effect definitions from RON files.
///
/// Kinds missing from the file fall back to the built-in catalog at the
/// oracle level, so partial files are valid.
pub struct StatusLoader;

impl StatusLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<StatusEffectDefinition>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<StatusEffectDefinition>> {
        let catalog: StatusCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse status catalog RON: {}", e))?;

        let mut seen = HashSet::new();
        for status in &catalog.statuses {
            if !seen.insert(status.kind) {
                anyhow::bail!("Duplicate status '{}' in status catalog", status.kind);
            }
            if status.duration == 0 {
                anyhow::bail!("Status '{}' must last at least one turn", status.kind);
            }
            if let Some(rule) = &status.stacking {
                if rule.max_stacks == 0 {
                    anyhow::bail!("Status '{}' stacking needs max_stacks >= 1", status.kind);
                }
            }
        }

        tracing::debug!(count = catalog.statuses.len(), "status catalog loaded");
        Ok(catalog.statuses)
    }
}
