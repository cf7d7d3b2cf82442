//! Combat configuration loader.

use std::path::Path;

use combat_core::CombatConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for combat configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the TOML file containing CombatConfig
    ///
    /// # Returns
    ///
    /// Returns a validated CombatConfig. Missing keys keep their defaults.
    pub fn load(path: &Path) -> LoadResult<CombatConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<CombatConfig> {
        let config: CombatConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse combat config TOML: {}", e))?;
        config
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid combat config: {}", e))?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::{DrawPolicy, EquipmentBonusStacking};

    #[test]
    fn partial_file_keeps_defaults() {
        let config = ConfigLoader::parse(
            r#"
            max_turns = 30
            draw_policy = "no_winner"
            equipment_bonus_stacking = "sum"
            "#,
        )
        .expect("config parses");

        assert_eq!(config.max_turns, 30);
        assert_eq!(config.draw_policy, DrawPolicy::NoWinner);
        assert_eq!(config.equipment_bonus_stacking, EquipmentBonusStacking::Sum);
        assert_eq!(config.min_damage, CombatConfig::DEFAULT_MIN_DAMAGE);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = ConfigLoader::parse("max_turns = 0").unwrap_err();
        assert!(err.to_string().contains("Invalid combat config"));
    }
}
