use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

// Import the section types from the crates that own them to avoid
// duplication.
use shutsuba_core::RegistryConfig;
use shutsuba_parse::ExtractorConfig;

/// Config file template written by `shutsuba init`.
const CONFIG_TEMPLATE: &str = r#"{
  "registry": {
    "sires": [],
    "dams": [],
    "subjects": [],
    "replace_builtin": false
  },
  "extractor": {
    "fallback": true,
    "backfill": true,
    "backfill_window": 5
  }
}"#;

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub registry: RegistryConfig,
    #[serde(default)]
    pub extractor: ExtractorConfig,
}

impl Config {
    /// Load `~/shutsuba/config.json`, failing if the file is absent.
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_dir()?.join("config.json");

        if !config_path.exists() {
            anyhow::bail!(
                "Config file not found at: {}. Please run 'shutsuba init' to create config.",
                config_path.display()
            );
        }

        let content = std::fs::read_to_string(&config_path)?;
        let config: Self = serde_json::from_str(&content)?;

        Ok(config)
    }

    /// Load the config file if it exists, otherwise use the defaults
    /// (builtin registry, all recovery passes on).
    pub fn load_or_default() -> anyhow::Result<Self> {
        let config_path = Self::config_dir()?.join("config.json");

        if !config_path.exists() {
            debug!("no config file at {}, using defaults", config_path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&config_path)?;
        let config: Self = serde_json::from_str(&content)?;

        Ok(config)
    }

    fn config_dir() -> anyhow::Result<PathBuf> {
        Ok(dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Cannot find home directory"))?
            .join("shutsuba"))
    }

    pub fn ensure_config_dir() -> anyhow::Result<PathBuf> {
        let config_dir = Self::config_dir()?;
        std::fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }

    pub fn create_config() -> anyhow::Result<()> {
        let config_dir = Self::ensure_config_dir()?;
        let config_path = config_dir.join("config.json");

        if config_path.exists() {
            anyhow::bail!(
                "Config file already exists at: {}. Please edit it directly.",
                config_path.display()
            );
        }

        std::fs::write(&config_path, CONFIG_TEMPLATE)?;

        println!("✅ Created config file at: {}", config_path.display());
        println!();
        println!("📝 Next steps:");
        println!("   1. Add the sire, dam, and subject names you care about to the registry lists");
        println!("   2. Paste a race card into a file and run 'shutsuba parse <FILE>'");
        println!();
        println!("🔧 Configuration options:");
        println!("   - registry.replace_builtin: start from empty name sets instead of the builtin vocabulary");
        println!("   - extractor.fallback: recover registry names that appear out of order");
        println!("   - extractor.backfill_window: how many leading block lines the name backfill re-scans");
        println!();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn template_parses_to_defaults() {
        let config: Config =
            serde_json::from_str(CONFIG_TEMPLATE).expect("template should deserialize");

        assert!(config.registry.sires.is_empty());
        assert!(!config.registry.replace_builtin);
        assert!(config.extractor.fallback);
        assert!(config.extractor.backfill);
        assert_eq!(config.extractor.backfill_window, 5);
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn empty_json_uses_defaults() {
        let config: Config = serde_json::from_str("{}").expect("empty config should deserialize");

        assert!(config.registry.sires.is_empty());
        assert_eq!(config.extractor.backfill_window, 5);
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn partial_sections_fill_in() {
        let json = r#"{"registry": {"sires": ["タートルボウル"]}}"#;
        let config: Config = serde_json::from_str(json).expect("partial config should deserialize");

        assert_eq!(config.registry.sires.len(), 1);
        assert!(!config.registry.replace_builtin);
        assert!(config.extractor.backfill);
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn config_round_trips() {
        let config = Config::default();
        let json = serde_json::to_string(&config).expect("config should serialize");
        let back: Config = serde_json::from_str(&json).expect("valid JSON should deserialize");

        assert_eq!(back.registry.sires, config.registry.sires);
        assert_eq!(back.extractor.backfill_window, config.extractor.backfill_window);
    }
}
