use livetree_engine::MarkdownStyle;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

/// User configuration: per-kind markdown style overrides.
///
/// The `style` table holds partial records; callers merge it over the
/// built-in baseline with [`MarkdownStyle::merged_with_defaults`].
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub style: MarkdownStyle,
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/livetree");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// The effective style set: overrides merged over the baseline.
    pub fn effective_style(&self) -> MarkdownStyle {
        MarkdownStyle::merged_with_defaults(&self.style)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_path() {
        let config_path = Config::config_path();
        let path_str = config_path.to_string_lossy();

        // Should not contain tilde anymore
        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/livetree/config.toml"));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let non_existent_config = temp_dir.path().join("nonexistent.toml");

        let result = Config::load_from_path(&non_existent_config).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        let mut config = Config::default();
        config.style.code.color = Some("#aa0000".to_string());
        config.style.mention_user.background_color = Some("#e0e0ff".to_string());

        config.save_to_path(&config_file).unwrap();
        let loaded = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(loaded.style.code.color.as_deref(), Some("#aa0000"));
        assert_eq!(
            loaded.style.mention_user.background_color.as_deref(),
            Some("#e0e0ff")
        );
    }

    #[test]
    fn test_parse_partial_style_table() {
        let config_content = r##"
[style.code]
color = "#444444"
font-family = "Fira Code"

[style.blockquote]
border-color = "#00ff00"
"##;

        let config: Config = toml::from_str(config_content).unwrap();
        assert_eq!(config.style.code.color.as_deref(), Some("#444444"));
        assert_eq!(config.style.code.font_family.as_deref(), Some("Fira Code"));
        assert_eq!(
            config.style.blockquote.border_color.as_deref(),
            Some("#00ff00")
        );
        // untouched kinds stay unset
        assert!(config.style.h1.color.is_none());
    }

    #[test]
    fn test_effective_style_merges_over_baseline() {
        let mut config = Config::default();
        config.style.syntax.color = Some("#123456".to_string());

        let style = config.effective_style();
        assert_eq!(style.syntax.color.as_deref(), Some("#123456"));
        // baseline survives for kinds without overrides
        assert_eq!(
            style.code.font_family,
            MarkdownStyle::default_style().code.font_family
        );
    }

    #[test]
    fn test_empty_config_parses() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.style.code.color.is_none());
    }
}
