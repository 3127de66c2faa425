use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub ledger: LedgerConfig,
    pub rotation: RotationConfig,
    pub post: PostConfig,
    pub image: ImageConfig,
}

/// Ledger (Google Sheets) configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Spreadsheet ID of the joke ledger
    pub spreadsheet_id: String,
}

/// Style rotation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationConfig {
    /// Ordered style cycle, advanced round-robin
    pub styles: Vec<String>,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            styles: vec![
                "Corporate Wit".to_string(),
                "Playful Nerd".to_string(),
                "Dad-Joke".to_string(),
            ],
        }
    }
}

/// LinkedIn post configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PostConfig {
    pub visibility: String,
    pub media_title: String,
}

impl Default for PostConfig {
    fn default() -> Self {
        Self {
            visibility: "PUBLIC".to_string(),
            media_title: "Weekly Joke".to_string(),
        }
    }
}

/// Doodle image generation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    pub enabled: bool,
    pub model: String,
    /// Prompt template; `{joke}` is replaced with the joke text
    pub prompt_template: String,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            model: "dall-e-3".to_string(),
            prompt_template:
                "A hand-drawn doodle-style black and white cartoon representing: {joke}"
                    .to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            info!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        info!(path = %path.display(), "Loaded configuration");

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.rotation.styles.len(), 3);
        assert_eq!(config.rotation.styles[0], "Corporate Wit");
        assert_eq!(config.post.visibility, "PUBLIC");
        assert!(config.image.enabled);
        assert!(config.image.prompt_template.contains("{joke}"));
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
ledger:
  spreadsheet_id: "1abcDEF"

rotation:
  styles:
    - Observational
    - Dad-Joke

image:
  enabled: false
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.ledger.spreadsheet_id, "1abcDEF");
        assert_eq!(config.rotation.styles.len(), 2);
        assert!(!config.image.enabled);
        // Untouched sections keep their defaults
        assert_eq!(config.post.media_title, "Weekly Joke");
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = Config::load("does-not-exist.yml").unwrap();
        assert_eq!(config.rotation.styles.len(), 3);
    }
}
