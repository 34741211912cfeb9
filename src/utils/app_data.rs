use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::tokenizer::MAX_TERM_LENGTH;

const APP_NAME: &str = "knowledge-query";
const CONFIG_FILE: &str = "config.json";

/// Backend field prefixes used when building terms
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldPrefixes {
    #[serde(default = "default_exact_title_prefix")]
    pub exact_title: String,
    #[serde(default = "default_title_prefix")]
    pub title: String,
    #[serde(default = "default_content_type_prefix")]
    pub content_type: String,
    #[serde(default = "default_id_prefix")]
    pub id: String,
    #[serde(default = "default_tag_prefix")]
    pub tag: String,
}

fn default_exact_title_prefix() -> String {
    "XEXACTS".to_string()
}

fn default_title_prefix() -> String {
    "S".to_string()
}

fn default_content_type_prefix() -> String {
    "T".to_string()
}

fn default_id_prefix() -> String {
    "Q".to_string()
}

fn default_tag_prefix() -> String {
    "K".to_string()
}

impl Default for FieldPrefixes {
    fn default() -> Self {
        Self {
            exact_title: default_exact_title_prefix(),
            title: default_title_prefix(),
            content_type: default_content_type_prefix(),
            id: default_id_prefix(),
            tag: default_tag_prefix(),
        }
    }
}

/// Compiler configuration stored in the app data directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilerConfig {
    #[serde(default)]
    pub prefixes: FieldPrefixes,

    /// Byte limit per search term
    #[serde(default = "default_max_term_length")]
    pub max_term_length: usize,

    /// Relevance cutoff (percent) for title-only matching
    #[serde(default = "default_cutoff")]
    pub default_cutoff: u32,

    /// Relevance cutoff (percent) when the synopsis is matched too
    #[serde(default = "default_synopsis_cutoff")]
    pub synopsis_cutoff: u32,
}

fn default_max_term_length() -> usize {
    MAX_TERM_LENGTH
}

fn default_cutoff() -> u32 {
    10
}

fn default_synopsis_cutoff() -> u32 {
    20
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            prefixes: FieldPrefixes::default(),
            max_term_length: default_max_term_length(),
            default_cutoff: default_cutoff(),
            synopsis_cutoff: default_synopsis_cutoff(),
        }
    }
}

impl CompilerConfig {
    /// Load config from the app data directory, or return default if not found
    pub fn load() -> Result<Self> {
        let config_path = get_config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load config from an explicit file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: CompilerConfig =
            serde_json::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// Save config to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content).context("Failed to write config file")?;
        Ok(())
    }
}

/// Get the path to the config file
pub fn get_config_path() -> Result<PathBuf> {
    let app_dir = get_app_data_dir()?;
    Ok(app_dir.join(CONFIG_FILE))
}

/// Get the application data directory
pub fn get_app_data_dir() -> Result<PathBuf> {
    let base = if cfg!(target_os = "macos") {
        dirs::home_dir().map(|h| h.join("Library").join("Application Support"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
    } else {
        // Linux/Unix: use XDG_DATA_HOME or ~/.local/share
        dirs::data_dir()
    };

    let base = base.context("Could not determine app data directory")?;
    Ok(base.join(APP_NAME))
}
