use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SelectError};
use crate::normalize::NormalizeOptions;
use crate::selection::SelectionPolicy;

/// Select configuration, loaded from `~/.config/omniselect/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectConfig {
    /// Fetch the empty query once when the select mounts.
    pub autoload: bool,
    /// Accumulate successive pages of the same query.
    pub pagination: bool,
    pub ignore_accents: bool,
    pub ignore_case: bool,
    /// Multi-select only: empty the visible options after each added pick.
    pub clear_options_on_selection: bool,
    pub multi: bool,
    pub cache: CacheConfig,
    pub presentation: PresentationConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    /// Bound the number of cached queries; unbounded when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<usize>,
}

/// Texts handed to the rendering side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresentationConfig {
    pub placeholder: String,
    /// Shown instead of the placeholder while loading. When unset, stale
    /// options stay visible during fresh loads.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loading_placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_results_text: Option<String>,
    pub search_prompt_text: String,
}

// ─── Defaults ──────────────────────────────────────────────

impl Default for SelectConfig {
    fn default() -> Self {
        Self {
            autoload: true,
            pagination: false,
            ignore_accents: true,
            ignore_case: true,
            clear_options_on_selection: false,
            multi: false,
            cache: CacheConfig::default(),
            presentation: PresentationConfig::default(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            capacity: None,
        }
    }
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            placeholder: "Select...".to_string(),
            loading_placeholder: Some("Loading...".to_string()),
            no_results_text: Some("No results found".to_string()),
            search_prompt_text: "Type to search".to_string(),
        }
    }
}

// ─── Derived settings ──────────────────────────────────────

impl SelectConfig {
    pub fn normalize_options(&self) -> NormalizeOptions {
        NormalizeOptions::new(self.ignore_accents, self.ignore_case)
    }

    pub fn selection_policy(&self) -> SelectionPolicy {
        SelectionPolicy::new(self.multi, self.clear_options_on_selection)
    }
}

// ─── Load / Save ───────────────────────────────────────────

impl SelectConfig {
    /// Standard config file path: `~/.config/omniselect/config.toml`
    pub fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var("OMNISELECT_CONFIG") {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("omniselect")
            .join("config.toml")
    }

    /// Load from the standard path, falling back to defaults when missing.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save to the standard path.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.cache.capacity == Some(0) {
            return Err(SelectError::ConfigError(
                "cache.capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
