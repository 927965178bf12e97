//! Checker configuration.
//!
//! Handles loading, validating, and merging `gallery-check.toml`. The file is
//! optional and lives in the site root; stock defaults describe the gallery
//! this tool was built around, so most sites need no config at all.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! main_title = "Digital Art Gallery"            # h1 of index.html
//! external_base = "https://unsplash.com/s/photos/"  # "More X Images" links
//!
//! [stylesheets]
//! layout = "layout.css"                       # first stylesheet, every page
//! main = "image-lists.css"                    # second stylesheet, main page
//! detail = "/secondary/image-details.css"     # second stylesheet, detail pages
//!
//! [scripts]
//! entry = "scripts.js"                        # first deferred script
//!
//! [main_page]
//! min_images = 4                              # cards on the main page
//! ```
//!
//! Stylesheet and script values are substrings matched against the `href` /
//! `src` attribute, not full paths. Unknown keys are rejected to catch typos
//! early.

use crate::types::DEFAULT_EXTERNAL_BASE;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name looked up in the site root.
pub const CONFIG_FILE: &str = "gallery-check.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Checker configuration loaded from `gallery-check.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CheckConfig {
    /// Expected `h1` text of the main page.
    pub main_title: String,
    /// Base URL of the external "more images" links; the category slug is appended.
    pub external_base: String,
    pub stylesheets: StylesheetsConfig,
    pub scripts: ScriptsConfig,
    pub main_page: MainPageConfig,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            main_title: "Digital Art Gallery".to_string(),
            external_base: DEFAULT_EXTERNAL_BASE.to_string(),
            stylesheets: StylesheetsConfig::default(),
            scripts: ScriptsConfig::default(),
            main_page: MainPageConfig::default(),
        }
    }
}

impl CheckConfig {
    /// Validate config values are usable as expectations.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.main_title.trim().is_empty() {
            return Err(ConfigError::Validation("main_title must not be empty".into()));
        }
        if !(self.external_base.starts_with("http://")
            || self.external_base.starts_with("https://"))
        {
            return Err(ConfigError::Validation(
                "external_base must be an http(s) URL".into(),
            ));
        }
        let patterns = [
            ("stylesheets.layout", &self.stylesheets.layout),
            ("stylesheets.main", &self.stylesheets.main),
            ("stylesheets.detail", &self.stylesheets.detail),
            ("scripts.entry", &self.scripts.entry),
        ];
        for (key, value) in patterns {
            if value.is_empty() {
                return Err(ConfigError::Validation(format!("{key} must not be empty")));
            }
        }
        if self.main_page.min_images == 0 {
            return Err(ConfigError::Validation(
                "main_page.min_images must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Substrings expected in the first two stylesheet hrefs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StylesheetsConfig {
    /// First stylesheet on every page.
    pub layout: String,
    /// Second stylesheet on the main page.
    pub main: String,
    /// Second stylesheet on detail pages.
    pub detail: String,
}

impl Default for StylesheetsConfig {
    fn default() -> Self {
        Self {
            layout: "layout.css".to_string(),
            main: "image-lists.css".to_string(),
            detail: "/secondary/image-details.css".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScriptsConfig {
    /// Substring expected in the first deferred script's `src`.
    pub entry: String,
}

impl Default for ScriptsConfig {
    fn default() -> Self {
        Self {
            entry: "scripts.js".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MainPageConfig {
    /// Minimum number of `img` elements, each with a non-empty `src`.
    pub min_images: usize,
}

impl Default for MainPageConfig {
    fn default() -> Self {
        Self { min_images: 4 }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(CheckConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config does not serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// Tables merge key-by-key; any other overlay value replaces the base value.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `gallery-check.toml` from `root` as a raw TOML value.
///
/// Returns `Ok(None)` when the file does not exist.
pub fn load_raw_config(root: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = root.join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto `base`, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<CheckConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: CheckConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the config for the site at `root`, falling back to stock defaults.
pub fn load_config(root: &Path) -> Result<CheckConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// A fully-commented stock `gallery-check.toml`, printed by `gen-config`.
pub fn stock_config_toml() -> &'static str {
    r##"# gallery-check configuration
# ===========================
# Place this file at the site root as gallery-check.toml.
# All settings are optional; values shown are the defaults.
# Unknown keys cause an error.

# Expected <h1> text of index.html.
main_title = "Digital Art Gallery"

# Base of the "More <Category> Images" links. The category slug is appended,
# e.g. https://unsplash.com/s/photos/modern-design
external_base = "https://unsplash.com/s/photos/"

# ---------------------------------------------------------------------------
# Stylesheets: substrings expected in the href of the first two
# <link rel="stylesheet"> elements. The files must also exist.
# ---------------------------------------------------------------------------
[stylesheets]
layout = "layout.css"
main = "image-lists.css"
detail = "/secondary/image-details.css"

# ---------------------------------------------------------------------------
# Scripts: substring expected in the src of the first <script defer>.
# ---------------------------------------------------------------------------
[scripts]
entry = "scripts.js"

# ---------------------------------------------------------------------------
# Main page
# ---------------------------------------------------------------------------
[main_page]
# Minimum number of <img> cards, each with a non-empty src.
min_images = 4
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_matches_gallery() {
        let config = CheckConfig::default();
        assert_eq!(config.main_title, "Digital Art Gallery");
        assert_eq!(config.external_base, "https://unsplash.com/s/photos/");
        assert_eq!(config.stylesheets.detail, "/secondary/image-details.css");
        assert_eq!(config.scripts.entry, "scripts.js");
        assert_eq!(config.main_page.min_images, 4);
    }

    #[test]
    fn parse_partial_config() {
        let config: CheckConfig = toml::from_str(
            r#"
[stylesheets]
main = "cards.css"
"#,
        )
        .unwrap();
        assert_eq!(config.stylesheets.main, "cards.css");
        assert_eq!(config.stylesheets.layout, "layout.css");
        assert_eq!(config.main_title, "Digital Art Gallery");
    }

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.main_title, "Digital Art Gallery");
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            r#"
main_title = "Photo Wall"

[main_page]
min_images = 6
"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.main_title, "Photo Wall");
        assert_eq!(config.main_page.min_images, 6);
        assert_eq!(config.scripts.entry, "scripts.js");
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "this is not valid toml [[[").unwrap();
        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn unknown_key_rejected() {
        let result: Result<CheckConfig, _> = toml::from_str("main_titel = \"x\"");
        assert!(result.is_err());
    }

    #[test]
    fn unknown_nested_key_rejected_via_load_config() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "[scripts]\nmain = \"app.js\"\n").unwrap();
        assert!(matches!(load_config(tmp.path()), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn validate_rejects_non_http_base() {
        let mut config = CheckConfig::default();
        config.external_base = "unsplash.com/s/photos".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_rejects_empty_pattern() {
        let mut config = CheckConfig::default();
        config.stylesheets.layout = String::new();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("stylesheets.layout"));
    }

    #[test]
    fn validate_rejects_zero_images() {
        let mut config = CheckConfig::default();
        config.main_page.min_images = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "main_title = \"  \"\n").unwrap();
        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn merge_toml_table_merge() {
        let base: toml::Value = toml::from_str("[a]\nx = 1\ny = 2\n").unwrap();
        let overlay: toml::Value = toml::from_str("[a]\ny = 3\n").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["a"]["x"].as_integer(), Some(1));
        assert_eq!(merged["a"]["y"].as_integer(), Some(3));
    }

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: CheckConfig = toml::from_str(stock_config_toml()).unwrap();
        let defaults = CheckConfig::default();
        assert_eq!(config.main_title, defaults.main_title);
        assert_eq!(config.external_base, defaults.external_base);
        assert_eq!(config.stylesheets.main, defaults.stylesheets.main);
        assert_eq!(config.main_page.min_images, defaults.main_page.min_images);
    }
}
