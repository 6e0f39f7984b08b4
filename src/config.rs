//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. The user file is
//! sparse: it is deep-merged over the stock defaults, so only the keys that
//! differ need to be written down.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! assets_dir = "assets"     # Copied verbatim to <output>/assets
//!
//! [site]
//! name = "Portfolio"        # Used in <title> and Open Graph tags
//! base_url = ""             # Absolute origin for canonical URLs (optional)
//! language = "en"
//!
//! [typewriter]
//! speed_ms = 4              # Milliseconds per revealed character (> 0)
//! delay_ms = 300            # Pause before the first character
//!
//! [theme]
//! font_family = "..."
//! font_size = "15px"
//! line_height = "1.5"
//! max_width = "560px"
//!
//! [colors.light]
//! background = "#fbfbfa"
//! text = "#1f1f1e"
//! text_muted = "#9c9c9b"
//! border = "#e6e6e4"
//! link = "#1f1f1e"
//! link_hover = "#000000"
//!
//! [colors.dark]
//! background = "#141414"
//! text = "#ececea"
//! text_muted = "#7d7d7b"
//! border = "#2a2a29"
//! link = "#ececea"
//! link_hover = "#ffffff"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Directory inside the content root copied to `<output>/assets`.
    #[serde(default = "default_assets_dir")]
    pub assets_dir: String,
    pub site: SiteMeta,
    pub typewriter: TypewriterConfig,
    pub theme: ThemeConfig,
    pub colors: ColorConfig,
}

fn default_assets_dir() -> String {
    "assets".to_string()
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            assets_dir: default_assets_dir(),
            site: SiteMeta::default(),
            typewriter: TypewriterConfig::default(),
            theme: ThemeConfig::default(),
            colors: ColorConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.typewriter.speed_ms == 0 {
            return Err(ConfigError::Validation(
                "typewriter.speed_ms must be greater than 0".into(),
            ));
        }
        if self.site.name.trim().is_empty() {
            return Err(ConfigError::Validation("site.name must not be empty".into()));
        }
        if !self.site.base_url.is_empty()
            && !(self.site.base_url.starts_with("http://")
                || self.site.base_url.starts_with("https://"))
        {
            return Err(ConfigError::Validation(
                "site.base_url must start with http:// or https://".into(),
            ));
        }
        Ok(())
    }
}

/// Site identity used in document heads.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteMeta {
    pub name: String,
    /// Origin used for canonical and Open Graph URLs. Empty means
    /// root-relative URLs.
    pub base_url: String,
    pub language: String,
}

impl Default for SiteMeta {
    fn default() -> Self {
        Self {
            name: "Portfolio".to_string(),
            base_url: String::new(),
            language: "en".to_string(),
        }
    }
}

impl SiteMeta {
    /// Absolute URL for a site path when `base_url` is set, otherwise the path.
    pub fn canonical_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

/// Reveal animation timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TypewriterConfig {
    pub speed_ms: u64,
    pub delay_ms: u64,
}

impl Default for TypewriterConfig {
    fn default() -> Self {
        Self {
            speed_ms: 4,
            delay_ms: 300,
        }
    }
}

/// Typography and layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeConfig {
    pub font_family: String,
    pub font_size: String,
    pub line_height: String,
    pub max_width: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            font_family: "\"Helvetica Neue\", Helvetica, Arial, sans-serif".to_string(),
            font_size: "15px".to_string(),
            line_height: "1.5".to_string(),
            max_width: "560px".to_string(),
        }
    }
}

/// Color configuration for light and dark modes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    pub light: ColorScheme,
    pub dark: ColorScheme,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            light: ColorScheme::default_light(),
            dark: ColorScheme::default_dark(),
        }
    }
}

/// Individual color scheme (light or dark).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    pub background: String,
    pub text: String,
    /// Secondary text: section headers, periods, captions, dimmed content.
    pub text_muted: String,
    pub border: String,
    pub link: String,
    pub link_hover: String,
}

impl ColorScheme {
    pub fn default_light() -> Self {
        Self {
            background: "#fbfbfa".to_string(),
            text: "#1f1f1e".to_string(),
            text_muted: "#9c9c9b".to_string(),
            border: "#e6e6e4".to_string(),
            link: "#1f1f1e".to_string(),
            link_hover: "#000000".to_string(),
        }
    }

    pub fn default_dark() -> Self {
        Self {
            background: "#141414".to_string(),
            text: "#ececea".to_string(),
            text_muted: "#7d7d7b".to_string(),
            border: "#2a2a29".to_string(),
            link: "#ececea".to_string(),
            link_hover: "#ffffff".to_string(),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_light()
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
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

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    resolve_config(stock_defaults_value(), load_raw_config(root)?)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# folio configuration
# ===================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.

# Directory inside the content root copied to <output>/assets.
assets_dir = "assets"

# ---------------------------------------------------------------------------
# Site identity
# ---------------------------------------------------------------------------
[site]
# Shown in page titles as "<page> | <name>".
name = "Portfolio"

# Absolute origin for canonical and Open Graph URLs, e.g. "https://example.com".
# Leave empty for root-relative URLs.
base_url = ""

language = "en"

# ---------------------------------------------------------------------------
# Typewriter reveal
# ---------------------------------------------------------------------------
[typewriter]
# Milliseconds per revealed character. Must be greater than 0.
speed_ms = 4

# Pause before the first character appears.
delay_ms = 300

# ---------------------------------------------------------------------------
# Typography / layout
# ---------------------------------------------------------------------------
[theme]
font_family = '"Helvetica Neue", Helvetica, Arial, sans-serif'
font_size = "15px"
line_height = "1.5"
max_width = "560px"

# ---------------------------------------------------------------------------
# Colors - Light mode (prefers-color-scheme: light)
# ---------------------------------------------------------------------------
[colors.light]
background = "#fbfbfa"
text = "#1f1f1e"
text_muted = "#9c9c9b"    # Section headers, periods, captions, dimmed content
border = "#e6e6e4"
link = "#1f1f1e"
link_hover = "#000000"

# ---------------------------------------------------------------------------
# Colors - Dark mode (prefers-color-scheme: dark)
# ---------------------------------------------------------------------------
[colors.dark]
background = "#141414"
text = "#ececea"
text_muted = "#7d7d7b"
border = "#2a2a29"
link = "#ececea"
link_hover = "#ffffff"
"##
}

/// Generate CSS custom properties from color config.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        r#":root {{
    --portfolio-bg: {light_bg};
    --portfolio-text: {light_text};
    --portfolio-text-muted: {light_text_muted};
    --portfolio-border: {light_border};
    --portfolio-link: {light_link};
    --portfolio-link-hover: {light_link_hover};
}}

@media (prefers-color-scheme: dark) {{
    :root {{
        --portfolio-bg: {dark_bg};
        --portfolio-text: {dark_text};
        --portfolio-text-muted: {dark_text_muted};
        --portfolio-border: {dark_border};
        --portfolio-link: {dark_link};
        --portfolio-link-hover: {dark_link_hover};
    }}
}}"#,
        light_bg = colors.light.background,
        light_text = colors.light.text,
        light_text_muted = colors.light.text_muted,
        light_border = colors.light.border,
        light_link = colors.light.link,
        light_link_hover = colors.light.link_hover,
        dark_bg = colors.dark.background,
        dark_text = colors.dark.text,
        dark_text_muted = colors.dark.text_muted,
        dark_border = colors.dark.border,
        dark_link = colors.dark.link,
        dark_link_hover = colors.dark.link_hover,
    )
}

/// Generate CSS custom properties from theme and typewriter config.
pub fn generate_theme_css(theme: &ThemeConfig, typewriter: &TypewriterConfig) -> String {
    format!(
        r#":root {{
    --portfolio-font-family: {font_family};
    --portfolio-font-size: {font_size};
    --portfolio-line-height: {line_height};
    --portfolio-max-width: {max_width};
    --typewriter-speed: {speed};
    --typewriter-delay: {delay};
}}"#,
        font_family = theme.font_family,
        font_size = theme.font_size,
        line_height = theme.line_height,
        max_width = theme.max_width,
        speed = typewriter.speed_ms,
        delay = typewriter.delay_ms,
    )
}
