use crate::error::ConfigError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// ui-sentinel version, taken from Cargo.toml at compile time.
pub const UI_SENTINEL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Config files looked up in the project root, in priority order.
pub const CONFIG_FILE_NAMES: &[&str] = &[".uisentinel.toml", ".uisentinel.yaml", ".uisentinel.yml", ".uisentinel.json"];

static LOCALE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z]{2,3}(-[A-Za-z]{2,4})?$").unwrap());

/// Accepted case-insensitively in config files (`"aa"` reads as `AA`).
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[serde(try_from = "String")]
pub enum WcagLevel {
    A,
    #[default]
    AA,
    AAA,
}

impl FromStr for WcagLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(WcagLevel::A),
            "AA" => Ok(WcagLevel::AA),
            "AAA" => Ok(WcagLevel::AAA),
            _ => Err(ConfigError::UnknownWcagLevel(s.to_string())),
        }
    }
}

impl TryFrom<String> for WcagLevel {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for WcagLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WcagLevel::A => "A",
            WcagLevel::AA => "AA",
            WcagLevel::AAA => "AAA",
        };
        f.write_str(s)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReportingLevel {
    Minimal,
    #[default]
    Standard,
    Detailed,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Html,
    #[default]
    Markdown,
}

/// Named configuration values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Preset {
    #[default]
    Strict,
    Development,
    Migration,
}

/// Flat set of switches deciding which checks are meaningful for a run.
///
/// Field names follow the camelCase keys used in project config files
/// (`enforceWCAGCompliance`, `allowRawHTML`, ...). Missing keys take the
/// strict defaults, so a config file only lists what it relaxes.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Configuration {
    pub enforce_design_tokens: bool,
    pub enforce_semantic_components: bool,
    #[serde(rename = "enforceEnhanced8ptGrid")]
    pub enforce_enhanced_8pt_grid: bool,
    #[serde(rename = "enforceWCAGCompliance")]
    pub enforce_wcag_compliance: bool,
    pub wcag_level: WcagLevel,
    #[serde(rename = "enforceRTLSupport")]
    pub enforce_rtl_support: bool,
    pub enforce_localization: bool,
    pub supported_languages: Vec<String>,
    #[serde(rename = "allowRawHTML")]
    pub allow_raw_html: bool,
    pub allow_inline_styles: bool,
    pub allow_arbitrary_values: bool,
    pub allow_hardcoded_text: bool,
    pub allow_hardcoded_colors: bool,
    pub allow_hardcoded_spacing: bool,
    pub token_prefix: String,
    pub enforce_code_splitting: bool,
    pub max_component_size: usize,
    pub reporting_level: ReportingLevel,
    pub output_format: OutputFormat,
}

impl Default for Configuration {
    fn default() -> Self {
        Self::strict()
    }
}

impl Configuration {
    /// Everything enforced, nothing allowed.
    pub fn strict() -> Self {
        Self {
            enforce_design_tokens: true,
            enforce_semantic_components: true,
            enforce_enhanced_8pt_grid: true,
            enforce_wcag_compliance: true,
            wcag_level: WcagLevel::AA,
            enforce_rtl_support: true,
            enforce_localization: true,
            supported_languages: vec!["en".to_string(), "ar".to_string()],
            allow_raw_html: false,
            allow_inline_styles: false,
            allow_arbitrary_values: false,
            allow_hardcoded_text: false,
            allow_hardcoded_colors: false,
            allow_hardcoded_spacing: false,
            token_prefix: "ds".to_string(),
            enforce_code_splitting: true,
            max_component_size: 300,
            reporting_level: ReportingLevel::Detailed,
            output_format: OutputFormat::Markdown,
        }
    }

    /// Tokens and semantics enforced; copy and layout direction left for later.
    pub fn development() -> Self {
        Self {
            enforce_rtl_support: false,
            enforce_localization: false,
            supported_languages: vec!["en".to_string()],
            allow_hardcoded_text: true,
            enforce_code_splitting: false,
            max_component_size: 500,
            reporting_level: ReportingLevel::Standard,
            ..Self::strict()
        }
    }

    /// Legacy code being moved onto the design system: only accessibility blocks.
    pub fn migration() -> Self {
        Self {
            enforce_design_tokens: false,
            enforce_enhanced_8pt_grid: false,
            wcag_level: WcagLevel::A,
            enforce_rtl_support: false,
            enforce_localization: false,
            supported_languages: vec!["en".to_string()],
            allow_raw_html: true,
            allow_inline_styles: true,
            allow_arbitrary_values: true,
            allow_hardcoded_text: true,
            allow_hardcoded_colors: true,
            allow_hardcoded_spacing: true,
            enforce_code_splitting: false,
            max_component_size: 1000,
            reporting_level: ReportingLevel::Minimal,
            ..Self::strict()
        }
    }

    pub fn preset(preset: Preset) -> Self {
        match preset {
            Preset::Strict => Self::strict(),
            Preset::Development => Self::development(),
            Preset::Migration => Self::migration(),
        }
    }

    /// Rejects option combinations that cannot drive a meaningful run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.enforce_localization && self.supported_languages.is_empty() {
            return Err(ConfigError::EmptySupportedLanguages);
        }
        if let Some(bad) = self
            .supported_languages
            .iter()
            .find(|code| !LOCALE_RE.is_match(code))
        {
            return Err(ConfigError::InvalidLanguageCode(bad.clone()));
        }
        if self.max_component_size == 0 {
            return Err(ConfigError::InvalidMaxComponentSize);
        }
        if self.token_prefix.chars().any(char::is_whitespace) {
            return Err(ConfigError::InvalidTokenPrefix(self.token_prefix.clone()));
        }
        Ok(())
    }

    /// Formats a design token reference using the configured prefix.
    pub fn token(&self, name: &str) -> String {
        if self.token_prefix.is_empty() {
            format!("var(--{})", name)
        } else {
            format!("var(--{}-{})", self.token_prefix.trim_end_matches('-'), name)
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Configuration = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Configuration = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let config: Configuration = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a config file, picking the format from its extension.
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()).unwrap_or("") {
            "toml" => Self::from_toml_str(&content),
            "yaml" | "yml" => Self::from_yaml_str(&content),
            "json" => Self::from_json_str(&content),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Looks for one of [`CONFIG_FILE_NAMES`] in `root`. `Ok(None)` when absent.
    pub fn load(root: &Path) -> Result<Option<Self>, ConfigError> {
        match Self::find_config_file(root) {
            Some(path) => Self::load_file(&path).map(Some),
            None => Ok(None),
        }
    }

    pub fn find_config_file(root: &Path) -> Option<PathBuf> {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| root.join(name))
            .find(|p| p.is_file())
    }
}
