use crate::config::{LanguageRule, RuleSet};
use crate::scan::ScanError;
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;

/// Top-level configuration document.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub languages: Vec<LanguageEntry>,
    /// Globs, relative to the scanned directory, for files to leave out.
    #[serde(default)]
    pub exclude: Vec<String>,
}

/// A single entry of the `languages` list.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LanguageEntry {
    pub name: String,
    #[serde(default)]
    pub file_extensions: Vec<String>,
    #[serde(default)]
    pub ignore_extensions: Vec<String>,
    pub single_line_comment: String,
    pub multi_line_comment_start: Option<String>,
    pub multi_line_comment_end: Option<String>,
    #[serde(default)]
    pub ignore_patterns: Vec<String>,
    pub density_threshold: Option<f64>,
    #[serde(default)]
    pub method_specific_comments: Vec<String>,
}

impl LanguageEntry {
    /// Convert to the core `LanguageRule` type.
    pub fn to_language_rule(&self) -> LanguageRule {
        LanguageRule {
            name: self.name.clone(),
            file_extensions: self.file_extensions.clone(),
            ignore_extensions: self.ignore_extensions.clone(),
            single_line_comment: self.single_line_comment.clone(),
            multi_line_comment_start: self.multi_line_comment_start.clone(),
            multi_line_comment_end: self.multi_line_comment_end.clone(),
            ignore_patterns: self.ignore_patterns.clone(),
            density_threshold: self.density_threshold,
            method_specific_comments: self.method_specific_comments.clone(),
        }
    }
}

impl ConfigFile {
    pub fn rule_set(&self) -> RuleSet {
        RuleSet::new(
            self.languages
                .iter()
                .map(LanguageEntry::to_language_rule)
                .collect(),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    /// `.toml` files are TOML, anything else is read as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => ConfigFormat::Toml,
            _ => ConfigFormat::Json,
        }
    }
}

#[derive(Debug)]
pub enum ConfigFormatError {
    Json(serde_json::Error),
    Toml(toml::de::Error),
}

impl fmt::Display for ConfigFormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigFormatError::Json(e) => write!(f, "{}", e),
            ConfigFormatError::Toml(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ConfigFormatError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigFormatError::Json(e) => Some(e),
            ConfigFormatError::Toml(e) => Some(e),
        }
    }
}

/// Parse configuration text and reject an empty language list.
pub fn parse_config(text: &str, format: ConfigFormat) -> Result<ConfigFile, ScanError> {
    let config: ConfigFile = match format {
        ConfigFormat::Json => serde_json::from_str(text)
            .map_err(|e| ScanError::ConfigParse(ConfigFormatError::Json(e)))?,
        ConfigFormat::Toml => toml::from_str(text)
            .map_err(|e| ScanError::ConfigParse(ConfigFormatError::Toml(e)))?,
    };

    if config.languages.is_empty() {
        return Err(ScanError::ConfigInvalid(
            "no languages configured".to_string(),
        ));
    }

    Ok(config)
}

/// Read and parse the configuration file at `path`.
pub fn load_config(path: &Path) -> Result<ConfigFile, ScanError> {
    let text = fs::read_to_string(path).map_err(ScanError::ConfigRead)?;
    let config = parse_config(&text, ConfigFormat::from_path(path))?;
    log::debug!(
        "Loaded {} language rule(s) from {}",
        config.languages.len(),
        path.display()
    );
    Ok(config)
}
