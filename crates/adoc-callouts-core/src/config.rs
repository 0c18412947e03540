//! Conversion settings
//!
//! Read from `adoc-callouts.toml`; every field has a default so a partial
//! file, or none at all, is fine.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ConfigError, Result};
use crate::explanation::DEFAULT_THREE_COLUMN_TEMPLATE;
use crate::render::{Format, DEFAULT_LEAD_IN};

pub use crate::render::DEFAULT_MAX_COMMENT_LENGTH;

/// Default settings file name, looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "adoc-callouts.toml";

/// Top-level settings structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    /// Output settings
    pub convert: ConvertSettings,
    /// Explanation parsing settings
    pub explanations: ExplanationSettings,
}

impl Settings {
    /// Parse settings from a TOML string
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(toml_str)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "settings loaded");
        Self::from_toml_str(&content)
    }

    /// Load `adoc-callouts.toml` from a directory, defaults when absent
    pub fn discover(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        if path.is_file() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if self.convert.max_comment_length == 0 {
            return Err(ConfigError::InvalidValue {
                field: "convert.max_comment_length",
                reason: "must be greater than zero".to_string(),
            });
        }
        let template = &self.explanations.three_column_template;
        if !template.contains("{value}") && !template.contains("{description}") {
            return Err(ConfigError::InvalidValue {
                field: "explanations.three_column_template",
                reason: "must contain {value} or {description}".to_string(),
            });
        }
        Ok(())
    }
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertSettings {
    /// Output format
    pub format: Format,
    /// Longest inline comment before falling back to a definition list
    pub max_comment_length: usize,
    /// Line introducing list output (empty for none)
    pub lead_in: String,
}

impl Default for ConvertSettings {
    fn default() -> Self {
        Self {
            format: Format::default(),
            max_comment_length: DEFAULT_MAX_COMMENT_LENGTH,
            lead_in: DEFAULT_LEAD_IN.to_string(),
        }
    }
}

/// Explanation parsing configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplanationSettings {
    /// Phrasing of three-column table rows, with `{value}` and
    /// `{description}` placeholders
    pub three_column_template: String,
}

impl Default for ExplanationSettings {
    fn default() -> Self {
        Self {
            three_column_template: DEFAULT_THREE_COLUMN_TEMPLATE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.convert.format, Format::Deflist);
        assert_eq!(settings.convert.max_comment_length, 120);
        assert_eq!(settings.convert.lead_in, "where:");
        assert_eq!(
            settings.explanations.three_column_template,
            "Refers to `{value}`. {description}"
        );
    }

    #[test]
    fn test_empty_toml_gives_defaults() {
        assert_eq!(Settings::from_toml_str("").unwrap(), Settings::default());
    }

    #[test]
    fn test_partial_toml() {
        let settings = Settings::from_toml_str(
            r#"
[convert]
format = "comments"
max_comment_length = 80
"#,
        )
        .unwrap();
        assert_eq!(settings.convert.format, Format::Comments);
        assert_eq!(settings.convert.max_comment_length, 80);
        assert_eq!(settings.convert.lead_in, "where:");
    }

    #[test]
    fn test_unknown_format_is_parse_error() {
        let err = Settings::from_toml_str("[convert]\nformat = \"table\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_invalid_values() {
        let err = Settings::from_toml_str("[convert]\nmax_comment_length = 0\n").unwrap_err();
        assert!(err.to_string().contains("convert.max_comment_length"));

        let err =
            Settings::from_toml_str("[explanations]\nthree_column_template = \"static\"\n")
                .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Settings::load(Path::new("/nonexistent/adoc-callouts.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_discover_without_file() {
        let settings = Settings::discover(Path::new("/nonexistent-dir")).unwrap();
        assert_eq!(settings, Settings::default());
    }
}
