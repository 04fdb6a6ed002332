//! core::config::schema
//!
//! Configuration schema types.
//!
//! The global file and the project file share one schema; the project file
//! overrides the global one field by field.
//!
//! # Validation
//!
//! Values are validated after parsing: `input_format` must name a known
//! format and `kinds` may only list exportable kinds.

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::core::types::{InputFormat, MetadataKind};

/// One configuration file.
///
/// # Example
///
/// ```toml
/// input_format = "auto"
/// kinds = ["Catalog", "CommonModule"]
///
/// [export]
/// modules = true
/// form_definitions = true
/// strict = false
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    /// `auto`, `container` or `intermediate`
    pub input_format: Option<String>,

    /// Kinds to export
    pub kinds: Option<Vec<String>>,

    /// Export defaults
    pub export: Option<ExportDefaults>,
}

impl ConfigFile {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(format) = &self.input_format {
            format
                .parse::<InputFormat>()
                .map_err(|e| ConfigError::InvalidValue(format!("input_format: {e}")))?;
        }
        if let Some(kinds) = &self.kinds {
            for kind in kinds {
                parse_exportable(kind)?;
            }
        }
        Ok(())
    }

    pub(super) fn input_format(&self) -> Option<InputFormat> {
        self.input_format.as_deref().and_then(|f| f.parse().ok())
    }

    pub(super) fn kinds(&self) -> Option<Vec<MetadataKind>> {
        self.kinds
            .as_ref()
            .map(|kinds| kinds.iter().filter_map(|k| parse_exportable(k).ok()).collect())
    }
}

/// Parse a kind name that may be exported on its own.
pub fn parse_exportable(name: &str) -> Result<MetadataKind, ConfigError> {
    let kind: MetadataKind = name
        .parse()
        .map_err(|e| ConfigError::InvalidValue(format!("kinds: {e}")))?;
    if !kind.is_exportable() {
        return Err(ConfigError::InvalidValue(format!(
            "kinds: '{kind}' is not exportable, must be one of: {}",
            MetadataKind::EXPORTABLE.map(MetadataKind::as_str).join(", ")
        )));
    }
    Ok(kind)
}

/// `[export]` table.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ExportDefaults {
    /// Write module text files
    pub modules: Option<bool>,

    /// Write embedded form definitions
    pub form_definitions: Option<bool>,

    /// Fail the run when anything was skipped
    pub strict: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ConfigFile::default();
        assert!(config.input_format.is_none());
        assert!(config.kinds.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn valid_values() {
        let config = ConfigFile {
            input_format: Some("container".to_string()),
            kinds: Some(vec!["Catalog".to_string(), "commonmodule".to_string()]),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.input_format(), Some(InputFormat::Container));
        assert_eq!(
            config.kinds(),
            Some(vec![MetadataKind::Catalog, MetadataKind::CommonModule])
        );
    }

    #[test]
    fn invalid_format() {
        let config = ConfigFile {
            input_format: Some("zip".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn non_exportable_kind_rejected() {
        let config = ConfigFile {
            kinds: Some(vec!["CatalogForm".to_string()]),
            ..Default::default()
        };
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("not exportable"), "{err}");
    }

    #[test]
    fn reject_unknown_fields() {
        let toml = r#"
            input_format = "auto"
            unknown_field = true
        "#;
        let result: Result<ConfigFile, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn roundtrip() {
        let config = ConfigFile {
            input_format: Some("intermediate".to_string()),
            kinds: Some(vec!["Catalog".to_string()]),
            export: Some(ExportDefaults {
                modules: Some(false),
                form_definitions: Some(true),
                strict: Some(true),
            }),
        };
        let toml = toml::to_string_pretty(&config).unwrap();
        let parsed: ConfigFile = toml::from_str(&toml).unwrap();
        assert_eq!(config, parsed);
    }
}
