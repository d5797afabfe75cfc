//! Model layer configuration
//!
//! Naming conventions used while resolving labels and relationships, plus the
//! timestamp format written on save. Loaded from the environment or built
//! from `Default`.

use std::env;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Invalid configuration value for {field}: '{value}', expected {expected}")]
    InvalidValue {
        field: String,
        value: String,
        expected: String,
    },
}

/// Conventions shared by every entity type in a registry
#[derive(Debug, Clone, PartialEq)]
pub struct OrmConfig {
    /// Separator used in legacy joined label strings (`User:Fan`)
    pub label_separator: char,
    /// Separator stripped from type identities when they become labels
    pub namespace_separator: String,
    /// Suffix appended to a morph name to get its type column
    pub morph_type_suffix: String,
    /// `chrono` format string for stored timestamps
    pub date_format: String,
    /// Whether newly registered entity types maintain timestamps
    pub timestamps_by_default: bool,
}

impl Default for OrmConfig {
    fn default() -> Self {
        Self {
            label_separator: ':',
            namespace_separator: "::".to_string(),
            morph_type_suffix: "_type".to_string(),
            date_format: "%Y-%m-%d %H:%M:%S".to_string(),
            timestamps_by_default: false,
        }
    }
}

impl OrmConfig {
    /// Load configuration from `GRAPH_ORM_*` environment variables, falling
    /// back to defaults for anything unset
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(separator) = env::var("GRAPH_ORM_LABEL_SEPARATOR") {
            let mut chars = separator.chars();
            config.label_separator = match (chars.next(), chars.next()) {
                (Some(c), None) => c,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        field: "label_separator".to_string(),
                        value: separator,
                        expected: "a single character".to_string(),
                    })
                }
            };
        }

        if let Ok(separator) = env::var("GRAPH_ORM_NAMESPACE_SEPARATOR") {
            config.namespace_separator = separator;
        }

        if let Ok(suffix) = env::var("GRAPH_ORM_MORPH_TYPE_SUFFIX") {
            config.morph_type_suffix = suffix;
        }

        if let Ok(format) = env::var("GRAPH_ORM_DATE_FORMAT") {
            config.date_format = format;
        }

        if let Ok(flag) = env::var("GRAPH_ORM_TIMESTAMPS") {
            config.timestamps_by_default = flag.parse().map_err(|_| ConfigError::InvalidValue {
                field: "timestamps_by_default".to_string(),
                value: flag,
                expected: "true or false".to_string(),
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.label_separator.is_whitespace() || self.label_separator.is_alphanumeric() {
            return Err(ConfigError::InvalidValue {
                field: "label_separator".to_string(),
                value: self.label_separator.to_string(),
                expected: "a punctuation character".to_string(),
            });
        }

        let required = [
            ("namespace_separator", &self.namespace_separator),
            ("morph_type_suffix", &self.morph_type_suffix),
            ("date_format", &self.date_format),
        ];
        for (field, value) in required {
            if value.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    value: String::new(),
                    expected: "a non-empty string".to_string(),
                });
            }
        }

        Ok(())
    }
}
