//! Entity Types - Declared kinds of graph nodes
//!
//! An `EntityType` is the static half of a model: its identity, primary key
//! name, label configuration and the legacy table-like name kept for
//! backward compatibility with table-based models.

use serde::{Deserialize, Serialize};

/// Explicit label configuration for an entity type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LabelConfig {
    /// Ordered label list, used verbatim when non-empty
    List(Vec<String>),
    /// Joined label string such as `User:Fan`
    Joined(String),
}

impl From<&str> for LabelConfig {
    fn from(value: &str) -> Self {
        LabelConfig::Joined(value.to_string())
    }
}

impl From<String> for LabelConfig {
    fn from(value: String) -> Self {
        LabelConfig::Joined(value)
    }
}

impl From<Vec<String>> for LabelConfig {
    fn from(value: Vec<String>) -> Self {
        LabelConfig::List(value)
    }
}

impl From<Vec<&str>> for LabelConfig {
    fn from(value: Vec<&str>) -> Self {
        LabelConfig::List(value.into_iter().map(str::to_string).collect())
    }
}

impl LabelConfig {
    /// True when the configuration carries nothing usable
    pub fn is_empty(&self) -> bool {
        match self {
            LabelConfig::List(labels) => labels.is_empty(),
            LabelConfig::Joined(label) => label.is_empty(),
        }
    }
}

/// A declared kind of node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityType {
    identity: String,
    primary_key: String,
    label: Option<LabelConfig>,
    table: Option<String>,
    timestamps: Option<bool>,
}

impl EntityType {
    /// Create an entity type from its fully-qualified identity
    /// (`App::Models::User`). The primary key defaults to `id`.
    pub fn new(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            primary_key: "id".to_string(),
            label: None,
            table: None,
            timestamps: None,
        }
    }

    /// Create an entity type whose identity is the Rust type path of `T`
    pub fn of<T: ?Sized>() -> Self {
        Self::new(std::any::type_name::<T>())
    }

    pub fn with_primary_key(mut self, primary_key: impl Into<String>) -> Self {
        self.primary_key = primary_key.into();
        self
    }

    pub fn with_label(mut self, label: impl Into<LabelConfig>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Legacy table-like name, consulted when no label is configured
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    pub fn with_timestamps(mut self, timestamps: bool) -> Self {
        self.timestamps = Some(timestamps);
        self
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Last segment of the identity (`User` for `App::Models::User`)
    pub fn short_name(&self, namespace_separator: &str) -> &str {
        self.identity
            .rsplit(namespace_separator)
            .next()
            .unwrap_or(&self.identity)
    }

    pub fn primary_key_name(&self) -> &str {
        &self.primary_key
    }

    pub fn label(&self) -> Option<&LabelConfig> {
        self.label.as_ref()
    }

    pub fn set_label(&mut self, label: impl Into<LabelConfig>) {
        self.label = Some(label.into());
    }

    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }

    /// Explicit timestamp setting; `None` defers to the registry default
    pub fn timestamps(&self) -> Option<bool> {
        self.timestamps
    }
}
