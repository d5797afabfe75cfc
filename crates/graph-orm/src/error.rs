//! Error types for the graph model layer
//!
//! Relationship resolution, query compilation and persistence all report
//! through `ModelError`.

use std::fmt;

/// Result type alias for model operations
pub type ModelResult<T> = Result<T, ModelError>;

/// Error types for graph model operations
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    /// Related (or role) entity type is not registered and cannot be instantiated
    UnresolvableRelatedType(String),
    /// Relationship definition is missing or malformed
    Relationship(String),
    /// Query building error
    Query(String),
    /// Error reported by the graph connection
    Database(String),
    /// Observer failed while handling a lifecycle notification
    Event(String),
    /// Configuration error
    Configuration(String),
    /// Primary key is missing or invalid
    MissingPrimaryKey,
    /// Serialization/deserialization error
    Serialization(String),
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::UnresolvableRelatedType(identity) => {
                write!(f, "Cannot resolve related entity type '{}'", identity)
            }
            ModelError::Relationship(msg) => write!(f, "Relationship error: {}", msg),
            ModelError::Query(msg) => write!(f, "Query error: {}", msg),
            ModelError::Database(msg) => write!(f, "Database error: {}", msg),
            ModelError::Event(msg) => write!(f, "Event error: {}", msg),
            ModelError::Configuration(msg) => write!(f, "Configuration error: {}", msg),
            ModelError::MissingPrimaryKey => write!(f, "Primary key is missing or invalid"),
            ModelError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for ModelError {}

impl From<serde_json::Error> for ModelError {
    fn from(err: serde_json::Error) -> Self {
        ModelError::Serialization(err.to_string())
    }
}

impl From<crate::event_error::EventError> for ModelError {
    fn from(err: crate::event_error::EventError) -> Self {
        ModelError::Event(err.to_string())
    }
}

impl From<crate::config::ConfigError> for ModelError {
    fn from(err: crate::config::ConfigError) -> Self {
        ModelError::Configuration(err.to_string())
    }
}
