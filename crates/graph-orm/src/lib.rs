//! # graph-orm: Graph database models for elif.rs
//!
//! Maps entity types onto labelled nodes and resolves declarative
//! relationship definitions into typed edge traversals: edge type,
//! direction, join keys, cardinality and a query scoped to the related type.
//!
//! Storage is reached only through the `GraphConnection` trait and its
//! `Grammar`; `CypherGrammar` is provided.

pub mod config;
pub mod error;
pub mod event_error;
pub mod events;
pub mod model;
pub mod observers;
pub mod query;
pub mod registry;
pub mod relationships;

// Re-export core traits and types
pub use config::{ConfigError, OrmConfig};
pub use error::*;
pub use event_error::EventError;
pub use events::{ModelEvent, ModelObserver};
pub use model::*;
pub use observers::ObserverRegistry;
pub use query::*;
pub use registry::ModelRegistry;
pub use relationships::{
    CallSite, Cardinality, RelatedTarget, RelationKind, RelationSpec, RelationshipDescriptor,
};
