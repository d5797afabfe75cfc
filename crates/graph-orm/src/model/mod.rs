//! Model - Entity types, label resolution and node records

pub mod entity;
pub mod labels;
pub mod node;
pub mod persistence;

pub use entity::{EntityType, LabelConfig};
pub use labels::resolve_labels;
pub use node::{Node, CREATED_AT, UPDATED_AT};
