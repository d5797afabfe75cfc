//! Relationships - Resolving declarative definitions into graph relationships
//!
//! Definitions flow through call-site inference and the label resolver into
//! one builder per shape, which returns an immutable descriptor with a query
//! scoped to the related type.

pub mod builders;
pub mod call_site;
pub mod definitions;
pub mod descriptor;
pub mod eager;

pub use call_site::CallSite;
pub use definitions::RelationSpec;
pub use descriptor::{Cardinality, RelatedTarget, RelationKind, RelationshipDescriptor};
