//! Relationship Descriptor - Fully resolved relationship between two node types
//!
//! A descriptor is built once per definition call and never mutated. It
//! carries everything needed to load the related nodes: the edge type, the
//! traversal direction, the keys anchoring the edge on both sides and a query
//! scoped to the related type. A forward polymorphic relation whose stored
//! discriminator is still unset carries a pending target instead of a query.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::ModelResult;
use crate::model::{EntityType, Node};
use crate::query::{Direction, NodeQuery};
use crate::registry::ModelRegistry;

/// Cardinality tag fixed at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Cardinality {
    OneToOne,
    OneToMany,
    ManyToMany,
    PolymorphicInverse,
    PolymorphicForward,
    Hyper,
}

impl Cardinality {
    pub fn is_polymorphic(self) -> bool {
        matches!(self, Self::PolymorphicInverse | Self::PolymorphicForward)
    }

    /// Returns true if loading yields a collection
    pub fn is_collection(self) -> bool {
        matches!(self, Self::OneToMany | Self::ManyToMany | Self::Hyper)
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Cardinality::OneToOne => "ONE_TO_ONE",
            Cardinality::OneToMany => "ONE_TO_MANY",
            Cardinality::ManyToMany => "MANY_TO_MANY",
            Cardinality::PolymorphicInverse => "POLYMORPHIC_INVERSE",
            Cardinality::PolymorphicForward => "POLYMORPHIC_FORWARD",
            Cardinality::Hyper => "HYPER",
        };
        write!(f, "{}", tag)
    }
}

/// Relationship shape plus the data only that shape carries
#[derive(Debug, Clone)]
pub enum RelationKind {
    BelongsTo,
    HasOne,
    HasMany,
    BelongsToMany,
    MorphMany {
        morph_name: String,
    },
    MorphedByOne,
    MorphTo {
        /// Owner property holding the related type identity
        morph_type: String,
    },
    /// Edge associated with a third, role node
    HyperMorph {
        role: Arc<EntityType>,
        role_query: NodeQuery,
        morph_type: Option<String>,
    },
}

impl RelationKind {
    pub fn cardinality(&self) -> Cardinality {
        match self {
            RelationKind::BelongsTo | RelationKind::HasOne => Cardinality::OneToOne,
            RelationKind::HasMany => Cardinality::OneToMany,
            RelationKind::BelongsToMany => Cardinality::ManyToMany,
            RelationKind::MorphMany { .. } | RelationKind::MorphedByOne => Cardinality::PolymorphicInverse,
            RelationKind::MorphTo { .. } => Cardinality::PolymorphicForward,
            RelationKind::HyperMorph { .. } => Cardinality::Hyper,
        }
    }

    /// Edge direction from the owner's point of view
    pub fn direction(&self) -> Direction {
        match self {
            RelationKind::BelongsTo | RelationKind::MorphedByOne | RelationKind::MorphTo { .. } => {
                Direction::Incoming
            }
            _ => Direction::Outgoing,
        }
    }

    /// The owner is the referencing side of the edge
    pub fn is_inverse(&self) -> bool {
        matches!(self, RelationKind::BelongsTo | RelationKind::MorphedByOne)
    }

    /// Loading yields at most one related node
    pub fn is_single(&self) -> bool {
        matches!(
            self,
            RelationKind::BelongsTo | RelationKind::HasOne | RelationKind::MorphedByOne | RelationKind::MorphTo { .. }
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            RelationKind::BelongsTo => "belongsTo",
            RelationKind::HasOne => "hasOne",
            RelationKind::HasMany => "hasMany",
            RelationKind::BelongsToMany => "belongsToMany",
            RelationKind::MorphMany { .. } => "morphMany",
            RelationKind::MorphedByOne => "morphedByOne",
            RelationKind::MorphTo { .. } => "morphTo",
            RelationKind::HyperMorph { .. } => "hyperMorph",
        }
    }
}

/// Related side of a descriptor: a concrete scoped query, or a polymorphic
/// target whose type is not known yet
#[derive(Debug, Clone)]
pub enum RelatedTarget {
    Resolved(NodeQuery),
    Pending,
}

#[derive(Debug, Clone)]
pub struct RelationshipDescriptor {
    pub(crate) kind: RelationKind,
    pub(crate) relation: String,
    pub(crate) edge_type: String,
    pub(crate) direction: Direction,
    pub(crate) owner_key: String,
    pub(crate) related_key: Option<String>,
    pub(crate) owner: Arc<EntityType>,
    pub(crate) owner_labels: Vec<String>,
    pub(crate) registry: ModelRegistry,
    pub(crate) target: RelatedTarget,
}

impl RelationshipDescriptor {
    pub fn kind(&self) -> &RelationKind {
        &self.kind
    }

    pub fn cardinality(&self) -> Cardinality {
        self.kind.cardinality()
    }

    /// Accessor name callers use for this relationship
    pub fn relation(&self) -> &str {
        &self.relation
    }

    /// Upper-cased edge type; never empty
    pub fn edge_type(&self) -> &str {
        &self.edge_type
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn owner_key(&self) -> &str {
        &self.owner_key
    }

    pub fn related_key(&self) -> Option<&str> {
        self.related_key.as_deref()
    }

    pub fn owner(&self) -> &EntityType {
        &self.owner
    }

    pub fn owner_labels(&self) -> &[String] {
        &self.owner_labels
    }

    pub fn target(&self) -> &RelatedTarget {
        &self.target
    }

    /// Scoped query over the related type, `None` while the polymorphic
    /// target is pending
    pub fn related_query(&self) -> Option<&NodeQuery> {
        match &self.target {
            RelatedTarget::Resolved(query) => Some(query),
            RelatedTarget::Pending => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.target, RelatedTarget::Pending)
    }

    /// Query over the role type of a hyper edge
    pub fn role_query(&self) -> Option<&NodeQuery> {
        match &self.kind {
            RelationKind::HyperMorph { role_query, .. } => Some(role_query),
            _ => None,
        }
    }

    /// Owner property whose value constrains the owning end of the edge.
    /// The inverse one-to-one shape stores its edge type as owner key, so it
    /// anchors on the owner's primary key instead.
    pub fn anchor_key(&self) -> &str {
        match self.kind {
            RelationKind::BelongsTo => self.owner.primary_key_name(),
            _ => &self.owner_key,
        }
    }

    /// Load the related nodes of the owner this descriptor was built for
    pub async fn get(&self) -> ModelResult<Vec<Node>> {
        match &self.target {
            RelatedTarget::Resolved(query) => query.get().await,
            RelatedTarget::Pending => {
                tracing::debug!(
                    "Relationship '{}' on {} has no related type yet, nothing to load",
                    self.relation,
                    self.owner.identity()
                );
                Ok(Vec::new())
            }
        }
    }

    /// First related node, for single-valued shapes
    pub async fn first(&self) -> ModelResult<Option<Node>> {
        Ok(self.get().await?.into_iter().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cardinality_tags() {
        assert_eq!(Cardinality::OneToOne.to_string(), "ONE_TO_ONE");
        assert_eq!(Cardinality::PolymorphicForward.to_string(), "POLYMORPHIC_FORWARD");
        assert_eq!(
            serde_json::to_string(&Cardinality::ManyToMany).unwrap(),
            "\"MANY_TO_MANY\""
        );
        assert!(Cardinality::PolymorphicInverse.is_polymorphic());
        assert!(!Cardinality::OneToOne.is_collection());
    }

    #[test]
    fn test_kind_direction_and_cardinality() {
        assert_eq!(RelationKind::BelongsTo.direction(), Direction::Incoming);
        assert_eq!(RelationKind::HasMany.direction(), Direction::Outgoing);
        assert_eq!(
            RelationKind::MorphTo { morph_type: "imageable_type".into() }.direction(),
            Direction::Incoming
        );
        assert_eq!(
            RelationKind::MorphMany { morph_name: "imageable".into() }.cardinality(),
            Cardinality::PolymorphicInverse
        );
        assert!(RelationKind::MorphedByOne.is_inverse());
        assert!(!RelationKind::HasOne.is_inverse());
        assert!(RelationKind::HasOne.is_single());
        assert!(!RelationKind::BelongsToMany.is_single());
    }
}
