//! Relationship Definitions - Declarative accessor → relationship specs
//!
//! A `RelationSpec` records the explicit arguments of one relationship
//! definition. Specs are registered once per entity type and resolved into a
//! descriptor each time the accessor is used, with a fresh call site.

use serde::{Deserialize, Serialize};

use super::builders;
use super::call_site::CallSite;
use super::descriptor::RelationshipDescriptor;
use crate::error::ModelResult;
use crate::model::Node;

/// Explicit arguments of a relationship definition; `None` fields are
/// inferred when the definition is resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum RelationSpec {
    BelongsTo {
        related: String,
        #[serde(default)]
        foreign_key: Option<String>,
        #[serde(default)]
        other_key: Option<String>,
        #[serde(default)]
        relation: Option<String>,
    },
    HasOne {
        related: String,
        #[serde(default)]
        foreign_key: Option<String>,
        #[serde(default)]
        other_key: Option<String>,
        #[serde(default)]
        relation: Option<String>,
    },
    HasMany {
        related: String,
        #[serde(default)]
        edge_type: Option<String>,
        #[serde(default)]
        key: Option<String>,
        #[serde(default)]
        relation: Option<String>,
    },
    BelongsToMany {
        related: String,
        #[serde(default)]
        edge_type: Option<String>,
        #[serde(default)]
        key: Option<String>,
        #[serde(default)]
        relation: Option<String>,
    },
    HyperMorph {
        role: String,
        related: String,
        #[serde(default)]
        edge_type: Option<String>,
        #[serde(default)]
        morph_type: Option<String>,
        #[serde(default)]
        relation: Option<String>,
        #[serde(default)]
        key: Option<String>,
    },
    MorphMany {
        related: String,
        morph_name: String,
        #[serde(default)]
        edge_type: Option<String>,
        #[serde(default)]
        key: Option<String>,
        #[serde(default)]
        relation: Option<String>,
    },
    MorphedByOne {
        related: String,
        edge_type: String,
        #[serde(default)]
        key: Option<String>,
        #[serde(default)]
        relation: Option<String>,
    },
    MorphTo {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        edge_type: Option<String>,
        #[serde(default)]
        key: Option<String>,
    },
}

impl RelationSpec {
    pub fn belongs_to(related: impl Into<String>) -> Self {
        RelationSpec::BelongsTo {
            related: related.into(),
            foreign_key: None,
            other_key: None,
            relation: None,
        }
    }

    pub fn has_one(related: impl Into<String>) -> Self {
        RelationSpec::HasOne {
            related: related.into(),
            foreign_key: None,
            other_key: None,
            relation: None,
        }
    }

    pub fn has_many(related: impl Into<String>) -> Self {
        RelationSpec::HasMany {
            related: related.into(),
            edge_type: None,
            key: None,
            relation: None,
        }
    }

    pub fn belongs_to_many(related: impl Into<String>) -> Self {
        RelationSpec::BelongsToMany {
            related: related.into(),
            edge_type: None,
            key: None,
            relation: None,
        }
    }

    pub fn hyper_morph(role: impl Into<String>, related: impl Into<String>) -> Self {
        RelationSpec::HyperMorph {
            role: role.into(),
            related: related.into(),
            edge_type: None,
            morph_type: None,
            relation: None,
            key: None,
        }
    }

    pub fn morph_many(related: impl Into<String>, morph_name: impl Into<String>) -> Self {
        RelationSpec::MorphMany {
            related: related.into(),
            morph_name: morph_name.into(),
            edge_type: None,
            key: None,
            relation: None,
        }
    }

    pub fn morphed_by_one(related: impl Into<String>, edge_type: impl Into<String>) -> Self {
        RelationSpec::MorphedByOne {
            related: related.into(),
            edge_type: edge_type.into(),
            key: None,
            relation: None,
        }
    }

    pub fn morph_to() -> Self {
        RelationSpec::MorphTo {
            name: None,
            edge_type: None,
            key: None,
        }
    }

    /// Set the edge type on shapes that take one; on the one-to-one shapes
    /// this is the foreign key the edge is named after, on `morph_to` the
    /// discriminator property
    pub fn with_edge_type(mut self, value: impl Into<String>) -> Self {
        let value = value.into();
        match &mut self {
            RelationSpec::BelongsTo { foreign_key, .. } | RelationSpec::HasOne { foreign_key, .. } => {
                *foreign_key = Some(value)
            }
            RelationSpec::HasMany { edge_type, .. }
            | RelationSpec::BelongsToMany { edge_type, .. }
            | RelationSpec::HyperMorph { edge_type, .. }
            | RelationSpec::MorphMany { edge_type, .. }
            | RelationSpec::MorphTo { edge_type, .. } => *edge_type = Some(value),
            RelationSpec::MorphedByOne { edge_type, .. } => *edge_type = value,
        }
        self
    }

    /// Set the owner-side key (`other_key` on the one-to-one shapes)
    pub fn with_key(mut self, value: impl Into<String>) -> Self {
        let value = Some(value.into());
        match &mut self {
            RelationSpec::BelongsTo { other_key, .. } | RelationSpec::HasOne { other_key, .. } => *other_key = value,
            RelationSpec::HasMany { key, .. }
            | RelationSpec::BelongsToMany { key, .. }
            | RelationSpec::HyperMorph { key, .. }
            | RelationSpec::MorphMany { key, .. }
            | RelationSpec::MorphedByOne { key, .. }
            | RelationSpec::MorphTo { key, .. } => *key = value,
        }
        self
    }

    /// Set the relation name; for `morph_to` this is the morph name
    pub fn with_relation(mut self, value: impl Into<String>) -> Self {
        let value = Some(value.into());
        match &mut self {
            RelationSpec::BelongsTo { relation, .. }
            | RelationSpec::HasOne { relation, .. }
            | RelationSpec::HasMany { relation, .. }
            | RelationSpec::BelongsToMany { relation, .. }
            | RelationSpec::HyperMorph { relation, .. }
            | RelationSpec::MorphMany { relation, .. }
            | RelationSpec::MorphedByOne { relation, .. } => *relation = value,
            RelationSpec::MorphTo { name, .. } => *name = value,
        }
        self
    }

    pub fn with_morph_type(mut self, value: impl Into<String>) -> Self {
        if let RelationSpec::HyperMorph { morph_type, .. } = &mut self {
            *morph_type = Some(value.into());
        }
        self
    }

    /// Build the descriptor for `owner`
    pub(crate) fn resolve(&self, owner: &Node, site: CallSite) -> ModelResult<RelationshipDescriptor> {
        match self {
            RelationSpec::BelongsTo {
                related,
                foreign_key,
                other_key,
                relation,
            } => builders::belongs_to(
                owner,
                site,
                related,
                foreign_key.as_deref(),
                other_key.as_deref(),
                relation.as_deref(),
            ),
            RelationSpec::HasOne {
                related,
                foreign_key,
                other_key,
                relation,
            } => builders::has_one(
                owner,
                site,
                related,
                foreign_key.as_deref(),
                other_key.as_deref(),
                relation.as_deref(),
            ),
            RelationSpec::HasMany {
                related,
                edge_type,
                key,
                relation,
            } => builders::has_many(owner, site, related, edge_type.as_deref(), key.as_deref(), relation.as_deref()),
            RelationSpec::BelongsToMany {
                related,
                edge_type,
                key,
                relation,
            } => builders::belongs_to_many(owner, site, related, edge_type.as_deref(), key.as_deref(), relation.as_deref()),
            RelationSpec::HyperMorph {
                role,
                related,
                edge_type,
                morph_type,
                relation,
                key,
            } => builders::hyper_morph(
                owner,
                site,
                role,
                related,
                edge_type.as_deref(),
                morph_type.as_deref(),
                relation.as_deref(),
                key.as_deref(),
            ),
            RelationSpec::MorphMany {
                related,
                morph_name,
                edge_type,
                key,
                relation,
            } => builders::morph_many(
                owner,
                site,
                related,
                morph_name,
                edge_type.as_deref(),
                key.as_deref(),
                relation.as_deref(),
            ),
            RelationSpec::MorphedByOne {
                related,
                edge_type,
                key,
                relation,
            } => builders::morphed_by_one(owner, site, related, edge_type, key.as_deref(), relation.as_deref()),
            RelationSpec::MorphTo { name, edge_type, key } => {
                builders::morph_to(owner, site, name.as_deref(), edge_type.as_deref(), key.as_deref())
            }
        }
    }
}
