//! Relationship Builders - One thin constructor per relationship shape
//!
//! Every shape fills its absent arguments through the same edge resolver,
//! looks up the related type in the registry and scopes a query over it to
//! the owning node. Builders never touch the connection.

use std::sync::Arc;

use serde_json::Value;

use super::call_site::{explicit, infer_edge_type, infer_foreign_key, infer_relation_name, snake_case, CallSite};
use super::descriptor::{Cardinality, RelatedTarget, RelationKind, RelationshipDescriptor};
use crate::error::{ModelError, ModelResult};
use crate::model::labels::join_labels;
use crate::model::{EntityType, Node};
use crate::query::NodeQuery;

/// Relation name, edge type and owner key after inference
#[derive(Debug, Clone, PartialEq)]
struct EdgeResolution {
    relation: String,
    edge_type: String,
    owner_key: String,
}

/// Fill absent names for one definition call.
///
/// One-to-one shapes anchor their edge on a foreign key named after the
/// calling entity; every other shape names the edge after the relation.
/// The owner key falls back to the owner's primary key.
fn resolve_edge(
    owner: &Node,
    site: &CallSite,
    cardinality: Cardinality,
    relation: Option<&str>,
    edge_or_foreign_key: Option<&str>,
    key: Option<&str>,
) -> EdgeResolution {
    let relation = infer_relation_name(relation, site);
    let edge_type = match cardinality {
        Cardinality::OneToOne => infer_foreign_key(edge_or_foreign_key, site),
        _ => infer_edge_type(edge_or_foreign_key, &relation),
    };
    let owner_key = explicit(key).unwrap_or(owner.key_name()).to_string();

    EdgeResolution {
        relation,
        edge_type,
        owner_key,
    }
}

/// Query over `related` reached through the owner's edge, constrained to
/// this owner when its anchor property is set
fn scoped_query(owner: &Node, related: Arc<EntityType>, kind: &RelationKind, edge_type: &str, anchor: &str) -> NodeQuery {
    let mut query = NodeQuery::new(related, owner.registry().clone()).traverse(
        owner.labels(),
        edge_type,
        kind.direction(),
    );

    if let Some(value) = owner.get(anchor).filter(|v| !v.is_null()) {
        query = query.where_parent_eq(anchor, value.clone());
    }
    if kind.is_single() {
        query = query.limit(1);
    }
    query
}

fn anchor_for<'a>(owner: &'a Node, kind: &RelationKind, owner_key: &'a str) -> &'a str {
    match kind {
        RelationKind::BelongsTo => owner.key_name(),
        _ => owner_key,
    }
}

/// Assemble a descriptor with a resolved related type
fn resolved(
    owner: &Node,
    kind: RelationKind,
    edge: EdgeResolution,
    related: Arc<EntityType>,
    related_key: String,
) -> ModelResult<RelationshipDescriptor> {
    let anchor = anchor_for(owner, &kind, &edge.owner_key).to_string();
    let query = scoped_query(owner, related, &kind, &edge.edge_type, &anchor);
    finish(owner, kind, edge, Some(related_key), RelatedTarget::Resolved(query))
}

fn finish(
    owner: &Node,
    kind: RelationKind,
    edge: EdgeResolution,
    related_key: Option<String>,
    target: RelatedTarget,
) -> ModelResult<RelationshipDescriptor> {
    if edge.edge_type.is_empty() {
        return Err(ModelError::Relationship(format!(
            "Relationship '{}' on '{}' resolved to an empty edge type",
            edge.relation,
            owner.entity().identity()
        )));
    }

    let descriptor = RelationshipDescriptor {
        direction: kind.direction(),
        kind,
        relation: edge.relation,
        edge_type: edge.edge_type,
        owner_key: edge.owner_key,
        related_key,
        owner: owner.entity_arc().clone(),
        owner_labels: owner.labels(),
        registry: owner.registry().clone(),
        target,
    };

    tracing::debug!(
        "Resolved {} '{}' on {}: {} via {} ({:?})",
        descriptor.kind.name(),
        descriptor.relation,
        descriptor.owner.identity(),
        descriptor.cardinality(),
        descriptor.edge_type,
        descriptor.direction
    );

    Ok(descriptor)
}

pub fn belongs_to(
    owner: &Node,
    site: CallSite,
    related: &str,
    foreign_key: Option<&str>,
    other_key: Option<&str>,
    relation: Option<&str>,
) -> ModelResult<RelationshipDescriptor> {
    let related = owner.registry().resolve(related)?;
    let mut edge = resolve_edge(owner, &site, Cardinality::OneToOne, relation, foreign_key, None);
    // the foreign key is the owner-side key as well as the edge type
    edge.owner_key = edge.edge_type.clone();

    let other_key = explicit(other_key).unwrap_or(related.primary_key_name()).to_string();
    resolved(owner, RelationKind::BelongsTo, edge, related, other_key)
}

pub fn has_one(
    owner: &Node,
    site: CallSite,
    related: &str,
    foreign_key: Option<&str>,
    other_key: Option<&str>,
    relation: Option<&str>,
) -> ModelResult<RelationshipDescriptor> {
    let registry = owner.registry();
    let related = registry.resolve(related)?;
    let mut edge = resolve_edge(owner, &site, Cardinality::OneToOne, relation, foreign_key, other_key);

    let qualified = if edge.edge_type.contains('.') {
        edge.edge_type.clone()
    } else {
        let table = match related.table() {
            Some(table) => table.to_string(),
            None => join_labels(&registry.labels_for(&related), registry.config().label_separator),
        };
        format!("{}.{}", table, edge.edge_type)
    };
    edge.edge_type = qualified
        .rsplit('.')
        .next()
        .unwrap_or_default()
        .to_string();

    resolved(owner, RelationKind::HasOne, edge, related, qualified)
}

pub fn has_many(
    owner: &Node,
    site: CallSite,
    related: &str,
    edge_type: Option<&str>,
    key: Option<&str>,
    relation: Option<&str>,
) -> ModelResult<RelationshipDescriptor> {
    let related = owner.registry().resolve(related)?;
    let edge = resolve_edge(owner, &site, Cardinality::OneToMany, relation, edge_type, key);
    let related_key = related.primary_key_name().to_string();
    resolved(owner, RelationKind::HasMany, edge, related, related_key)
}

pub fn belongs_to_many(
    owner: &Node,
    site: CallSite,
    related: &str,
    edge_type: Option<&str>,
    key: Option<&str>,
    relation: Option<&str>,
) -> ModelResult<RelationshipDescriptor> {
    let related = owner.registry().resolve(related)?;
    let edge = resolve_edge(owner, &site, Cardinality::ManyToMany, relation, edge_type, key);
    let related_key = related.primary_key_name().to_string();
    resolved(owner, RelationKind::BelongsToMany, edge, related, related_key)
}

/// Both the role type and the related type must be registered
#[allow(clippy::too_many_arguments)]
pub fn hyper_morph(
    owner: &Node,
    site: CallSite,
    role: &str,
    related: &str,
    edge_type: Option<&str>,
    morph_type: Option<&str>,
    relation: Option<&str>,
    key: Option<&str>,
) -> ModelResult<RelationshipDescriptor> {
    let registry = owner.registry();
    let role = registry.resolve(role)?;
    let related = registry.resolve(related)?;
    let edge = resolve_edge(owner, &site, Cardinality::Hyper, relation, edge_type, key);

    let kind = RelationKind::HyperMorph {
        role_query: NodeQuery::new(role.clone(), registry.clone()),
        role,
        morph_type: explicit(morph_type).map(str::to_string),
    };
    let related_key = related.primary_key_name().to_string();
    resolved(owner, kind, edge, related, related_key)
}

pub fn morph_many(
    owner: &Node,
    site: CallSite,
    related: &str,
    morph_name: &str,
    edge_type: Option<&str>,
    key: Option<&str>,
    relation: Option<&str>,
) -> ModelResult<RelationshipDescriptor> {
    let related = owner.registry().resolve(related)?;
    let edge = resolve_edge(owner, &site, Cardinality::PolymorphicInverse, relation, edge_type, key);

    let kind = RelationKind::MorphMany {
        morph_name: morph_name.to_string(),
    };
    let related_key = related.primary_key_name().to_string();
    resolved(owner, kind, edge, related, related_key)
}

pub fn morphed_by_one(
    owner: &Node,
    site: CallSite,
    related: &str,
    edge_type: &str,
    key: Option<&str>,
    relation: Option<&str>,
) -> ModelResult<RelationshipDescriptor> {
    let related = owner.registry().resolve(related)?;
    let edge = resolve_edge(owner, &site, Cardinality::PolymorphicInverse, relation, Some(edge_type), key);
    let related_key = related.primary_key_name().to_string();
    resolved(owner, RelationKind::MorphedByOne, edge, related, related_key)
}

/// Forward polymorphic relation.
///
/// With both `name` and `edge_type` the related type is known up front and
/// this is a `morphed_by_one` named after the accessor. Otherwise the related
/// type is read from the owner's discriminator property; while that is unset
/// the descriptor is returned with a pending target.
pub fn morph_to(
    owner: &Node,
    site: CallSite,
    name: Option<&str>,
    edge_type: Option<&str>,
    key: Option<&str>,
) -> ModelResult<RelationshipDescriptor> {
    if let (Some(related), Some(edge_type)) = (explicit(name), explicit(edge_type)) {
        let relation = site.accessor().to_string();
        return morphed_by_one(owner, site, related, edge_type, key, Some(&relation));
    }

    let registry = owner.registry();
    let name = match explicit(name) {
        Some(name) => name.to_string(),
        None => snake_case(site.accessor()),
    };
    let morph_type = match explicit(edge_type) {
        Some(column) => column.to_string(),
        None => format!("{}{}", name, registry.config().morph_type_suffix),
    };

    let edge = EdgeResolution {
        edge_type: name.to_uppercase(),
        owner_key: explicit(key).unwrap_or(owner.key_name()).to_string(),
        relation: name,
    };

    let discriminator = match owner.get(&morph_type) {
        None | Some(Value::Null) => None,
        Some(Value::String(identity)) if identity.is_empty() => None,
        Some(Value::String(identity)) => Some(identity.clone()),
        Some(other) => {
            return Err(ModelError::Relationship(format!(
                "Morph type '{}' on '{}' must be a type identity, found {}",
                morph_type,
                owner.entity().identity(),
                other
            )))
        }
    };

    let kind = RelationKind::MorphTo { morph_type };
    match discriminator {
        Some(identity) => {
            let related = registry.resolve(&identity)?;
            let related_key = related.primary_key_name().to_string();
            resolved(owner, kind, edge, related, related_key)
        }
        None => finish(owner, kind, edge, None, RelatedTarget::Pending),
    }
}
