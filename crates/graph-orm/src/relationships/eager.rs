//! Eager Loading - Relationship queries covering a batch of owners
//!
//! A resolved descriptor is widened from its single owner to every parent in
//! the batch. A forward polymorphic descriptor, pending or not, is loaded per
//! parent type: parents are grouped by their stored type and one query is
//! built per concrete related type.

use serde_json::Value;

use super::descriptor::{RelatedTarget, RelationKind, RelationshipDescriptor};
use crate::error::{ModelError, ModelResult};
use crate::model::Node;
use crate::query::NodeQuery;

/// Non-null values of `property` across `parents`, first occurrence order
fn anchor_values<'a>(parents: impl IntoIterator<Item = &'a Node>, property: &str) -> Vec<Value> {
    let mut values: Vec<Value> = Vec::new();
    for value in parents
        .into_iter()
        .filter_map(|parent| parent.get(property))
        .filter(|v| !v.is_null())
    {
        if !values.contains(value) {
            values.push(value.clone());
        }
    }
    values
}

impl RelationshipDescriptor {
    /// Queries loading this relationship for every node in `parents`
    pub fn eager_queries(&self, parents: &[Node]) -> ModelResult<Vec<NodeQuery>> {
        // each parent names its own related type, whatever the descriptor's owner had
        if let RelationKind::MorphTo { morph_type } = &self.kind {
            return self.morph_queries(morph_type, parents);
        }

        match &self.target {
            RelatedTarget::Resolved(query) => {
                let values = anchor_values(parents, self.anchor_key());
                if values.is_empty() {
                    return Ok(Vec::new());
                }

                let query = query
                    .without_parent_constraints()
                    .without_limit()
                    .where_parent_in(self.anchor_key(), values);
                Ok(vec![query])
            }
            RelatedTarget::Pending => Err(ModelError::Relationship(format!(
                "Only morphTo relationships can defer their related type, found {}",
                self.kind.name()
            ))),
        }
    }

    /// One query per concrete type stored on the parents
    fn morph_queries(&self, morph_type: &str, parents: &[Node]) -> ModelResult<Vec<NodeQuery>> {
        let mut groups: Vec<(String, Vec<&Node>)> = Vec::new();
        for parent in parents {
            let identity = match parent.get(morph_type) {
                None | Some(Value::Null) => continue,
                Some(Value::String(identity)) if identity.is_empty() => continue,
                Some(Value::String(identity)) => identity,
                Some(other) => {
                    return Err(ModelError::Relationship(format!(
                        "Morph type '{}' must be a type identity, found {}",
                        morph_type, other
                    )))
                }
            };

            match groups.iter_mut().find(|(existing, _)| existing == identity) {
                Some((_, members)) => members.push(parent),
                None => groups.push((identity.clone(), vec![parent])),
            }
        }

        let mut queries = Vec::with_capacity(groups.len());
        for (identity, members) in groups {
            let ids = anchor_values(members, &self.owner_key);
            if ids.is_empty() {
                continue;
            }

            tracing::debug!(
                "Eager loading '{}' of type {} for {} parent(s)",
                self.relation,
                identity,
                ids.len()
            );
            let query = self
                .registry
                .query(&identity)?
                .traverse(self.owner_labels.clone(), &self.edge_type, self.direction)
                .where_parent_in(&self.owner_key, ids);
            queries.push(query);
        }

        Ok(queries)
    }

    /// Run every eager query and collect the related nodes
    pub async fn eager_load(&self, parents: &[Node]) -> ModelResult<Vec<Node>> {
        let mut related = Vec::new();
        for query in self.eager_queries(parents)? {
            related.extend(query.get().await?);
        }
        Ok(related)
    }
}
