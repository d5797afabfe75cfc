//! Node - A single graph record and the relationship-definition façade
//!
//! A `Node` carries the attributes of one record of an `EntityType`, the
//! snapshot used for dirty tracking and the existence flag that decides
//! between insert and update on save. Relationship definitions are exposed
//! here and delegate to the shape builders.

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;

use super::entity::{EntityType, LabelConfig};
use crate::error::{ModelError, ModelResult};
use crate::query::{Attributes, NodeQuery};
use crate::registry::ModelRegistry;
use crate::relationships::builders;
use crate::relationships::{CallSite, RelationshipDescriptor};

pub const CREATED_AT: &str = "created_at";
pub const UPDATED_AT: &str = "updated_at";

#[derive(Debug, Clone)]
pub struct Node {
    entity: Arc<EntityType>,
    registry: ModelRegistry,
    attributes: Attributes,
    original: Attributes,
    exists: bool,
}

impl Node {
    pub(crate) fn new(entity: Arc<EntityType>, registry: ModelRegistry) -> Self {
        Self {
            entity,
            registry,
            attributes: Attributes::new(),
            original: Attributes::new(),
            exists: false,
        }
    }

    /// Node loaded from storage: marked as existing with a clean snapshot
    pub(crate) fn hydrate(entity: Arc<EntityType>, registry: ModelRegistry, attributes: Attributes) -> Self {
        Self {
            entity,
            registry,
            original: attributes.clone(),
            attributes,
            exists: true,
        }
    }

    pub fn entity(&self) -> &EntityType {
        &self.entity
    }

    pub(crate) fn entity_arc(&self) -> &Arc<EntityType> {
        &self.entity
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    /// Node labels, resolved from this instance's label configuration
    pub fn labels(&self) -> Vec<String> {
        self.registry.labels_for(&self.entity)
    }

    /// Override the labels of this instance only
    pub fn set_label(&mut self, label: impl Into<LabelConfig>) {
        Arc::make_mut(&mut self.entity).set_label(label);
    }

    pub fn key_name(&self) -> &str {
        self.entity.primary_key_name()
    }

    /// Graph nodes have no table prefix, so this is the bare key name
    pub fn qualified_key_name(&self) -> &str {
        self.key_name()
    }

    pub fn key(&self) -> Option<&Value> {
        self.get(self.key_name()).filter(|v| !v.is_null())
    }

    /// Key identifying the stored node: the value it was loaded or last
    /// saved with, even if the in-memory key was changed since
    pub(crate) fn key_for_save(&self) -> Option<&Value> {
        self.original
            .get(self.key_name())
            .filter(|v| !v.is_null())
            .or_else(|| self.key())
    }

    pub fn exists(&self) -> bool {
        self.exists
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> &mut Self {
        self.attributes.insert(name.to_string(), value.into());
        self
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Attributes changed since the last sync. The primary key is never
    /// reported: it is immutable once the node exists.
    pub fn get_dirty(&self) -> Attributes {
        let key_name = self.key_name();
        self.attributes
            .iter()
            .filter(|(name, value)| name.as_str() != key_name && self.original.get(name.as_str()) != Some(*value))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }

    pub fn is_dirty(&self) -> bool {
        !self.get_dirty().is_empty()
    }

    /// Snapshot the current attributes as clean. A stored node keeps the key
    /// it was stored with; an in-memory change to it is discarded.
    pub fn sync_original(&mut self) {
        let key_name = self.key_name().to_string();
        let stored_key = if self.exists {
            self.original.get(&key_name).filter(|v| !v.is_null()).cloned()
        } else {
            None
        };

        if let Some(key) = stored_key {
            self.attributes.insert(key_name, key);
        }
        self.original = self.attributes.clone();
    }

    pub(crate) fn mark_existing(&mut self) {
        self.exists = true;
    }

    /// Stamp `updated_at`, and `created_at` for nodes not yet stored,
    /// unless the caller already changed them
    pub fn add_timestamps(&mut self) {
        let now = Utc::now()
            .format(&self.registry.config().date_format)
            .to_string();
        let dirty = self.get_dirty();

        if !dirty.contains_key(UPDATED_AT) {
            self.set(UPDATED_AT, now.clone());
        }
        if !self.exists && !dirty.contains_key(CREATED_AT) {
            self.set(CREATED_AT, now);
        }
    }

    /// Base query over this node's type, using this instance's labels
    pub fn new_query(&self) -> NodeQuery {
        NodeQuery::with_labels(self.entity.clone(), self.labels(), self.registry.clone())
    }

    /// Call site for a relationship defined by `accessor` on this node's type
    pub fn call_site(&self, accessor: &str) -> CallSite {
        CallSite::new(accessor, self.entity.identity())
    }

    /// Inverse one-to-one: this node references one `related` node
    pub fn belongs_to(
        &self,
        site: CallSite,
        related: &str,
        foreign_key: Option<&str>,
        other_key: Option<&str>,
        relation: Option<&str>,
    ) -> ModelResult<RelationshipDescriptor> {
        builders::belongs_to(self, site, related, foreign_key, other_key, relation)
    }

    /// One-to-one: one `related` node references this node
    pub fn has_one(
        &self,
        site: CallSite,
        related: &str,
        foreign_key: Option<&str>,
        other_key: Option<&str>,
        relation: Option<&str>,
    ) -> ModelResult<RelationshipDescriptor> {
        builders::has_one(self, site, related, foreign_key, other_key, relation)
    }

    pub fn has_many(
        &self,
        site: CallSite,
        related: &str,
        edge_type: Option<&str>,
        key: Option<&str>,
        relation: Option<&str>,
    ) -> ModelResult<RelationshipDescriptor> {
        builders::has_many(self, site, related, edge_type, key, relation)
    }

    pub fn belongs_to_many(
        &self,
        site: CallSite,
        related: &str,
        edge_type: Option<&str>,
        key: Option<&str>,
        relation: Option<&str>,
    ) -> ModelResult<RelationshipDescriptor> {
        builders::belongs_to_many(self, site, related, edge_type, key, relation)
    }

    /// Edge to `related` that is itself associated with a `role` node
    #[allow(clippy::too_many_arguments)]
    pub fn hyper_morph(
        &self,
        site: CallSite,
        role: &str,
        related: &str,
        edge_type: Option<&str>,
        morph_type: Option<&str>,
        relation: Option<&str>,
        key: Option<&str>,
    ) -> ModelResult<RelationshipDescriptor> {
        builders::hyper_morph(self, site, role, related, edge_type, morph_type, relation, key)
    }

    pub fn morph_many(
        &self,
        site: CallSite,
        related: &str,
        morph_name: &str,
        edge_type: Option<&str>,
        key: Option<&str>,
        relation: Option<&str>,
    ) -> ModelResult<RelationshipDescriptor> {
        builders::morph_many(self, site, related, morph_name, edge_type, key, relation)
    }

    pub fn morphed_by_one(
        &self,
        site: CallSite,
        related: &str,
        edge_type: &str,
        key: Option<&str>,
        relation: Option<&str>,
    ) -> ModelResult<RelationshipDescriptor> {
        builders::morphed_by_one(self, site, related, edge_type, key, relation)
    }

    /// Polymorphic forward relation; the related type is read from this
    /// node's stored discriminator and may still be pending
    pub fn morph_to(
        &self,
        site: CallSite,
        name: Option<&str>,
        edge_type: Option<&str>,
        key: Option<&str>,
    ) -> ModelResult<RelationshipDescriptor> {
        builders::morph_to(self, site, name, edge_type, key)
    }

    /// Resolve the relationship registered for `accessor` on this node's type
    pub fn relation(&self, accessor: &str) -> ModelResult<RelationshipDescriptor> {
        let spec = self
            .registry
            .definition(self.entity.identity(), accessor)
            .ok_or_else(|| {
                ModelError::Relationship(format!(
                    "No relationship '{}' defined on '{}'",
                    accessor,
                    self.entity.identity()
                ))
            })?;

        spec.resolve(self, self.call_site(accessor))
    }
}
