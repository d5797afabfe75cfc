//! Model Registry - Runtime home of entity types and relation definitions
//!
//! Related types are referenced by identity and "instantiated" by looking
//! them up here, which is also how a stored morph discriminator becomes a
//! concrete type. The registry owns the connection every query is built
//! from, the naming conventions and the lifecycle observers.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;

use crate::config::OrmConfig;
use crate::error::{ModelError, ModelResult};
use crate::events::ModelObserver;
use crate::model::labels::resolve_labels_with;
use crate::model::{EntityType, Node};
use crate::observers::ObserverRegistry;
use crate::query::{GraphConnection, NodeQuery};
use crate::relationships::definitions::RelationSpec;

struct RegistryInner {
    entities: DashMap<String, Arc<EntityType>>,
    /// entity identity -> accessor name -> definition
    definitions: DashMap<String, HashMap<String, RelationSpec>>,
    observers: ObserverRegistry,
    connection: Arc<dyn GraphConnection>,
    config: OrmConfig,
}

/// Cheaply clonable handle; clones share the same registry
#[derive(Clone)]
pub struct ModelRegistry {
    inner: Arc<RegistryInner>,
}

impl fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut entities: Vec<String> = self.inner.entities.iter().map(|e| e.key().clone()).collect();
        entities.sort();
        f.debug_struct("ModelRegistry")
            .field("entities", &entities)
            .field("config", &self.inner.config)
            .finish()
    }
}

impl ModelRegistry {
    /// Create a registry with the default conventions
    pub fn new(connection: Arc<dyn GraphConnection>) -> Self {
        Self::build(connection, OrmConfig::default())
    }

    /// Create a registry with explicit conventions
    pub fn with_config(connection: Arc<dyn GraphConnection>, config: OrmConfig) -> ModelResult<Self> {
        config.validate()?;
        Ok(Self::build(connection, config))
    }

    fn build(connection: Arc<dyn GraphConnection>, config: OrmConfig) -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                entities: DashMap::new(),
                definitions: DashMap::new(),
                observers: ObserverRegistry::new(),
                connection,
                config,
            }),
        }
    }

    pub fn config(&self) -> &OrmConfig {
        &self.inner.config
    }

    pub fn connection(&self) -> &Arc<dyn GraphConnection> {
        &self.inner.connection
    }

    pub(crate) fn observers(&self) -> &ObserverRegistry {
        &self.inner.observers
    }

    /// Register an entity type, replacing any previous type with the same
    /// identity
    pub fn register(&self, entity: EntityType) -> Arc<EntityType> {
        let entity = match entity.timestamps() {
            Some(_) => entity,
            None => entity.with_timestamps(self.inner.config.timestamps_by_default),
        };

        let entity = Arc::new(entity);
        let identity = entity.identity().to_string();
        if self.inner.entities.insert(identity.clone(), entity.clone()).is_some() {
            tracing::warn!("Entity type '{}' registered twice, keeping the latest", identity);
        } else {
            tracing::debug!("Registered entity type '{}'", identity);
        }
        entity
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.inner.entities.contains_key(identity)
    }

    /// Look up an entity type by identity
    pub fn resolve(&self, identity: &str) -> ModelResult<Arc<EntityType>> {
        self.inner
            .entities
            .get(identity)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| ModelError::UnresolvableRelatedType(identity.to_string()))
    }

    /// Labels of `entity` under this registry's conventions
    pub fn labels_for(&self, entity: &EntityType) -> Vec<String> {
        resolve_labels_with(entity, &self.inner.config)
    }

    pub fn uses_timestamps(&self, entity: &EntityType) -> bool {
        entity
            .timestamps()
            .unwrap_or(self.inner.config.timestamps_by_default)
    }

    /// Fresh, not yet persisted node of a registered type
    pub fn new_node(&self, identity: &str) -> ModelResult<Node> {
        let entity = self.resolve(identity)?;
        Ok(Node::new(entity, self.clone()))
    }

    /// Base query over every node of a registered type
    pub fn query(&self, identity: &str) -> ModelResult<NodeQuery> {
        let entity = self.resolve(identity)?;
        Ok(NodeQuery::new(entity, self.clone()))
    }

    /// Declare the relationship exposed by `accessor` on `identity`
    pub fn define(&self, identity: &str, accessor: &str, spec: RelationSpec) {
        let mut definitions = self.inner.definitions.entry(identity.to_string()).or_default();
        if definitions.insert(accessor.to_string(), spec).is_some() {
            tracing::warn!("Relationship '{}' on '{}' redefined", accessor, identity);
        }
    }

    pub fn definition(&self, identity: &str, accessor: &str) -> Option<RelationSpec> {
        self.inner
            .definitions
            .get(identity)?
            .get(accessor)
            .cloned()
    }

    /// Accessor names defined for an entity type, sorted
    pub fn accessors(&self, identity: &str) -> Vec<String> {
        let mut names: Vec<String> = self
            .inner
            .definitions
            .get(identity)
            .map(|definitions| definitions.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }

    pub fn observe(&self, identity: &str, observer: Arc<dyn ModelObserver>) {
        self.inner.observers.register(identity, observer);
    }
}
