//! Node Query - Query scoped to a single entity type

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::types::*;
use crate::error::ModelResult;
use crate::model::{EntityType, Node};
use crate::registry::ModelRegistry;

/// Query over the nodes of one entity type, optionally reached by traversing
/// an edge from an owning node
#[derive(Clone)]
pub struct NodeQuery {
    entity: Arc<EntityType>,
    labels: Vec<String>,
    registry: ModelRegistry,
    traversal: Option<Traversal>,
    conditions: Vec<WhereCondition>,
    limit_count: Option<u64>,
}

impl fmt::Debug for NodeQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeQuery")
            .field("entity", &self.entity.identity())
            .field("labels", &self.labels)
            .field("traversal", &self.traversal)
            .field("conditions", &self.conditions)
            .field("limit_count", &self.limit_count)
            .finish()
    }
}

impl NodeQuery {
    pub(crate) fn new(entity: Arc<EntityType>, registry: ModelRegistry) -> Self {
        let labels = registry.labels_for(&entity);
        Self::with_labels(entity, labels, registry)
    }

    pub(crate) fn with_labels(
        entity: Arc<EntityType>,
        labels: Vec<String>,
        registry: ModelRegistry,
    ) -> Self {
        Self {
            entity,
            labels,
            registry,
            traversal: None,
            conditions: Vec::new(),
            limit_count: None,
        }
    }

    pub fn entity(&self) -> &EntityType {
        &self.entity
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn traversal(&self) -> Option<&Traversal> {
        self.traversal.as_ref()
    }

    pub fn conditions(&self) -> &[WhereCondition] {
        &self.conditions
    }

    pub fn limit_count(&self) -> Option<u64> {
        self.limit_count
    }

    /// Reach the queried nodes through `edge_type` from nodes carrying
    /// `parent_labels`
    pub fn traverse(mut self, parent_labels: Vec<String>, edge_type: &str, direction: Direction) -> Self {
        self.traversal = Some(Traversal {
            parent_labels,
            edge_type: edge_type.to_string(),
            direction,
        });
        self
    }

    pub fn where_eq(self, property: &str, value: impl Into<Value>) -> Self {
        self.push_condition(NodeAlias::Related, property, QueryOperator::Equal, Some(value.into()), Vec::new())
    }

    pub fn where_not_eq(self, property: &str, value: impl Into<Value>) -> Self {
        self.push_condition(NodeAlias::Related, property, QueryOperator::NotEqual, Some(value.into()), Vec::new())
    }

    pub fn where_in(self, property: &str, values: Vec<Value>) -> Self {
        self.push_condition(NodeAlias::Related, property, QueryOperator::In, None, values)
    }

    pub fn where_null(self, property: &str) -> Self {
        self.push_condition(NodeAlias::Related, property, QueryOperator::IsNull, None, Vec::new())
    }

    pub fn where_not_null(self, property: &str) -> Self {
        self.push_condition(NodeAlias::Related, property, QueryOperator::IsNotNull, None, Vec::new())
    }

    /// Constrain by this entity type's primary key
    pub fn where_key(self, value: impl Into<Value>) -> Self {
        let key = self.entity.primary_key_name().to_string();
        self.where_eq(&key, value)
    }

    /// Constrain the owning node of the traversal
    pub fn where_parent_eq(self, property: &str, value: impl Into<Value>) -> Self {
        self.push_condition(NodeAlias::Parent, property, QueryOperator::Equal, Some(value.into()), Vec::new())
    }

    pub fn where_parent_in(self, property: &str, values: Vec<Value>) -> Self {
        self.push_condition(NodeAlias::Parent, property, QueryOperator::In, None, values)
    }

    pub fn limit(mut self, count: u64) -> Self {
        self.limit_count = Some(count);
        self
    }

    pub fn without_limit(mut self) -> Self {
        self.limit_count = None;
        self
    }

    /// Copy of this query with every owning-node condition removed
    pub fn without_parent_constraints(&self) -> Self {
        let mut query = self.clone();
        query.conditions.retain(|c| c.alias != NodeAlias::Parent);
        query
    }

    fn push_condition(
        mut self,
        alias: NodeAlias,
        property: &str,
        operator: QueryOperator,
        value: Option<Value>,
        values: Vec<Value>,
    ) -> Self {
        self.conditions.push(WhereCondition {
            alias,
            property: property.to_string(),
            operator,
            value,
            values,
        });
        self
    }

    /// Compile with the grammar of the registry's connection
    pub fn to_statement(&self) -> ModelResult<Statement> {
        self.registry.connection().grammar().compile_select(self)
    }

    /// Execute and hydrate every matching node
    pub async fn get(&self) -> ModelResult<Vec<Node>> {
        let statement = self.to_statement()?;
        tracing::trace!("Executing node query: {}", statement);

        let rows = self.registry.connection().select(&statement).await?;
        Ok(rows
            .into_iter()
            .map(|attributes| Node::hydrate(self.entity.clone(), self.registry.clone(), attributes))
            .collect())
    }

    pub async fn first(&self) -> ModelResult<Option<Node>> {
        let rows = self.clone().limit(1).get().await?;
        Ok(rows.into_iter().next())
    }

    pub async fn find(&self, key: impl Into<Value>) -> ModelResult<Option<Node>> {
        self.clone().where_key(key).first().await
    }
}
