//! Query Grammar - Compiles node queries and writes into statements

use serde_json::Value;

use super::builder::NodeQuery;
use super::types::*;
use crate::error::{ModelError, ModelResult};

/// Statement compiler paired with a connection
pub trait Grammar: Send + Sync {
    fn compile_select(&self, query: &NodeQuery) -> ModelResult<Statement>;

    fn compile_insert(&self, labels: &[String], attributes: &Attributes) -> ModelResult<Statement>;

    fn compile_update(
        &self,
        labels: &[String],
        key_name: &str,
        key_value: &Value,
        dirty: &Attributes,
    ) -> ModelResult<Statement>;
}

/// Cypher grammar with positional `$pN` parameters
#[derive(Debug, Clone, Default)]
pub struct CypherGrammar;

impl CypherGrammar {
    pub fn new() -> Self {
        Self
    }

    /// Backtick-quote identifiers that are not plain words
    fn wrap(name: &str) -> String {
        let plain = name
            .chars()
            .next()
            .map_or(false, |c| c.is_alphabetic() || c == '_')
            && name.chars().all(|c| c.is_alphanumeric() || c == '_');

        if plain {
            name.to_string()
        } else {
            format!("`{}`", name.replace('`', "``"))
        }
    }

    fn node_pattern(alias: &str, labels: &[String]) -> ModelResult<String> {
        if labels.is_empty() {
            return Err(ModelError::Query(format!("Node pattern '{}' has no labels", alias)));
        }

        let labels: Vec<String> = labels.iter().map(|l| Self::wrap(l)).collect();
        Ok(format!("({}:{})", alias, labels.join(":")))
    }

    fn bind(bindings: &mut Vec<Value>, value: Value) -> String {
        bindings.push(value);
        format!("$p{}", bindings.len() - 1)
    }

    fn compile_condition(condition: &WhereCondition, bindings: &mut Vec<Value>) -> ModelResult<String> {
        let target = format!("{}.{}", condition.alias.as_str(), Self::wrap(&condition.property));

        match condition.operator {
            QueryOperator::Equal | QueryOperator::NotEqual => {
                let value = condition.value.clone().ok_or_else(|| {
                    ModelError::Query(format!("Missing value for condition on '{}'", condition.property))
                })?;
                Ok(format!("{} {} {}", target, condition.operator, Self::bind(bindings, value)))
            }
            QueryOperator::In => {
                let placeholder = Self::bind(bindings, Value::Array(condition.values.clone()));
                Ok(format!("{} IN {}", target, placeholder))
            }
            QueryOperator::IsNull | QueryOperator::IsNotNull => {
                Ok(format!("{} {}", target, condition.operator))
            }
        }
    }
}

impl Grammar for CypherGrammar {
    fn compile_select(&self, query: &NodeQuery) -> ModelResult<Statement> {
        let related = Self::node_pattern(NodeAlias::Related.as_str(), query.labels())?;

        let pattern = match query.traversal() {
            Some(traversal) => {
                let parent = Self::node_pattern(NodeAlias::Parent.as_str(), &traversal.parent_labels)?;
                let edge_type = Self::wrap(&traversal.edge_type);
                match traversal.direction {
                    Direction::Outgoing => format!("{}-[:{}]->{}", parent, edge_type, related),
                    Direction::Incoming => format!("{}<-[:{}]-{}", parent, edge_type, related),
                }
            }
            None => related,
        };

        let mut bindings = Vec::new();
        let mut text = format!("MATCH {}", pattern);

        if !query.conditions().is_empty() {
            let clauses = query
                .conditions()
                .iter()
                .map(|c| Self::compile_condition(c, &mut bindings))
                .collect::<ModelResult<Vec<_>>>()?;
            text.push_str(" WHERE ");
            text.push_str(&clauses.join(" AND "));
        }

        text.push_str(" RETURN n");

        if let Some(limit) = query.limit_count() {
            text.push_str(&format!(" LIMIT {}", limit));
        }

        Ok(Statement::new(text, bindings))
    }

    fn compile_insert(&self, labels: &[String], attributes: &Attributes) -> ModelResult<Statement> {
        let node = Self::node_pattern("n", labels)?;
        let mut bindings = Vec::new();

        let properties: Vec<String> = attributes
            .iter()
            .map(|(name, value)| format!("{}: {}", Self::wrap(name), Self::bind(&mut bindings, value.clone())))
            .collect();

        let text = if properties.is_empty() {
            format!("CREATE {} RETURN n", node)
        } else {
            // node pattern ends with ')', splice the property map inside it
            let open = &node[..node.len() - 1];
            format!("CREATE {} {{{}}}) RETURN n", open, properties.join(", "))
        };

        Ok(Statement::new(text, bindings))
    }

    fn compile_update(
        &self,
        labels: &[String],
        key_name: &str,
        key_value: &Value,
        dirty: &Attributes,
    ) -> ModelResult<Statement> {
        if dirty.is_empty() {
            return Err(ModelError::Query("Update requires at least one changed property".to_string()));
        }

        let node = Self::node_pattern("n", labels)?;
        let mut bindings = Vec::new();
        let key = Self::bind(&mut bindings, key_value.clone());

        let assignments: Vec<String> = dirty
            .iter()
            .map(|(name, value)| format!("n.{} = {}", Self::wrap(name), Self::bind(&mut bindings, value.clone())))
            .collect();

        let text = format!(
            "MATCH {} WHERE n.{} = {} SET {} RETURN n",
            node,
            Self::wrap(key_name),
            key,
            assignments.join(", ")
        );

        Ok(Statement::new(text, bindings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EntityType;
    use crate::query::connection::tests::RecordingConnection;
    use crate::registry::ModelRegistry;
    use serde_json::json;
    use std::sync::Arc;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_wrap_identifiers() {
        assert_eq!(CypherGrammar::wrap("User"), "User");
        assert_eq!(CypherGrammar::wrap("created_at"), "created_at");
        assert_eq!(CypherGrammar::wrap("App::User"), "`App::User`");
        assert_eq!(CypherGrammar::wrap("9lives"), "`9lives`");
    }

    #[test]
    fn test_compile_traversal_select() {
        let registry = ModelRegistry::new(Arc::new(RecordingConnection::default()));
        registry.register(EntityType::new("Post"));

        let query = registry
            .query("Post")
            .unwrap()
            .traverse(labels(&["User", "Fan"]), "POSTS", Direction::Outgoing)
            .where_parent_eq("id", 1)
            .where_in("status", vec![json!("draft"), json!("live")])
            .limit(5);

        let statement = CypherGrammar::new().compile_select(&query).unwrap();
        assert_eq!(
            statement.text,
            "MATCH (p:User:Fan)-[:POSTS]->(n:Post) WHERE p.id = $p0 AND n.status IN $p1 RETURN n LIMIT 5"
        );
        assert_eq!(statement.bindings, vec![json!(1), json!(["draft", "live"])]);
    }

    #[test]
    fn test_compile_incoming_select() {
        let registry = ModelRegistry::new(Arc::new(RecordingConnection::default()));
        registry.register(EntityType::new("User"));

        let query = registry
            .query("User")
            .unwrap()
            .traverse(labels(&["Phone"]), "USER", Direction::Incoming)
            .where_null("deleted_at");

        let statement = CypherGrammar::new().compile_select(&query).unwrap();
        assert_eq!(
            statement.text,
            "MATCH (p:Phone)<-[:USER]-(n:User) WHERE n.deleted_at IS NULL RETURN n"
        );
        assert!(statement.bindings.is_empty());
    }

    #[test]
    fn test_compile_insert() {
        let mut attributes = Attributes::new();
        attributes.insert("name".to_string(), json!("Ada"));
        attributes.insert("email".to_string(), json!("ada@example.com"));

        let statement = CypherGrammar::new()
            .compile_insert(&labels(&["User", "Fan"]), &attributes)
            .unwrap();
        assert_eq!(
            statement.text,
            "CREATE (n:User:Fan {email: $p0, name: $p1}) RETURN n"
        );
        assert_eq!(statement.bindings, vec![json!("ada@example.com"), json!("Ada")]);
    }

    #[test]
    fn test_compile_insert_without_properties() {
        let statement = CypherGrammar::new()
            .compile_insert(&labels(&["Tag"]), &Attributes::new())
            .unwrap();
        assert_eq!(statement.text, "CREATE (n:Tag) RETURN n");
    }

    #[test]
    fn test_compile_update() {
        let mut dirty = Attributes::new();
        dirty.insert("name".to_string(), json!("Grace"));

        let statement = CypherGrammar::new()
            .compile_update(&labels(&["User"]), "id", &json!(4), &dirty)
            .unwrap();
        assert_eq!(
            statement.text,
            "MATCH (n:User) WHERE n.id = $p0 SET n.name = $p1 RETURN n"
        );
        assert_eq!(statement.bindings, vec![json!(4), json!("Grace")]);
    }

    #[test]
    fn test_empty_update_rejected() {
        let result = CypherGrammar::new().compile_update(&labels(&["User"]), "id", &json!(4), &Attributes::new());
        assert!(matches!(result, Err(ModelError::Query(_))));
    }
}
