//! Shared fixtures: an in-memory connection that records every statement

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use graph_orm::{Attributes, CypherGrammar, EntityType, Grammar, GraphConnection, ModelRegistry, ModelResult, Statement};
use serde_json::Value;

#[derive(Default)]
pub struct MemoryConnection {
    grammar: CypherGrammar,
    rows: Mutex<Vec<Attributes>>,
    next_key: Mutex<i64>,
    pub statements: Mutex<Vec<(&'static str, Statement)>>,
}

impl MemoryConnection {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            next_key: Mutex::new(1),
            ..Default::default()
        })
    }

    /// Rows returned by every following select
    pub fn returning(&self, rows: Vec<Vec<(&str, Value)>>) {
        *self.rows.lock().unwrap() = rows
            .into_iter()
            .map(|row| row.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
            .collect();
    }

    pub fn count(&self, kind: &str) -> usize {
        self.statements
            .lock()
            .unwrap()
            .iter()
            .filter(|(recorded, _)| *recorded == kind)
            .count()
    }

    pub fn last(&self, kind: &str) -> Option<Statement> {
        self.statements
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(recorded, _)| *recorded == kind)
            .map(|(_, statement)| statement.clone())
    }
}

#[async_trait]
impl GraphConnection for MemoryConnection {
    fn grammar(&self) -> &dyn Grammar {
        &self.grammar
    }

    async fn select(&self, statement: &Statement) -> ModelResult<Vec<Attributes>> {
        self.statements.lock().unwrap().push(("select", statement.clone()));
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn insert(&self, statement: &Statement) -> ModelResult<Option<Value>> {
        self.statements.lock().unwrap().push(("insert", statement.clone()));
        let mut next = self.next_key.lock().unwrap();
        let key = *next;
        *next += 1;
        Ok(Some(Value::from(key)))
    }

    async fn update(&self, statement: &Statement) -> ModelResult<u64> {
        self.statements.lock().unwrap().push(("update", statement.clone()));
        Ok(1)
    }
}

/// Registry with a small blog schema
pub fn blog(connection: Arc<MemoryConnection>) -> ModelRegistry {
    let registry = ModelRegistry::new(connection);
    registry.register(EntityType::new("App::Models::User").with_label(vec!["User", "Person"]));
    registry.register(EntityType::new("App::Models::Post").with_table("Post:Article"));
    registry.register(EntityType::new("App::Models::Comment"));
    registry.register(EntityType::new("App::Models::Account").with_primary_key("uuid"));
    registry.register(EntityType::new("App::Models::Image").with_label("Image"));
    registry.register(EntityType::new("App::Models::Role").with_label("Role"));
    registry
}
