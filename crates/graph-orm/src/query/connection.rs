//! Graph Connection - The persistence collaborator behind every query
//!
//! The model layer never talks to a driver directly. It compiles statements
//! with the connection's grammar and hands them back to the connection.

use async_trait::async_trait;
use serde_json::Value;

use super::grammar::Grammar;
use super::types::{Attributes, Statement};
use crate::error::ModelResult;

#[async_trait]
pub trait GraphConnection: Send + Sync {
    /// Grammar paired with this connection
    fn grammar(&self) -> &dyn Grammar;

    /// Run a read statement and return the property map of each node
    async fn select(&self, statement: &Statement) -> ModelResult<Vec<Attributes>>;

    /// Run a create statement, returning the generated key if the engine
    /// assigned one
    async fn insert(&self, statement: &Statement) -> ModelResult<Option<Value>>;

    /// Run an update statement and return the number of touched nodes
    async fn update(&self, statement: &Statement) -> ModelResult<u64>;
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::query::grammar::CypherGrammar;
    use std::sync::Mutex;

    /// In-memory connection recording every statement it receives
    #[derive(Default)]
    pub(crate) struct RecordingConnection {
        grammar: CypherGrammar,
        rows: Vec<Attributes>,
        generated_key: Option<Value>,
        selects: Mutex<Vec<Statement>>,
        inserts: Mutex<Vec<Statement>>,
        updates: Mutex<Vec<Statement>>,
    }

    impl RecordingConnection {
        pub(crate) fn with_rows(rows: Vec<Vec<(&str, Value)>>) -> Self {
            Self {
                rows: rows
                    .into_iter()
                    .map(|row| row.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
                    .collect(),
                ..Default::default()
            }
        }

        pub(crate) fn with_generated_key(key: Value) -> Self {
            Self {
                generated_key: Some(key),
                ..Default::default()
            }
        }

        pub(crate) fn selects(&self) -> Vec<Statement> {
            self.selects.lock().unwrap().clone()
        }

        pub(crate) fn inserts(&self) -> Vec<Statement> {
            self.inserts.lock().unwrap().clone()
        }

        pub(crate) fn updates(&self) -> Vec<Statement> {
            self.updates.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl GraphConnection for RecordingConnection {
        fn grammar(&self) -> &dyn Grammar {
            &self.grammar
        }

        async fn select(&self, statement: &Statement) -> ModelResult<Vec<Attributes>> {
            self.selects.lock().unwrap().push(statement.clone());
            Ok(self.rows.clone())
        }

        async fn insert(&self, statement: &Statement) -> ModelResult<Option<Value>> {
            self.inserts.lock().unwrap().push(statement.clone());
            Ok(self.generated_key.clone())
        }

        async fn update(&self, statement: &Statement) -> ModelResult<u64> {
            self.updates.lock().unwrap().push(statement.clone());
            Ok(1)
        }
    }
}
