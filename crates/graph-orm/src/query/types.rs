//! Query Types - Core types for graph queries and compiled statements

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Property map of a single node, ordered by property name
pub type Attributes = BTreeMap<String, Value>;

/// Query operator types
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOperator {
    Equal,
    NotEqual,
    In,
    IsNull,
    IsNotNull,
}

impl fmt::Display for QueryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryOperator::Equal => write!(f, "="),
            QueryOperator::NotEqual => write!(f, "<>"),
            QueryOperator::In => write!(f, "IN"),
            QueryOperator::IsNull => write!(f, "IS NULL"),
            QueryOperator::IsNotNull => write!(f, "IS NOT NULL"),
        }
    }
}

/// Which node of the matched pattern a condition applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeAlias {
    /// The queried (related) node
    Related,
    /// The owning node at the other end of a traversal
    Parent,
}

impl NodeAlias {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeAlias::Related => "n",
            NodeAlias::Parent => "p",
        }
    }
}

/// Where clause condition
#[derive(Debug, Clone, PartialEq)]
pub struct WhereCondition {
    pub alias: NodeAlias,
    pub property: String,
    pub operator: QueryOperator,
    pub value: Option<Value>,
    pub values: Vec<Value>, // For IN
}

/// Edge direction, read from the owning node's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// `(owner)-[:TYPE]->(related)`
    Outgoing,
    /// `(owner)<-[:TYPE]-(related)`
    Incoming,
}

impl Direction {
    pub fn reverse(self) -> Self {
        match self {
            Direction::Outgoing => Direction::Incoming,
            Direction::Incoming => Direction::Outgoing,
        }
    }
}

/// Edge pattern joining the owning node to the queried node
#[derive(Debug, Clone, PartialEq)]
pub struct Traversal {
    pub parent_labels: Vec<String>,
    pub edge_type: String,
    pub direction: Direction,
}

/// Query text plus positional parameters, ready for a connection
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub text: String,
    pub bindings: Vec<Value>,
}

impl Statement {
    pub fn new(text: impl Into<String>, bindings: Vec<Value>) -> Self {
        Self {
            text: text.into(),
            bindings,
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}
