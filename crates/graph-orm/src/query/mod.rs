//! Query Module - Scoped node queries, grammar and the connection seam

pub mod builder;
pub mod connection;
pub mod grammar;
pub mod types;

pub use builder::NodeQuery;
pub use connection::GraphConnection;
pub use grammar::{CypherGrammar, Grammar};
pub use types::{Attributes, Direction, NodeAlias, QueryOperator, Statement, Traversal, WhereCondition};
