//! Example: Resolving graph relationships against an in-memory connection
//!
//! Run with `RUST_LOG=graph_orm=debug` to see every resolved descriptor and
//! compiled statement.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use graph_orm::{
    Attributes, CypherGrammar, EntityType, Grammar, GraphConnection, ModelRegistry, ModelResult,
    OrmConfig, RelationSpec, Statement,
};
use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;

/// Prints statements instead of sending them to a database
#[derive(Default)]
struct PrintingConnection {
    grammar: CypherGrammar,
    next_key: Mutex<i64>,
}

#[async_trait]
impl GraphConnection for PrintingConnection {
    fn grammar(&self) -> &dyn Grammar {
        &self.grammar
    }

    async fn select(&self, statement: &Statement) -> ModelResult<Vec<Attributes>> {
        println!("  select: {}  {:?}", statement, statement.bindings);
        Ok(Vec::new())
    }

    async fn insert(&self, statement: &Statement) -> ModelResult<Option<Value>> {
        println!("  insert: {}  {:?}", statement, statement.bindings);
        let mut next = self.next_key.lock().unwrap();
        *next += 1;
        Ok(Some(json!(*next)))
    }

    async fn update(&self, statement: &Statement) -> ModelResult<u64> {
        println!("  update: {}  {:?}", statement, statement.bindings);
        Ok(1)
    }
}

#[tokio::main]
async fn main() -> ModelResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = OrmConfig::from_env()?;
    let registry = ModelRegistry::with_config(Arc::new(PrintingConnection::default()), config)?;

    registry.register(EntityType::new("App::Models::User").with_label(vec!["User", "Person"]));
    registry.register(EntityType::new("App::Models::Post").with_label("Post:Article").with_timestamps(true));
    registry.register(EntityType::new("App::Models::Image"));
    registry.register(EntityType::new("App::Models::Role").with_label("Role"));

    registry.define("App::Models::User", "posts", RelationSpec::has_many("App::Models::Post"));
    registry.define(
        "App::Models::User",
        "roles",
        RelationSpec::hyper_morph("App::Models::Role", "App::Models::Post").with_morph_type("role_type"),
    );
    registry.define("App::Models::Image", "imageable", RelationSpec::morph_to());

    println!("Saving a user:");
    let mut user = registry.new_node("App::Models::User")?;
    user.set("name", "Ada");
    user.save().await?;

    for accessor in registry.accessors("App::Models::User") {
        let descriptor = user.relation(&accessor)?;
        println!(
            "{} -> {} [{}] edge {} ({:?})",
            accessor,
            descriptor.related_query().map_or("?", |q| q.entity().identity()),
            descriptor.cardinality(),
            descriptor.edge_type(),
            descriptor.direction()
        );
        descriptor.get().await?;
    }

    println!("Polymorphic images:");
    let mut images = Vec::new();
    for (id, kind) in [(1, "App::Models::Post"), (2, "App::Models::User"), (3, "App::Models::Post")] {
        let mut image = registry.new_node("App::Models::Image")?;
        image.set("id", id).set("imageable_type", kind);
        image.save().await?;
        images.push(image);
    }

    let pending = registry.new_node("App::Models::Image")?.relation("imageable")?;
    println!("imageable pending: {}", pending.is_pending());
    pending.eager_load(&images).await?;

    Ok(())
}
