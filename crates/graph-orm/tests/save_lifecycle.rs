mod common;

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use common::{blog, MemoryConnection};
use graph_orm::{EntityType, EventError, ModelError, ModelObserver, ModelRegistry, Node};
use serde_json::json;

struct Veto;

#[async_trait]
impl ModelObserver for Veto {
    async fn saving(&self, _node: &mut Node) -> Result<bool, EventError> {
        Ok(false)
    }
}

/// Fills a slug before the node is created
struct Slugger;

#[async_trait]
impl ModelObserver for Slugger {
    async fn creating(&self, node: &mut Node) -> Result<bool, EventError> {
        let slug = node
            .get("title")
            .and_then(|title| title.as_str())
            .map(|title| title.to_lowercase().replace(' ', "-"));
        if let Some(slug) = slug {
            node.set("slug", slug);
        }
        Ok(true)
    }
}

struct Failing;

#[async_trait]
impl ModelObserver for Failing {
    async fn saved(&self, _node: &Node) -> Result<(), EventError> {
        Err(EventError::observer("audit log unavailable"))
    }
}

#[derive(Default)]
struct Journal {
    seen: Mutex<Vec<String>>,
}

#[async_trait]
impl ModelObserver for Journal {
    async fn created(&self, node: &Node) -> Result<(), EventError> {
        self.seen.lock().unwrap().push(format!("created {}", node.key().unwrap()));
        Ok(())
    }

    async fn updated(&self, node: &Node) -> Result<(), EventError> {
        self.seen.lock().unwrap().push(format!("updated {}", node.key().unwrap()));
        Ok(())
    }
}

#[tokio::test]
async fn vetoed_save_never_reaches_the_connection() {
    let connection = MemoryConnection::new();
    let registry = blog(connection.clone());
    registry.observe("App::Models::Post", Arc::new(Veto));

    let mut post = registry.new_node("App::Models::Post").unwrap();
    post.set("title", "Draft");

    assert!(!post.save().await.unwrap());
    assert!(!post.exists());
    assert_eq!(connection.count("insert"), 0);
    assert_eq!(connection.count("update"), 0);
}

#[tokio::test]
async fn new_node_inserts_and_stored_node_updates() {
    let connection = MemoryConnection::new();
    let registry = blog(connection.clone());
    let journal = Arc::new(Journal::default());
    registry.observe("App::Models::Post", journal.clone());

    let mut post = registry.new_node("App::Models::Post").unwrap();
    post.set("title", "Graphs");
    assert!(post.save().await.unwrap());
    assert_eq!(connection.count("insert"), 1);
    assert_eq!(connection.count("update"), 0);
    assert_eq!(
        connection.last("insert").unwrap().text,
        "CREATE (n:Post:Article {title: $p0}) RETURN n"
    );

    post.set("title", "Graphs, revised");
    assert!(post.save().await.unwrap());
    assert_eq!(connection.count("insert"), 1);
    assert_eq!(connection.count("update"), 1);

    let update = connection.last("update").unwrap();
    assert_eq!(
        update.text,
        "MATCH (n:Post:Article) WHERE n.id = $p0 SET n.title = $p1 RETURN n"
    );
    assert_eq!(update.bindings, vec![json!(1), json!("Graphs, revised")]);
    assert_eq!(*journal.seen.lock().unwrap(), vec!["created 1", "updated 1"]);
}

#[tokio::test]
async fn loaded_node_routes_to_update() {
    let connection = MemoryConnection::new();
    let registry = blog(connection.clone());
    connection.returning(vec![vec![("id", json!(12)), ("body", json!("First!"))]]);

    let mut comment = registry
        .query("App::Models::Comment")
        .unwrap()
        .find(12)
        .await
        .unwrap()
        .unwrap();
    comment.set("body", "Edited");
    assert!(comment.save().await.unwrap());

    assert_eq!(connection.count("insert"), 0);
    assert_eq!(connection.last("update").unwrap().bindings, vec![json!(12), json!("Edited")]);
}

#[tokio::test]
async fn creating_observer_can_change_attributes() {
    let connection = MemoryConnection::new();
    let registry = blog(connection.clone());
    registry.observe("App::Models::Post", Arc::new(Slugger));

    let mut post = registry.new_node("App::Models::Post").unwrap();
    post.set("title", "Hello Graph");
    post.save().await.unwrap();

    assert_eq!(post.get("slug"), Some(&json!("hello-graph")));
    assert!(connection.last("insert").unwrap().bindings.contains(&json!("hello-graph")));
}

#[tokio::test]
async fn observer_failure_is_an_event_error() {
    let registry = blog(MemoryConnection::new());
    registry.observe("App::Models::Post", Arc::new(Failing));

    let mut post = registry.new_node("App::Models::Post").unwrap();
    post.set("title", "Graphs");

    let err = post.save().await.unwrap_err();
    assert!(matches!(err, ModelError::Event(_)));
}

#[tokio::test]
async fn dirty_set_never_contains_primary_key() {
    let registry = blog(MemoryConnection::new());
    let mut post = registry.new_node("App::Models::Post").unwrap();
    post.set("title", "Graphs");
    post.save().await.unwrap();

    post.set("id", 99);
    assert!(post.get_dirty().is_empty());
    assert!(!post.is_dirty());
}

#[tokio::test]
async fn timestamps_follow_configuration() {
    let connection = MemoryConnection::new();
    let registry = ModelRegistry::new(connection.clone());
    registry.register(EntityType::new("Note").with_timestamps(true));

    let mut note = registry.new_node("Note").unwrap();
    note.set("text", "remember");
    note.save().await.unwrap();

    let created = note.get("created_at").cloned().unwrap();
    assert_eq!(note.get("updated_at"), Some(&created));
    assert_eq!(
        connection.last("insert").unwrap().text,
        "CREATE (n:Note {created_at: $p0, text: $p1, updated_at: $p2}) RETURN n"
    );
}
