use std::sync::Arc;

use dashmap::DashMap;

use crate::event_error::EventError;
use crate::events::{ModelEvent, ModelObserver};
use crate::model::Node;

/// Observers registered per entity identity
#[derive(Default)]
pub struct ObserverRegistry {
    observers: DashMap<String, Vec<Arc<dyn ModelObserver>>>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, identity: &str, observer: Arc<dyn ModelObserver>) {
        self.observers
            .entry(identity.to_string())
            .or_default()
            .push(observer);
    }

    pub fn observer_count(&self, identity: &str) -> usize {
        self.observers.get(identity).map_or(0, |list| list.len())
    }

    pub fn has_observers_for(&self, identity: &str) -> bool {
        self.observer_count(identity) > 0
    }

    // Snapshot so no map guard is held across an await point
    fn observers_for(&self, identity: &str) -> Vec<Arc<dyn ModelObserver>> {
        self.observers
            .get(identity)
            .map(|list| list.clone())
            .unwrap_or_default()
    }

    /// Fire a cancelable notification; stops at the first veto
    pub async fn until(&self, event: ModelEvent, node: &mut Node) -> Result<bool, EventError> {
        for observer in self.observers_for(node.entity().identity()) {
            let proceed = match event {
                ModelEvent::Saving => observer.saving(node).await?,
                ModelEvent::Creating => observer.creating(node).await?,
                ModelEvent::Updating => observer.updating(node).await?,
                other => {
                    return Err(EventError::observer(&format!(
                        "'{}' is not a cancelable notification",
                        other
                    )))
                }
            };

            if !proceed {
                tracing::debug!("'{}' vetoed for {}", event, node.entity().identity());
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Fire a post-operation notification
    pub async fn notify(&self, event: ModelEvent, node: &Node) -> Result<(), EventError> {
        for observer in self.observers_for(node.entity().identity()) {
            match event {
                ModelEvent::Created => observer.created(node).await?,
                ModelEvent::Updated => observer.updated(node).await?,
                ModelEvent::Saved => observer.saved(node).await?,
                other => {
                    return Err(EventError::observer(&format!(
                        "'{}' must be fired as a cancelable notification",
                        other
                    )))
                }
            }
        }
        Ok(())
    }
}
