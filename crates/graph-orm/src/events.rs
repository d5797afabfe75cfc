use std::fmt;

use async_trait::async_trait;

use crate::event_error::EventError;
use crate::model::Node;

/// Lifecycle notifications fired while saving a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelEvent {
    Saving,
    Creating,
    Created,
    Updating,
    Updated,
    Saved,
}

impl ModelEvent {
    /// Whether an observer can cancel the operation from this notification
    pub fn is_cancelable(self) -> bool {
        matches!(self, ModelEvent::Saving | ModelEvent::Creating | ModelEvent::Updating)
    }
}

impl fmt::Display for ModelEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ModelEvent::Saving => "saving",
            ModelEvent::Creating => "creating",
            ModelEvent::Created => "created",
            ModelEvent::Updating => "updating",
            ModelEvent::Updated => "updated",
            ModelEvent::Saved => "saved",
        };
        write!(f, "{}", name)
    }
}

/// Observer of node lifecycle notifications.
///
/// Cancelable hooks return `Ok(false)` to veto the operation. A veto is not
/// an error: the save reports `false` and nothing reaches the connection.
#[async_trait]
pub trait ModelObserver: Send + Sync {
    async fn saving(&self, _node: &mut Node) -> Result<bool, EventError> {
        Ok(true)
    }

    async fn creating(&self, _node: &mut Node) -> Result<bool, EventError> {
        Ok(true)
    }

    async fn created(&self, _node: &Node) -> Result<(), EventError> {
        Ok(())
    }

    async fn updating(&self, _node: &mut Node) -> Result<bool, EventError> {
        Ok(true)
    }

    async fn updated(&self, _node: &Node) -> Result<(), EventError> {
        Ok(())
    }

    async fn saved(&self, _node: &Node) -> Result<(), EventError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancelable_events() {
        assert!(ModelEvent::Saving.is_cancelable());
        assert!(ModelEvent::Creating.is_cancelable());
        assert!(ModelEvent::Updating.is_cancelable());
        assert!(!ModelEvent::Saved.is_cancelable());
        assert!(!ModelEvent::Created.is_cancelable());
    }

    #[test]
    fn test_event_display() {
        assert_eq!(ModelEvent::Saving.to_string(), "saving");
        assert_eq!(ModelEvent::Updated.to_string(), "updated");
    }
}
