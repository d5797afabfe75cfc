//! Node Persistence - Save state machine
//!
//! `saving` (cancelable) → insert for new nodes / update for stored nodes →
//! finishing step. A vetoed save reports `Ok(false)` and sends nothing to
//! the connection.

use crate::error::{ModelError, ModelResult};
use crate::events::ModelEvent;

use super::node::Node;

impl Node {
    /// Save the node, inserting or updating depending on whether it exists
    pub async fn save(&mut self) -> ModelResult<bool> {
        let registry = self.registry().clone();

        if !registry.observers().until(ModelEvent::Saving, self).await? {
            return Ok(false);
        }

        let saved = if self.exists() {
            tracing::debug!("Saving existing {} node via update", self.entity().identity());
            self.perform_update().await?
        } else {
            tracing::debug!("Saving new {} node via insert", self.entity().identity());
            self.perform_insert().await?
        };

        if saved {
            self.finish_save().await?;
        }

        Ok(saved)
    }

    async fn perform_insert(&mut self) -> ModelResult<bool> {
        let registry = self.registry().clone();

        if !registry.observers().until(ModelEvent::Creating, self).await? {
            return Ok(false);
        }

        if registry.uses_timestamps(self.entity()) {
            self.add_timestamps();
        }

        let connection = registry.connection().clone();
        let statement = connection
            .grammar()
            .compile_insert(&self.labels(), self.attributes())?;
        tracing::trace!("Insert statement: {}", statement);

        let generated = connection.insert(&statement).await?;
        if self.key().is_none() {
            match generated {
                Some(key) => {
                    let key_name = self.key_name().to_string();
                    self.set(&key_name, key);
                }
                None => tracing::warn!(
                    "Connection returned no key for new {} node",
                    self.entity().identity()
                ),
            }
        }

        self.mark_existing();
        registry.observers().notify(ModelEvent::Created, self).await?;
        Ok(true)
    }

    async fn perform_update(&mut self) -> ModelResult<bool> {
        let registry = self.registry().clone();

        if !self.is_dirty() {
            return Ok(true);
        }

        if !registry.observers().until(ModelEvent::Updating, self).await? {
            return Ok(false);
        }

        if registry.uses_timestamps(self.entity()) {
            self.add_timestamps();
        }

        let key = self.key_for_save().cloned().ok_or(ModelError::MissingPrimaryKey)?;
        let dirty = self.get_dirty();
        if dirty.is_empty() {
            return Ok(true);
        }

        let connection = registry.connection().clone();
        let statement = connection
            .grammar()
            .compile_update(&self.labels(), self.key_name(), &key, &dirty)?;
        tracing::trace!("Update statement: {}", statement);

        let touched = connection.update(&statement).await?;
        if touched == 0 {
            tracing::warn!(
                "Update of {} node {} touched nothing",
                self.entity().identity(),
                key
            );
        }

        registry.observers().notify(ModelEvent::Updated, self).await?;
        Ok(true)
    }

    async fn finish_save(&mut self) -> ModelResult<()> {
        let registry = self.registry().clone();
        registry.observers().notify(ModelEvent::Saved, self).await?;
        self.sync_original();
        Ok(())
    }
}
