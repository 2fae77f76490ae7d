use anyhow::{Context, Result};

use crate::error::{TrackerResult, ValidationError};
use crate::storage::{keys, Storage, StorageJsonExt};

/// Names of the people files can be lent to, plus the one currently picked.
pub struct WorkerRegistry<S> {
    storage: S,
}

impl<S: Storage> WorkerRegistry<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn list(&self) -> Result<Vec<String>> {
        match self.storage.get_json::<Vec<String>>(keys::WORKERS)? {
            None => Ok(Vec::new()),
            Some(Ok(workers)) => Ok(workers),
            Some(Err(err)) => {
                tracing::warn!(error = %err, "worker list is corrupted; clearing it");
                self.storage
                    .remove(keys::WORKERS)
                    .context("clearing corrupted worker list")?;
                Ok(Vec::new())
            }
        }
    }

    pub fn add(&self, name: &str) -> TrackerResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::new("Worker name is required").into());
        }
        let mut workers = self.list()?;
        if workers.iter().any(|w| w == name) {
            return Err(ValidationError::new(format!("Worker {name} already exists")).into());
        }
        workers.push(name.to_string());
        self.storage.set_json(keys::WORKERS, &workers)?;
        Ok(())
    }

    /// Returns whether the worker existed. Removing the selected worker
    /// also clears the selection.
    pub fn remove(&self, name: &str) -> Result<bool> {
        let name = name.trim();
        let mut workers = self.list()?;
        let before = workers.len();
        workers.retain(|w| w != name);
        if workers.len() == before {
            return Ok(false);
        }
        self.storage.set_json(keys::WORKERS, &workers)?;
        if self.selected()?.as_deref() == Some(name) {
            self.storage.remove(keys::SELECTED_WORKER)?;
        }
        Ok(true)
    }

    pub fn select(&self, name: &str) -> TrackerResult<()> {
        let name = name.trim();
        if !self.list()?.iter().any(|w| w == name) {
            return Err(ValidationError::new(format!("Unknown worker {name}")).into());
        }
        self.storage.set(keys::SELECTED_WORKER, name)?;
        Ok(())
    }

    pub fn selected(&self) -> Result<Option<String>> {
        Ok(self
            .storage
            .get(keys::SELECTED_WORKER)?
            .filter(|w| !w.is_empty()))
    }
}
