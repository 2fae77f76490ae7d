use anyhow::Result;
use serde::{de::DeserializeOwned, Serialize};

/// Keys of the single local namespace every piece of persisted state lives in.
pub mod keys {
    pub const RECORDS: &str = "fileStorageTrackerData";
    pub const ACCOUNT: &str = "fileStorageTrackerAccount";
    pub const CURRENT_USER: &str = "currentUser";
    pub const THEME: &str = "theme";
    pub const WORKERS: &str = "workers";
    pub const SELECTED_WORKER: &str = "selectedWorker";
    pub const SORT_MODE: &str = "sortMode";
}

/// String key-value namespace. Values are opaque text, usually JSON.
pub trait Storage {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    /// Returns whether a value was present.
    fn remove(&self, key: &str) -> Result<bool>;
}

impl<S: Storage + ?Sized> Storage for std::sync::Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<bool> {
        (**self).remove(key)
    }
}

pub trait StorageJsonExt: Storage {
    /// Outer `Result` is the backend; inner is the decode of whatever was stored.
    fn get_json<T: DeserializeOwned>(
        &self,
        key: &str,
    ) -> Result<Option<Result<T, serde_json::Error>>> {
        Ok(self.get(key)?.map(|raw| serde_json::from_str::<T>(&raw)))
    }

    fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.set(key, &raw)
    }
}

impl<T: Storage + ?Sized> StorageJsonExt for T {}
