use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

use crate::errors::ServiceError;

/// Device-local key-value storage. Values are opaque strings.
/// Implementations can be file-backed, in-memory, or platform storage.
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, ServiceError>;
    async fn set(&self, key: &str, value: String) -> Result<(), ServiceError>;
    /// Remove a key; returns whether it existed.
    async fn remove(&self, key: &str) -> Result<bool, ServiceError>;
    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, ServiceError>;

    /// Remove several keys; returns how many existed.
    async fn remove_many(&self, keys: &[String]) -> Result<usize, ServiceError> {
        let mut removed = 0;
        for key in keys {
            if self.remove(key).await? {
                removed += 1;
            }
        }
        Ok(removed)
    }
}

/// Read and deserialize a JSON value; a missing key is `None`.
pub async fn get_json<T: DeserializeOwned>(store: &dyn KvStore, key: &str) -> Result<Option<T>, ServiceError> {
    match store.get(key).await? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

pub async fn set_json<T: Serialize + ?Sized + Sync>(store: &dyn KvStore, key: &str, value: &T) -> Result<(), ServiceError> {
    let raw = serde_json::to_string(value)?;
    store.set(key, raw).await
}
