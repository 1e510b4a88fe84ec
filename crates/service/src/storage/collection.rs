use std::marker::PhantomData;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};

use super::kv_store::{get_json, set_json, KvStore};
use super::namespace::{DataKind, UserScope};
use crate::errors::ServiceError;

/// A whole-list collection stored under one per-user key.
///
/// Reads load the entire list; writes replace it. There is no locking across
/// a load/save pair, so two concurrent updates of the same collection can
/// lose one of the writes.
pub struct Collection<T> {
    store: Arc<dyn KvStore>,
    kind: DataKind,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self { store: Arc::clone(&self.store), kind: self.kind, _marker: PhantomData }
    }
}

impl<T> Collection<T>
where
    T: Serialize + DeserializeOwned + Send + Sync,
{
    pub fn new(store: Arc<dyn KvStore>, kind: DataKind) -> Self {
        Self { store, kind, _marker: PhantomData }
    }

    /// Load the full list; a missing key is an empty list.
    pub async fn load(&self, scope: &UserScope) -> Result<Vec<T>, ServiceError> {
        Ok(get_json::<Vec<T>>(self.store.as_ref(), &scope.key(self.kind)).await?.unwrap_or_default())
    }

    pub async fn save(&self, scope: &UserScope, items: &[T]) -> Result<(), ServiceError> {
        set_json(self.store.as_ref(), &scope.key(self.kind), items).await
    }

    /// Load, apply `f`, and save when `f` succeeds. Nothing is written on error.
    pub async fn update<F, R>(&self, scope: &UserScope, f: F) -> Result<R, ServiceError>
    where
        F: FnOnce(&mut Vec<T>) -> Result<R, ServiceError>,
    {
        let mut items = self.load(scope).await?;
        let out = f(&mut items)?;
        self.save(scope, &items).await?;
        Ok(out)
    }

    /// Read a single value stored under this kind (singleton records).
    pub async fn load_one<V: DeserializeOwned>(&self, scope: &UserScope) -> Result<Option<V>, ServiceError> {
        get_json(self.store.as_ref(), &scope.key(self.kind)).await
    }

    pub async fn save_one<V: Serialize + Sync>(&self, scope: &UserScope, value: &V) -> Result<(), ServiceError> {
        set_json(self.store.as_ref(), &scope.key(self.kind), value).await
    }
}
