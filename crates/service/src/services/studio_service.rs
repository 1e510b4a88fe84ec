use std::sync::Arc;

use tracing::{info, instrument};

use models::studio::{StudioData, StudioPatch};

use crate::errors::ServiceError;
use crate::storage::{Collection, DataKind, KvStore, UserScope};

/// The per-user studio profile (a single record, not a list).
#[derive(Clone)]
pub struct StudioService {
    studio: Collection<StudioData>,
}

impl StudioService {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { studio: Collection::new(store, DataKind::StudioData) }
    }

    /// Stored profile, or defaults when nothing was saved yet.
    pub async fn get(&self, scope: &UserScope) -> Result<StudioData, ServiceError> {
        Ok(self.studio.load_one::<StudioData>(scope).await?.unwrap_or_default())
    }

    #[instrument(skip(self, scope, patch), fields(user_id = %scope.user_id()))]
    pub async fn update(&self, scope: &UserScope, patch: StudioPatch) -> Result<StudioData, ServiceError> {
        let mut data = self.get(scope).await?;
        data.apply(patch)?;
        self.studio.save_one(scope, &data).await?;
        info!("studio_updated");
        Ok(data)
    }
}
