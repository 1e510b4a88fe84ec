use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, instrument};
use uuid::Uuid;

use models::client::{Client, ClientPatch, NewClient};

use crate::clock::Clock;
use crate::errors::ServiceError;
use crate::pagination::{Page, Pagination};
use crate::storage::{Collection, DataKind, KvStore, UserScope};

#[derive(Clone)]
pub struct ClientService {
    clients: Collection<Client>,
    clock: Arc<dyn Clock>,
}

fn sort_by_name(clients: &mut [Client]) {
    clients.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()).then(a.created_at.cmp(&b.created_at)));
}

impl ClientService {
    pub fn new(store: Arc<dyn KvStore>, clock: Arc<dyn Clock>) -> Self {
        Self { clients: Collection::new(store, DataKind::Clients), clock }
    }

    /// Create a client with zeroed session counters.
    #[instrument(skip(self, scope, input), fields(user_id = %scope.user_id()))]
    pub async fn create(&self, scope: &UserScope, input: NewClient) -> Result<Client, ServiceError> {
        let client = Client::create(input, self.clock.now_utc())?;
        let stored = client.clone();
        self.clients.update(scope, move |items| { items.push(stored); Ok(()) }).await?;
        info!(client_id = %client.id, "client_created");
        Ok(client)
    }

    pub async fn get(&self, scope: &UserScope, id: Uuid) -> Result<Option<Client>, ServiceError> {
        Ok(self.clients.load(scope).await?.into_iter().find(|c| c.id == id))
    }

    pub async fn require(&self, scope: &UserScope, id: Uuid) -> Result<Client, ServiceError> {
        self.get(scope, id).await?.ok_or_else(|| ServiceError::not_found("client"))
    }

    /// All clients sorted by name, case-insensitively.
    pub async fn list(&self, scope: &UserScope) -> Result<Vec<Client>, ServiceError> {
        let mut clients = self.clients.load(scope).await?;
        sort_by_name(&mut clients);
        Ok(clients)
    }

    pub async fn list_paginated(&self, scope: &UserScope, opts: Pagination) -> Result<Page<Client>, ServiceError> {
        Ok(opts.apply(self.list(scope).await?))
    }

    /// Substring search over name, phone, email and instagram.
    pub async fn search(&self, scope: &UserScope, query: &str) -> Result<Vec<Client>, ServiceError> {
        let mut found: Vec<Client> = self.clients.load(scope).await?.into_iter().filter(|c| c.matches(query)).collect();
        sort_by_name(&mut found);
        Ok(found)
    }

    #[instrument(skip(self, scope, patch), fields(user_id = %scope.user_id()))]
    pub async fn update(&self, scope: &UserScope, id: Uuid, patch: ClientPatch) -> Result<Client, ServiceError> {
        let updated = self
            .clients
            .update(scope, |items| {
                let client = items.iter_mut().find(|c| c.id == id).ok_or_else(|| ServiceError::not_found("client"))?;
                client.apply(patch)?;
                Ok(client.clone())
            })
            .await?;
        info!(client_id = %id, "client_updated");
        Ok(updated)
    }

    /// Delete a client. Appointments keep their copied name.
    #[instrument(skip(self, scope), fields(user_id = %scope.user_id()))]
    pub async fn delete(&self, scope: &UserScope, id: Uuid) -> Result<bool, ServiceError> {
        let mut items = self.clients.load(scope).await?;
        let before = items.len();
        items.retain(|c| c.id != id);
        if items.len() == before {
            return Ok(false);
        }
        self.clients.save(scope, &items).await?;
        info!(client_id = %id, "client_deleted");
        Ok(true)
    }

    pub async fn record_session(&self, scope: &UserScope, id: Uuid, on: NaiveDate) -> Result<Client, ServiceError> {
        self.clients
            .update(scope, |items| {
                let client = items.iter_mut().find(|c| c.id == id).ok_or_else(|| ServiceError::not_found("client"))?;
                client.record_session(on);
                Ok(client.clone())
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TestEnv;

    fn new_client(name: &str) -> NewClient {
        NewClient { name: name.into(), ..Default::default() }
    }

    #[tokio::test]
    async fn client_crud_service() -> anyhow::Result<()> {
        let env = TestEnv::new();
        let svc = &env.app.clients;
        let scope = env.scope();

        let c = svc.create(&scope, new_client("Ana")).await?;
        let listed = svc.list(&scope).await?;
        assert_eq!(listed.iter().filter(|x| x.id == c.id).count(), 1);

        let updated = svc
            .update(&scope, c.id, ClientPatch { phone: Some("555-1234".into()), ..Default::default() })
            .await?;
        assert_eq!(updated.phone, "555-1234");
        assert_eq!(svc.require(&scope, c.id).await?.phone, "555-1234");

        assert!(svc.delete(&scope, c.id).await?);
        assert!(!svc.delete(&scope, c.id).await?);
        assert!(svc.get(&scope, c.id).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn list_sorted_case_insensitively_and_paginated() -> anyhow::Result<()> {
        let env = TestEnv::new();
        let svc = &env.app.clients;
        let scope = env.scope();
        for name in ["carla", "Bia", "alex"] {
            svc.create(&scope, new_client(name)).await?;
        }
        let names: Vec<String> = svc.list(&scope).await?.into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["alex", "Bia", "carla"]);

        let page = svc.list_paginated(&scope, Pagination { page: 2, per_page: 2 }).await?;
        assert_eq!(page.total, 3);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].name, "carla");
        Ok(())
    }

    #[tokio::test]
    async fn search_and_update_missing() -> anyhow::Result<()> {
        let env = TestEnv::new();
        let svc = &env.app.clients;
        let scope = env.scope();
        svc.create(&scope, NewClient { name: "Davi".into(), email: "davi@ink.com".into(), ..Default::default() }).await?;
        svc.create(&scope, new_client("Eva")).await?;
        assert_eq!(svc.search(&scope, "INK.com").await?.len(), 1);
        assert_eq!(svc.search(&scope, "").await?.len(), 2);

        let missing = svc.update(&scope, Uuid::new_v4(), ClientPatch::default()).await;
        assert!(matches!(missing, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn other_users_cannot_see_clients() -> anyhow::Result<()> {
        let env = TestEnv::new();
        let svc = &env.app.clients;
        let a = env.scope();
        let b = env.scope();
        let c = svc.create(&a, new_client("Private")).await?;
        assert!(svc.list(&b).await?.is_empty());
        assert!(svc.get(&b, c.id).await?.is_none());
        Ok(())
    }
}
