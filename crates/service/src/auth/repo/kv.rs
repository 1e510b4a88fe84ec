use std::sync::Arc;

use uuid::Uuid;

use models::account::Account;

use crate::auth::errors::AuthError;
use crate::auth::repository::AccountRepository;
use crate::storage::{get_json, set_json, KvStore, Namespace};

/// Accounts stored as one list under the global accounts key.
pub struct KvAccountRepository {
    store: Arc<dyn KvStore>,
    namespace: Namespace,
}

impl KvAccountRepository {
    pub fn new(store: Arc<dyn KvStore>, namespace: Namespace) -> Self {
        Self { store, namespace }
    }

    async fn load(&self) -> Result<Vec<Account>, AuthError> {
        Ok(get_json::<Vec<Account>>(self.store.as_ref(), &self.namespace.accounts_key()).await?.unwrap_or_default())
    }

    async fn save(&self, accounts: &[Account]) -> Result<(), AuthError> {
        set_json(self.store.as_ref(), &self.namespace.accounts_key(), accounts).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl AccountRepository for KvAccountRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AuthError> {
        Ok(self.load().await?.into_iter().find(|a| a.email.eq_ignore_ascii_case(email)))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, AuthError> {
        Ok(self.load().await?.into_iter().find(|a| a.id == id))
    }

    async fn insert(&self, account: Account) -> Result<Account, AuthError> {
        let mut accounts = self.load().await?;
        if accounts.iter().any(|a| a.email.eq_ignore_ascii_case(&account.email)) {
            return Err(AuthError::Conflict);
        }
        accounts.push(account.clone());
        self.save(&accounts).await?;
        Ok(account)
    }

    async fn update(&self, account: Account) -> Result<Account, AuthError> {
        let mut accounts = self.load().await?;
        let slot = accounts.iter_mut().find(|a| a.id == account.id).ok_or(AuthError::NotFound)?;
        *slot = account.clone();
        self.save(&accounts).await?;
        Ok(account)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AuthError> {
        let mut accounts = self.load().await?;
        let before = accounts.len();
        accounts.retain(|a| a.id != id);
        if accounts.len() == before {
            return Ok(false);
        }
        self.save(&accounts).await?;
        Ok(true)
    }

    async fn get_session(&self) -> Result<Option<Uuid>, AuthError> {
        Ok(get_json::<Uuid>(self.store.as_ref(), &self.namespace.session_key()).await?)
    }

    async fn set_session(&self, account_id: Option<Uuid>) -> Result<(), AuthError> {
        let key = self.namespace.session_key();
        match account_id {
            Some(id) => set_json(self.store.as_ref(), &key, &id).await?,
            None => {
                self.store.remove(&key).await?;
            }
        }
        Ok(())
    }
}
