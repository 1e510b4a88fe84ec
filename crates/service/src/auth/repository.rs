use async_trait::async_trait;
use uuid::Uuid;

use models::account::Account;

use super::errors::AuthError;

/// Repository abstraction for account persistence and the device session.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Lookup by email, case-insensitive.
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AuthError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, AuthError>;
    /// Insert a new account; `Conflict` when the email is taken.
    async fn insert(&self, account: Account) -> Result<Account, AuthError>;
    /// Replace an existing account record.
    async fn update(&self, account: Account) -> Result<Account, AuthError>;
    async fn delete(&self, id: Uuid) -> Result<bool, AuthError>;

    async fn get_session(&self) -> Result<Option<Uuid>, AuthError>;
    async fn set_session(&self, account_id: Option<Uuid>) -> Result<(), AuthError>;
}
