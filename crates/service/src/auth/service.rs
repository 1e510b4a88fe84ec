use std::sync::Arc;

use argon2::{password_hash::{PasswordHasher, PasswordVerifier, SaltString}, Argon2, PasswordHash};
use chrono::Duration;
use rand::rngs::OsRng;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use models::account::{AccessState, Account};

use super::domain::{AuthSession, AuthUser, ChangePasswordInput, LoginInput, RegisterInput};
use super::errors::AuthError;
use super::repository::AccountRepository;
use super::token;
use crate::clock::Clock;
use crate::storage::{KvStore, Namespace};

/// Longest period a single activation may buy.
pub const MAX_SUBSCRIPTION_MONTHS: u32 = 120;

/// Auth service configuration
#[derive(Clone, Debug)]
pub struct AuthConfig {
    /// When set, `login` also issues a bearer token.
    pub jwt_secret: Option<String>,
    pub trial_days: i64,
    pub min_password_len: usize,
    pub token_ttl_hours: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self { jwt_secret: None, trial_days: 7, min_password_len: 6, token_ttl_hours: 12 }
    }
}

impl From<&configs::AuthConfig> for AuthConfig {
    fn from(c: &configs::AuthConfig) -> Self {
        let secret = c.jwt_secret.trim();
        Self {
            jwt_secret: (!secret.is_empty()).then(|| secret.to_string()),
            trial_days: c.trial_days,
            min_password_len: c.min_password_len,
            token_ttl_hours: c.token_ttl_hours,
        }
    }
}

/// Local auth business service
pub struct AuthService<R: AccountRepository> {
    repo: Arc<R>,
    data: Arc<dyn KvStore>,
    namespace: Namespace,
    cfg: AuthConfig,
    clock: Arc<dyn Clock>,
}

fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::HashError(e.to_string()))?
        .to_string())
}

fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(hash).map_err(|e| AuthError::HashError(e.to_string()))?;
    Ok(Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok())
}

impl<R: AccountRepository> AuthService<R> {
    pub fn new(repo: Arc<R>, data: Arc<dyn KvStore>, namespace: Namespace, cfg: AuthConfig, clock: Arc<dyn Clock>) -> Self {
        Self { repo, data, namespace, cfg, clock }
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    fn check_password(&self, password: &str) -> Result<(), AuthError> {
        if password.chars().count() < self.cfg.min_password_len {
            return Err(AuthError::Validation(format!("password too short (>={})", self.cfg.min_password_len)));
        }
        Ok(())
    }

    fn user_view(&self, account: &Account) -> AuthUser {
        AuthUser::from_account(account, account.access_state(self.clock.now_utc()))
    }

    /// Register a new account with a hashed password; the trial starts now.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::auth::{AuthConfig, AuthService, domain::RegisterInput, repo::KvAccountRepository};
    /// use service::clock::SystemClock;
    /// use service::storage::{KvStore, MemoryKvStore, Namespace};
    /// let store: Arc<dyn KvStore> = Arc::new(MemoryKvStore::new());
    /// let repo = Arc::new(KvAccountRepository::new(store.clone(), Namespace::default()));
    /// let svc = AuthService::new(repo, store, Namespace::default(), AuthConfig::default(), Arc::new(SystemClock));
    /// let input = RegisterInput { email: "Ink@Example.com".into(), name: "Ink".into(), password: "Secret123".into() };
    /// let user = tokio_test::block_on(svc.register(input)).unwrap();
    /// assert_eq!(user.email, "ink@example.com");
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: RegisterInput) -> Result<AuthUser, AuthError> {
        let email = models::validate_email(&input.email).map_err(|e| AuthError::Validation(e.to_string()))?.to_lowercase();
        let name = models::validate_name("name", &input.name).map_err(|e| AuthError::Validation(e.to_string()))?;
        self.check_password(&input.password)?;
        if let Some(existing) = self.repo.find_by_email(&email).await? {
            debug!("account exists: {}", existing.email);
            return Err(AuthError::Conflict);
        }

        let hash = hash_password(&input.password)?;
        let account = Account::new(email, name, hash, self.clock.now_utc(), self.cfg.trial_days);
        let account = self.repo.insert(account).await?;
        info!(account_id = %account.id, email = %account.email, "account_registered");
        Ok(self.user_view(&account))
    }

    /// Verify credentials, mark the account as the device session and
    /// optionally issue a token.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let account = self
            .repo
            .find_by_email(input.email.trim())
            .await?
            .ok_or(AuthError::Unauthorized)?;
        if !verify_password(&input.password, &account.password_hash)? {
            warn!(account_id = %account.id, "login_rejected");
            return Err(AuthError::Unauthorized);
        }

        self.repo.set_session(Some(account.id)).await?;
        let token = match &self.cfg.jwt_secret {
            Some(secret) => Some(token::issue_token(
                secret,
                account.id,
                &account.email,
                self.clock.now_utc(),
                Duration::hours(self.cfg.token_ttl_hours),
            )?),
            None => None,
        };
        info!(account_id = %account.id, "login_succeeded");
        Ok(AuthSession { user: self.user_view(&account), token })
    }

    pub async fn logout(&self) -> Result<(), AuthError> {
        self.repo.set_session(None).await?;
        info!("logged_out");
        Ok(())
    }

    /// The signed-in account, if any. A session pointing at a deleted account
    /// is cleared.
    pub async fn current_user(&self) -> Result<Option<AuthUser>, AuthError> {
        let Some(id) = self.repo.get_session().await? else {
            return Ok(None);
        };
        match self.repo.find_by_id(id).await? {
            Some(account) => Ok(Some(self.user_view(&account))),
            None => {
                warn!(account_id = %id, "stale session cleared");
                self.repo.set_session(None).await?;
                Ok(None)
            }
        }
    }

    pub async fn get_user(&self, account_id: Uuid) -> Result<AuthUser, AuthError> {
        let account = self.repo.find_by_id(account_id).await?.ok_or(AuthError::NotFound)?;
        Ok(self.user_view(&account))
    }

    pub async fn access_state(&self, account_id: Uuid) -> Result<AccessState, AuthError> {
        let account = self.repo.find_by_id(account_id).await?.ok_or(AuthError::NotFound)?;
        Ok(account.access_state(self.clock.now_utc()))
    }

    /// Fails with `Expired` when the trial and any subscription are over.
    pub async fn require_access(&self, account_id: Uuid) -> Result<AccessState, AuthError> {
        let state = self.access_state(account_id).await?;
        if !state.has_access() {
            return Err(AuthError::Expired);
        }
        Ok(state)
    }

    #[instrument(skip(self))]
    pub async fn activate_subscription(&self, account_id: Uuid, months: u32) -> Result<AuthUser, AuthError> {
        if !(1..=MAX_SUBSCRIPTION_MONTHS).contains(&months) {
            return Err(AuthError::Validation(format!("months must be in 1..={MAX_SUBSCRIPTION_MONTHS}")));
        }
        let mut account = self.repo.find_by_id(account_id).await?.ok_or(AuthError::NotFound)?;
        let until = account
            .activate_subscription(months, self.clock.now_utc())
            .map_err(|e| AuthError::Validation(e.to_string()))?;
        let account = self.repo.update(account).await?;
        info!(account_id = %account_id, until = %until, "subscription_activated");
        Ok(self.user_view(&account))
    }

    /// Stop the paid period now; access falls back to whatever trial is left.
    #[instrument(skip(self))]
    pub async fn cancel_subscription(&self, account_id: Uuid) -> Result<AuthUser, AuthError> {
        let mut account = self.repo.find_by_id(account_id).await?.ok_or(AuthError::NotFound)?;
        account.cancel_subscription();
        let account = self.repo.update(account).await?;
        info!(account_id = %account_id, "subscription_cancelled");
        Ok(self.user_view(&account))
    }

    #[instrument(skip(self, input))]
    pub async fn change_password(&self, account_id: Uuid, input: ChangePasswordInput) -> Result<(), AuthError> {
        let mut account = self.repo.find_by_id(account_id).await?.ok_or(AuthError::NotFound)?;
        if !verify_password(&input.current_password, &account.password_hash)? {
            return Err(AuthError::Unauthorized);
        }
        self.check_password(&input.new_password)?;
        account.password_hash = hash_password(&input.new_password)?;
        self.repo.update(account).await?;
        info!(account_id = %account_id, "password_changed");
        Ok(())
    }

    /// Remove the account and every key in its namespace. Returns how many
    /// data keys were removed.
    #[instrument(skip(self))]
    pub async fn delete_account(&self, account_id: Uuid) -> Result<usize, AuthError> {
        if !self.repo.delete(account_id).await? {
            return Err(AuthError::NotFound);
        }
        let scope = self.namespace.scope(account_id);
        let keys = self.data.keys_with_prefix(&scope.key_prefix()).await?;
        let removed = self.data.remove_many(&keys).await?;
        if self.repo.get_session().await? == Some(account_id) {
            self.repo.set_session(None).await?;
        }
        info!(account_id = %account_id, keys_removed = removed, "account_deleted");
        Ok(removed)
    }

    /// Resolve a bearer token to an account id.
    pub fn verify_token(&self, token: &str) -> Result<Uuid, AuthError> {
        let secret = self.cfg.jwt_secret.as_deref().ok_or_else(|| AuthError::TokenError("tokens disabled".into()))?;
        token::verify_token(secret, token, self.clock.now_utc())
    }
}
