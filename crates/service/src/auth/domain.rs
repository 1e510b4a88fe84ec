use serde::{Deserialize, Serialize};
use uuid::Uuid;

use models::account::{AccessState, Account};

/// Registration input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterInput {
    pub email: String,
    pub name: String,
    pub password: String,
}

/// Login input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangePasswordInput {
    pub current_password: String,
    pub new_password: String,
}

/// Domain user (business view, no credentials)
#[derive(Debug, Clone, Serialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub access: AccessState,
}

impl AuthUser {
    pub fn from_account(account: &Account, access: AccessState) -> Self {
        Self { id: account.id, email: account.email.clone(), name: account.name.clone(), access }
    }
}

/// Login result (session)
#[derive(Debug, Clone, Serialize)]
pub struct AuthSession {
    pub user: AuthUser,
    pub token: Option<String>,
}
