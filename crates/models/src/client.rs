use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub instagram: String,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub total_sessions: u32,
    #[serde(default)]
    pub last_session_at: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a client.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct NewClient {
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub instagram: String,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: String,
}

/// Partial update; `None` leaves a field untouched.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ClientPatch {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub instagram: Option<String>,
    pub birth_date: Option<Option<NaiveDate>>,
    pub notes: Option<String>,
}

impl Client {
    pub fn create(input: NewClient, now: DateTime<Utc>) -> Result<Self, ModelError> {
        Ok(Self {
            id: Uuid::new_v4(),
            name: crate::validate_name("name", &input.name)?,
            phone: input.phone.trim().to_string(),
            email: crate::validate_optional_email(&input.email)?,
            instagram: normalize_handle(&input.instagram),
            birth_date: input.birth_date,
            notes: input.notes,
            total_sessions: 0,
            last_session_at: None,
            created_at: now,
        })
    }

    pub fn apply(&mut self, patch: ClientPatch) -> Result<(), ModelError> {
        // validate everything before touching self
        let name = patch.name.as_deref().map(|n| crate::validate_name("name", n)).transpose()?;
        let email = patch.email.as_deref().map(crate::validate_optional_email).transpose()?;
        if let Some(n) = name { self.name = n; }
        if let Some(e) = email { self.email = e; }
        if let Some(p) = patch.phone { self.phone = p.trim().to_string(); }
        if let Some(i) = patch.instagram { self.instagram = normalize_handle(&i); }
        if let Some(b) = patch.birth_date { self.birth_date = b; }
        if let Some(n) = patch.notes { self.notes = n; }
        Ok(())
    }

    /// Count a session; `last_session_at` only moves forward.
    pub fn record_session(&mut self, on: NaiveDate) {
        self.total_sessions = self.total_sessions.saturating_add(1);
        self.last_session_at = Some(match self.last_session_at {
            Some(prev) if prev > on => prev,
            _ => on,
        });
    }

    /// Case-insensitive substring match over the contact fields.
    pub fn matches(&self, query: &str) -> bool {
        let q = query.trim().to_lowercase();
        if q.is_empty() {
            return true;
        }
        [&self.name, &self.phone, &self.email, &self.instagram]
            .iter()
            .any(|field| field.to_lowercase().contains(&q))
    }
}

fn normalize_handle(handle: &str) -> String {
    handle.trim().trim_start_matches('@').to_string()
}
