//! Per-user key namespacing.
//!
//! Keys are `{prefix}:{user_id}:{tag}`. This separates users sharing one
//! device by naming convention only: anyone holding a user id can read that
//! user's keys.

use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

pub const DEFAULT_PREFIX: &str = "@inkbook";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DataKind {
    Clients,
    Appointments,
    DesignFolders,
    DesignImages,
    PriceCategories,
    PriceItems,
    MessageTemplates,
    StudioData,
    ScheduledReminders,
}

impl DataKind {
    pub const ALL: [DataKind; 9] = [
        DataKind::Clients,
        DataKind::Appointments,
        DataKind::DesignFolders,
        DataKind::DesignImages,
        DataKind::PriceCategories,
        DataKind::PriceItems,
        DataKind::MessageTemplates,
        DataKind::StudioData,
        DataKind::ScheduledReminders,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            DataKind::Clients => "clients",
            DataKind::Appointments => "appointments",
            DataKind::DesignFolders => "design_folders",
            DataKind::DesignImages => "design_images",
            DataKind::PriceCategories => "price_categories",
            DataKind::PriceItems => "price_items",
            DataKind::MessageTemplates => "message_templates",
            DataKind::StudioData => "studio_data",
            DataKind::ScheduledReminders => "scheduled_reminders",
        }
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Root of the key space. Hands out [`UserScope`]s and the global keys.
#[derive(Clone, Debug)]
pub struct Namespace {
    prefix: Arc<str>,
}

impl Default for Namespace {
    fn default() -> Self { Self::new(DEFAULT_PREFIX) }
}

impl Namespace {
    pub fn new(prefix: &str) -> Self {
        Self { prefix: Arc::from(prefix) }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn scope(&self, user_id: Uuid) -> UserScope {
        UserScope { prefix: Arc::clone(&self.prefix), user_id }
    }

    pub fn accounts_key(&self) -> String {
        format!("{}:accounts", self.prefix)
    }

    pub fn session_key(&self) -> String {
        format!("{}:session", self.prefix)
    }
}

/// Key derivation for one user's data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserScope {
    prefix: Arc<str>,
    user_id: Uuid,
}

impl UserScope {
    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn key(&self, kind: DataKind) -> String {
        format!("{}:{}:{}", self.prefix, self.user_id, kind.tag())
    }

    /// Prefix shared by every key of this user, trailing separator included.
    pub fn key_prefix(&self) -> String {
        format!("{}:{}:", self.prefix, self.user_id)
    }

    pub fn all_keys(&self) -> Vec<String> {
        DataKind::ALL.iter().map(|k| self.key(*k)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_layout() {
        let ns = Namespace::new("@studio");
        let uid = Uuid::nil();
        let scope = ns.scope(uid);
        assert_eq!(scope.key(DataKind::Clients), format!("@studio:{uid}:clients"));
        assert_eq!(ns.accounts_key(), "@studio:accounts");
        assert_eq!(ns.session_key(), "@studio:session");
        assert!(scope.key(DataKind::StudioData).starts_with(&scope.key_prefix()));
    }

    #[test]
    fn scopes_of_different_users_never_share_keys() {
        let ns = Namespace::default();
        let a = ns.scope(Uuid::new_v4());
        let b = ns.scope(Uuid::new_v4());
        for kind in DataKind::ALL {
            assert_ne!(a.key(kind), b.key(kind));
        }
        assert_eq!(a.all_keys().len(), DataKind::ALL.len());
    }

    #[test]
    fn tags_are_unique() {
        let mut tags: Vec<&str> = DataKind::ALL.iter().map(|k| k.tag()).collect();
        tags.sort();
        tags.dedup();
        assert_eq!(tags.len(), DataKind::ALL.len());
    }
}
