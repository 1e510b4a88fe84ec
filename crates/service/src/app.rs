//! Wires every per-user service onto one store, clock and scheduler.

use std::sync::Arc;

use chrono::NaiveDateTime;
use tracing::info;
use uuid::Uuid;

use crate::auth::errors::AuthError;
use crate::auth::repo::KvAccountRepository;
use crate::auth::{AuthConfig, AuthService};
use crate::clock::Clock;
use crate::errors::ServiceError;
use crate::reminders::{NotificationScheduler, ReminderPlanner, ReminderService};
use crate::services::{
    AppointmentService, CatalogService, ClientService, PriceService, StudioService, TemplateService,
};
use crate::storage::{KvStore, Namespace, UserScope};

/// Settings the facade needs from the loaded configuration.
#[derive(Clone, Debug, Default)]
pub struct AppSettings {
    pub namespace: Namespace,
    pub reminder_offset_minutes: i64,
    pub auth: AuthConfig,
}

impl From<&configs::AppConfig> for AppSettings {
    fn from(cfg: &configs::AppConfig) -> Self {
        Self {
            namespace: Namespace::new(&cfg.storage.key_prefix),
            reminder_offset_minutes: cfg.reminders.offset_minutes,
            auth: AuthConfig::from(&cfg.auth),
        }
    }
}

pub struct StudioApp {
    pub namespace: Namespace,
    pub clients: ClientService,
    pub appointments: AppointmentService,
    pub catalog: CatalogService,
    pub prices: PriceService,
    pub templates: TemplateService,
    pub studio: StudioService,
    pub reminders: ReminderService,
    pub auth: AuthService<KvAccountRepository>,
    clock: Arc<dyn Clock>,
}

impl StudioApp {
    pub fn new(
        store: Arc<dyn KvStore>,
        scheduler: Arc<dyn NotificationScheduler>,
        clock: Arc<dyn Clock>,
        settings: AppSettings,
    ) -> Self {
        let planner = if settings.reminder_offset_minutes > 0 {
            ReminderPlanner::new(settings.reminder_offset_minutes)
        } else {
            ReminderPlanner::default()
        };
        let reminders = ReminderService::new(store.clone(), scheduler, planner, clock.clone());
        let clients = ClientService::new(store.clone(), clock.clone());
        let appointments = AppointmentService::new(store.clone(), clients.clone(), reminders.clone(), clock.clone());
        let studio = StudioService::new(store.clone());
        let templates = TemplateService::new(store.clone(), appointments.clone(), studio.clone(), clock.clone());
        let catalog = CatalogService::new(store.clone(), clock.clone());
        let prices = PriceService::new(store.clone(), clock.clone());

        let repo = Arc::new(KvAccountRepository::new(store.clone(), settings.namespace.clone()));
        let auth = AuthService::new(repo, store, settings.namespace.clone(), settings.auth, clock.clone());

        Self {
            namespace: settings.namespace,
            clients,
            appointments,
            catalog,
            prices,
            templates,
            studio,
            reminders,
            auth,
            clock,
        }
    }

    /// Device wall-clock time, the reference for "upcoming".
    pub fn now_local(&self) -> NaiveDateTime {
        self.clock.now_local()
    }

    pub fn scope(&self, user_id: Uuid) -> UserScope {
        self.namespace.scope(user_id)
    }

    /// Cancel the user's pending notifications, then remove the account and
    /// all of its data.
    pub async fn delete_account(&self, user_id: Uuid) -> Result<usize, ServiceError> {
        let to_service = |e: AuthError| match e {
            AuthError::NotFound => ServiceError::not_found("account"),
            other => ServiceError::Storage(other.to_string()),
        };
        self.auth.get_user(user_id).await.map_err(to_service)?;
        let scope = self.scope(user_id);
        let cancelled = self.reminders.cancel_all(&scope).await?;
        let removed = self.auth.delete_account(user_id).await.map_err(to_service)?;
        info!(user_id = %user_id, cancelled, removed, "account data wiped");
        Ok(removed)
    }
}
