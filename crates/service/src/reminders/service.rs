use std::sync::Arc;

use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use models::appointment::Appointment;

use super::{NotificationScheduler, ReminderPlanner, ScheduledReminder};
use crate::clock::Clock;
use crate::errors::ServiceError;
use crate::storage::{Collection, DataKind, KvStore, UserScope};

/// Keeps the device's scheduled notifications in step with appointments.
#[derive(Clone)]
pub struct ReminderService {
    reminders: Collection<ScheduledReminder>,
    scheduler: Arc<dyn NotificationScheduler>,
    planner: ReminderPlanner,
    clock: Arc<dyn Clock>,
}

impl ReminderService {
    pub fn new(
        store: Arc<dyn KvStore>,
        scheduler: Arc<dyn NotificationScheduler>,
        planner: ReminderPlanner,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { reminders: Collection::new(store, DataKind::ScheduledReminders), scheduler, planner, clock }
    }

    pub async fn list(&self, scope: &UserScope) -> Result<Vec<ScheduledReminder>, ServiceError> {
        self.reminders.load(scope).await
    }

    /// Replace whatever reminder the appointment had with a freshly planned
    /// one. Returns the new reminder, or `None` when nothing was scheduled.
    #[instrument(skip(self, scope, appointment), fields(user_id = %scope.user_id(), appointment_id = %appointment.id))]
    pub async fn sync(&self, scope: &UserScope, appointment: &Appointment) -> Result<Option<ScheduledReminder>, ServiceError> {
        self.cancel(scope, appointment.id).await?;

        let Some(notification) = self.planner.plan(appointment, self.clock.now_local()) else {
            debug!("no reminder planned");
            return Ok(None);
        };
        let notification_id = self.scheduler.schedule(&notification).await.map_err(|e| {
            warn!(error = %e, "reminder scheduling failed");
            e
        })?;
        let reminder = ScheduledReminder {
            appointment_id: appointment.id,
            notification_id,
            fire_at: notification.fire_at,
        };
        let stored = reminder.clone();
        self.reminders.update(scope, move |items| { items.push(stored); Ok(()) }).await?;
        info!(fire_at = %reminder.fire_at, "reminder_synced");
        Ok(Some(reminder))
    }

    /// Withdraw every stored reminder for the appointment; returns how many.
    #[instrument(skip(self, scope), fields(user_id = %scope.user_id()))]
    pub async fn cancel(&self, scope: &UserScope, appointment_id: Uuid) -> Result<usize, ServiceError> {
        let all = self.reminders.load(scope).await?;
        let (matching, rest): (Vec<_>, Vec<_>) = all.into_iter().partition(|r| r.appointment_id == appointment_id);
        if matching.is_empty() {
            return Ok(0);
        }
        for r in &matching {
            self.scheduler.cancel(&r.notification_id).await?;
        }
        self.reminders.save(scope, &rest).await?;
        debug!(count = matching.len(), "reminders cancelled");
        Ok(matching.len())
    }

    /// Withdraw everything scheduled for the user.
    pub async fn cancel_all(&self, scope: &UserScope) -> Result<usize, ServiceError> {
        let all = self.reminders.load(scope).await?;
        for r in &all {
            self.scheduler.cancel(&r.notification_id).await?;
        }
        self.reminders.save(scope, &[]).await?;
        Ok(all.len())
    }
}
