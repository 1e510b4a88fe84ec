use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use models::appointment::{Appointment, AppointmentPatch, AppointmentStatus, NewAppointment};

use super::client_service::ClientService;
use crate::clock::Clock;
use crate::errors::ServiceError;
use crate::reminders::ReminderService;
use crate::storage::{Collection, DataKind, KvStore, UserScope};

/// Appointment bookkeeping plus the reminder side effects of each change.
#[derive(Clone)]
pub struct AppointmentService {
    appointments: Collection<Appointment>,
    clients: ClientService,
    reminders: ReminderService,
    clock: Arc<dyn Clock>,
}

fn sort_chronologically(items: &mut [Appointment]) {
    items.sort_by_key(|a| (a.date, a.time, a.created_at));
}

impl AppointmentService {
    pub fn new(store: Arc<dyn KvStore>, clients: ClientService, reminders: ReminderService, clock: Arc<dyn Clock>) -> Self {
        Self { appointments: Collection::new(store, DataKind::Appointments), clients, reminders, clock }
    }

    /// Book a pending appointment for an existing client and schedule its
    /// reminder. The booking stands even when the reminder cannot be scheduled.
    #[instrument(skip(self, scope, input), fields(user_id = %scope.user_id(), client_id = %input.client_id))]
    pub async fn create(&self, scope: &UserScope, input: NewAppointment) -> Result<Appointment, ServiceError> {
        let client = self.clients.require(scope, input.client_id).await?;
        let appointment = Appointment::create(input, &client.name, self.clock.now_utc())?;
        let stored = appointment.clone();
        self.appointments.update(scope, move |items| { items.push(stored); Ok(()) }).await?;
        info!(appointment_id = %appointment.id, date = %appointment.date, time = %appointment.time, "appointment_created");
        self.sync_reminder(scope, &appointment).await;
        Ok(appointment)
    }

    // The appointment is already persisted here; a reminder failure is logged, not returned.
    async fn sync_reminder(&self, scope: &UserScope, appointment: &Appointment) {
        if let Err(e) = self.reminders.sync(scope, appointment).await {
            warn!(appointment_id = %appointment.id, error = %e, "reminder not scheduled");
        }
    }

    pub async fn get(&self, scope: &UserScope, id: Uuid) -> Result<Option<Appointment>, ServiceError> {
        Ok(self.appointments.load(scope).await?.into_iter().find(|a| a.id == id))
    }

    pub async fn require(&self, scope: &UserScope, id: Uuid) -> Result<Appointment, ServiceError> {
        self.get(scope, id).await?.ok_or_else(|| ServiceError::not_found("appointment"))
    }

    /// All appointments by date, then time.
    pub async fn list(&self, scope: &UserScope) -> Result<Vec<Appointment>, ServiceError> {
        let mut items = self.appointments.load(scope).await?;
        sort_chronologically(&mut items);
        Ok(items)
    }

    pub async fn list_for_day(&self, scope: &UserScope, date: NaiveDate) -> Result<Vec<Appointment>, ServiceError> {
        self.list_between(scope, date, date).await
    }

    /// Appointments whose date falls within `from..=to`.
    pub async fn list_between(&self, scope: &UserScope, from: NaiveDate, to: NaiveDate) -> Result<Vec<Appointment>, ServiceError> {
        if to < from {
            return Err(ServiceError::Validation("range end before start".into()));
        }
        Ok(self.list(scope).await?.into_iter().filter(|a| a.date >= from && a.date <= to).collect())
    }

    pub async fn list_for_client(&self, scope: &UserScope, client_id: Uuid) -> Result<Vec<Appointment>, ServiceError> {
        Ok(self.list(scope).await?.into_iter().filter(|a| a.client_id == client_id).collect())
    }

    /// Next active appointments starting at or after `now`.
    pub async fn upcoming(&self, scope: &UserScope, now: NaiveDateTime, limit: usize) -> Result<Vec<Appointment>, ServiceError> {
        Ok(self
            .list(scope)
            .await?
            .into_iter()
            .filter(|a| a.is_active() && a.starts_at() >= now)
            .take(limit)
            .collect())
    }

    /// Non-cancelled appointments intersecting `[start, start + duration)`.
    pub async fn overlapping(
        &self,
        scope: &UserScope,
        date: NaiveDate,
        time: NaiveTime,
        duration_minutes: u32,
        exclude: Option<Uuid>,
    ) -> Result<Vec<Appointment>, ServiceError> {
        let start = date.and_time(time);
        let end = start + Duration::minutes(i64::from(duration_minutes));
        Ok(self
            .list(scope)
            .await?
            .into_iter()
            .filter(|a| Some(a.id) != exclude)
            .filter(|a| a.status != AppointmentStatus::Cancelled && a.overlaps(start, end))
            .collect())
    }

    /// Edit fields; moving the start re-plans the reminder.
    #[instrument(skip(self, scope, patch), fields(user_id = %scope.user_id()))]
    pub async fn update(&self, scope: &UserScope, id: Uuid, patch: AppointmentPatch) -> Result<Appointment, ServiceError> {
        let reschedule = patch.moves_start();
        let updated = self
            .appointments
            .update(scope, |items| {
                let appt = items.iter_mut().find(|a| a.id == id).ok_or_else(|| ServiceError::not_found("appointment"))?;
                appt.apply(patch)?;
                Ok(appt.clone())
            })
            .await?;
        if reschedule {
            self.sync_reminder(scope, &updated).await;
        }
        info!(appointment_id = %id, reschedule, "appointment_updated");
        Ok(updated)
    }

    /// Move through the status lifecycle. Cancelling or completing withdraws
    /// the reminder; completing also counts a session for the client.
    #[instrument(skip(self, scope), fields(user_id = %scope.user_id()))]
    pub async fn set_status(&self, scope: &UserScope, id: Uuid, status: AppointmentStatus) -> Result<Appointment, ServiceError> {
        let (before, updated) = self
            .appointments
            .update(scope, |items| {
                let appt = items.iter_mut().find(|a| a.id == id).ok_or_else(|| ServiceError::not_found("appointment"))?;
                let before = appt.status;
                if !before.can_transition_to(status) {
                    return Err(ServiceError::Conflict(format!("cannot change status from {before} to {status}")));
                }
                appt.status = status;
                Ok((before, appt.clone()))
            })
            .await?;
        if before == status {
            return Ok(updated);
        }

        match status {
            AppointmentStatus::Cancelled => {
                self.reminders.cancel(scope, id).await?;
            }
            AppointmentStatus::Completed => {
                self.reminders.cancel(scope, id).await?;
                match self.clients.record_session(scope, updated.client_id, updated.date).await {
                    Ok(_) => {}
                    Err(ServiceError::NotFound(_)) => {
                        warn!(client_id = %updated.client_id, "client gone; session not recorded");
                    }
                    Err(e) => return Err(e),
                }
            }
            AppointmentStatus::Pending | AppointmentStatus::Confirmed => {}
        }
        info!(appointment_id = %id, from = %before, to = %status, "appointment_status_changed");
        Ok(updated)
    }

    #[instrument(skip(self, scope), fields(user_id = %scope.user_id()))]
    pub async fn delete(&self, scope: &UserScope, id: Uuid) -> Result<bool, ServiceError> {
        let mut items = self.appointments.load(scope).await?;
        let before = items.len();
        items.retain(|a| a.id != id);
        if items.len() == before {
            return Ok(false);
        }
        self.appointments.save(scope, &items).await?;
        self.reminders.cancel(scope, id).await?;
        info!(appointment_id = %id, "appointment_deleted");
        Ok(true)
    }
}
