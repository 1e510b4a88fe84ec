//! Local reminder notifications for appointments.
//!
//! A reminder fires a fixed offset (one hour by default) before an
//! appointment starts. Scheduled ids are kept per user so a reschedule or
//! cancellation can withdraw the earlier notification.

pub mod planner;
pub mod scheduler;
pub mod service;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ServiceError;

pub use planner::ReminderPlanner;
pub use scheduler::{RecordingScheduler, TracingScheduler};
pub use service::ReminderService;

/// A one-shot notification request handed to the device.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LocalNotification {
    pub appointment_id: Uuid,
    pub title: String,
    pub body: String,
    pub fire_at: NaiveDateTime,
}

/// Bookkeeping for a notification already handed to the scheduler.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScheduledReminder {
    pub appointment_id: Uuid,
    pub notification_id: String,
    pub fire_at: NaiveDateTime,
}

/// Platform notification API.
#[async_trait]
pub trait NotificationScheduler: Send + Sync {
    /// Schedule a notification; returns the platform id.
    async fn schedule(&self, notification: &LocalNotification) -> Result<String, ServiceError>;
    /// Cancel a scheduled notification. Unknown ids are not an error.
    async fn cancel(&self, notification_id: &str) -> Result<(), ServiceError>;
}
