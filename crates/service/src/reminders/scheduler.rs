use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use super::{LocalNotification, NotificationScheduler};
use crate::errors::ServiceError;

/// Keeps scheduled notifications in memory so they can be inspected.
#[derive(Default)]
pub struct RecordingScheduler {
    pending: Mutex<HashMap<String, LocalNotification>>,
    cancelled: Mutex<Vec<String>>,
    fail_next: Mutex<bool>,
}

impl RecordingScheduler {
    pub fn new() -> Self { Self::default() }

    pub fn pending(&self) -> Vec<(String, LocalNotification)> {
        let map = self.pending.lock().unwrap_or_else(|p| p.into_inner());
        let mut out: Vec<_> = map.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        out.sort_by_key(|(_, n)| n.fire_at);
        out
    }

    pub fn cancelled(&self) -> Vec<String> {
        self.cancelled.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }

    /// Make the next `schedule` call fail, as a denied permission would.
    pub fn fail_next(&self) {
        *self.fail_next.lock().unwrap_or_else(|p| p.into_inner()) = true;
    }
}

#[async_trait]
impl NotificationScheduler for RecordingScheduler {
    async fn schedule(&self, notification: &LocalNotification) -> Result<String, ServiceError> {
        {
            let mut fail = self.fail_next.lock().unwrap_or_else(|p| p.into_inner());
            if *fail {
                *fail = false;
                return Err(ServiceError::Notification("notification permission denied".into()));
            }
        }
        let id = Uuid::new_v4().to_string();
        self.pending
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .insert(id.clone(), notification.clone());
        Ok(id)
    }

    async fn cancel(&self, notification_id: &str) -> Result<(), ServiceError> {
        let removed = self
            .pending
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .remove(notification_id)
            .is_some();
        if removed {
            self.cancelled
                .lock()
                .unwrap_or_else(|p| p.into_inner())
                .push(notification_id.to_string());
        }
        Ok(())
    }
}

/// Scheduler for headless runs: logs each request and hands out fresh ids.
#[derive(Default, Clone, Copy)]
pub struct TracingScheduler;

#[async_trait]
impl NotificationScheduler for TracingScheduler {
    async fn schedule(&self, notification: &LocalNotification) -> Result<String, ServiceError> {
        let id = Uuid::new_v4().to_string();
        info!(
            notification_id = %id,
            appointment_id = %notification.appointment_id,
            fire_at = %notification.fire_at,
            "reminder_scheduled"
        );
        Ok(id)
    }

    async fn cancel(&self, notification_id: &str) -> Result<(), ServiceError> {
        info!(%notification_id, "reminder_cancelled");
        Ok(())
    }
}
