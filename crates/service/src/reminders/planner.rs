use chrono::{Duration, NaiveDateTime};

use models::appointment::Appointment;

use super::LocalNotification;

pub const DEFAULT_OFFSET_MINUTES: i64 = 60;

/// Computes when (and whether) an appointment gets a reminder.
#[derive(Clone, Copy, Debug)]
pub struct ReminderPlanner {
    offset: Duration,
}

impl Default for ReminderPlanner {
    fn default() -> Self { Self::new(DEFAULT_OFFSET_MINUTES) }
}

impl ReminderPlanner {
    pub fn new(offset_minutes: i64) -> Self {
        Self { offset: Duration::minutes(offset_minutes) }
    }

    pub fn offset(&self) -> Duration {
        self.offset
    }

    pub fn fire_at(&self, appointment: &Appointment) -> NaiveDateTime {
        appointment.starts_at() - self.offset
    }

    /// `None` when the appointment is finished/cancelled or the fire time is
    /// not strictly in the future.
    pub fn plan(&self, appointment: &Appointment, now: NaiveDateTime) -> Option<LocalNotification> {
        if appointment.status.is_terminal() {
            return None;
        }
        let fire_at = self.fire_at(appointment);
        if fire_at <= now {
            return None;
        }
        Some(LocalNotification {
            appointment_id: appointment.id,
            title: "Upcoming appointment".to_string(),
            body: format!(
                "{} at {} ({} min)",
                appointment.client_name,
                appointment.time.format("%H:%M"),
                appointment.duration_minutes
            ),
            fire_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime, Utc};
    use models::appointment::{AppointmentStatus, NewAppointment};
    use uuid::Uuid;

    fn appt_at(h: u32, m: u32) -> Appointment {
        Appointment::create(
            NewAppointment {
                client_id: Uuid::new_v4(),
                date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
                time: NaiveTime::from_hms_opt(h, m, 0).unwrap(),
                duration_minutes: 90,
                description: String::new(),
                price_cents: None,
                notes: String::new(),
            },
            "Rita",
            Utc::now(),
        )
        .unwrap()
    }

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap().and_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn fires_one_hour_before() {
        let planner = ReminderPlanner::default();
        let n = planner.plan(&appt_at(14, 30), at(9, 0)).unwrap();
        assert_eq!(n.fire_at, at(13, 30));
        assert!(n.body.contains("Rita"));
        assert!(n.body.contains("14:30"));
    }

    #[test]
    fn skips_when_fire_time_passed() {
        let planner = ReminderPlanner::default();
        assert!(planner.plan(&appt_at(14, 30), at(13, 30)).is_none());
        assert!(planner.plan(&appt_at(14, 30), at(13, 45)).is_none());
        assert!(planner.plan(&appt_at(14, 30), at(13, 29)).is_some());
    }

    #[test]
    fn skips_terminal_appointments() {
        let planner = ReminderPlanner::default();
        let mut a = appt_at(14, 30);
        a.status = AppointmentStatus::Cancelled;
        assert!(planner.plan(&a, at(8, 0)).is_none());
    }

    #[test]
    fn custom_offset() {
        let planner = ReminderPlanner::new(15);
        assert_eq!(planner.fire_at(&appt_at(10, 0)), at(9, 45));
    }
}
