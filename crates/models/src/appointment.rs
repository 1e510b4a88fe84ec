use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;

pub const MAX_DURATION_MINUTES: u32 = 24 * 60;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl AppointmentStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Cancelled | Self::Completed)
    }

    /// Whether moving from `self` to `next` is allowed. Same-status is allowed (no-op).
    pub fn can_transition_to(self, next: Self) -> bool {
        use AppointmentStatus::*;
        if self == next {
            return true;
        }
        match self {
            Pending => matches!(next, Confirmed | Cancelled | Completed),
            Confirmed => matches!(next, Cancelled | Completed),
            Cancelled | Completed => false,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AppointmentStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            "completed" => Ok(Self::Completed),
            other => Err(ModelError::validation(format!("unknown status '{other}'"))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub client_id: Uuid,
    pub client_name: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub duration_minutes: u32,
    pub status: AppointmentStatus,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price_cents: Option<i64>,
    #[serde(default)]
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewAppointment {
    pub client_id: Uuid,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub duration_minutes: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price_cents: Option<i64>,
    #[serde(default)]
    pub notes: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AppointmentPatch {
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub duration_minutes: Option<u32>,
    pub description: Option<String>,
    pub price_cents: Option<Option<i64>>,
    pub notes: Option<String>,
}

impl AppointmentPatch {
    pub fn moves_start(&self) -> bool {
        self.date.is_some() || self.time.is_some()
    }
}

pub fn validate_duration(minutes: u32) -> Result<u32, ModelError> {
    if minutes == 0 || minutes > MAX_DURATION_MINUTES {
        return Err(ModelError::validation("duration must be within 1..=1440 minutes"));
    }
    Ok(minutes)
}

pub fn validate_price(price: Option<i64>) -> Result<Option<i64>, ModelError> {
    match price {
        Some(p) if p < 0 => Err(ModelError::validation("price must not be negative")),
        other => Ok(other),
    }
}

impl Appointment {
    pub fn create(input: NewAppointment, client_name: &str, now: DateTime<Utc>) -> Result<Self, ModelError> {
        Ok(Self {
            id: Uuid::new_v4(),
            client_id: input.client_id,
            client_name: client_name.to_string(),
            date: input.date,
            time: input.time,
            duration_minutes: validate_duration(input.duration_minutes)?,
            status: AppointmentStatus::Pending,
            description: input.description.trim().to_string(),
            price_cents: validate_price(input.price_cents)?,
            notes: input.notes,
            created_at: now,
        })
    }

    pub fn apply(&mut self, patch: AppointmentPatch) -> Result<(), ModelError> {
        let duration = patch.duration_minutes.map(validate_duration).transpose()?;
        let price = patch.price_cents.map(validate_price).transpose()?;
        if let Some(d) = patch.date { self.date = d; }
        if let Some(t) = patch.time { self.time = t; }
        if let Some(d) = duration { self.duration_minutes = d; }
        if let Some(p) = price { self.price_cents = p; }
        if let Some(d) = patch.description { self.description = d.trim().to_string(); }
        if let Some(n) = patch.notes { self.notes = n; }
        Ok(())
    }

    pub fn starts_at(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }

    pub fn ends_at(&self) -> NaiveDateTime {
        self.starts_at() + Duration::minutes(i64::from(self.duration_minutes))
    }

    /// Half-open interval intersection: back-to-back bookings do not overlap.
    pub fn overlaps(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        self.starts_at() < end && start < self.ends_at()
    }

    pub fn is_active(&self) -> bool {
        !self.status.is_terminal()
    }
}
