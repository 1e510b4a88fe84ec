use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    Trial,
    Active,
    Cancelled,
}

/// Locally stored account. The password is kept as an argon2 PHC string.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub trial_ends_at: DateTime<Utc>,
    pub subscription: SubscriptionStatus,
    #[serde(default)]
    pub subscription_expires_at: Option<DateTime<Utc>>,
}

/// What the account may do right now, computed on the device.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum AccessState {
    Trial { days_left: i64, ends_at: DateTime<Utc> },
    Active { until: DateTime<Utc> },
    Expired,
}

impl AccessState {
    pub fn has_access(&self) -> bool {
        !matches!(self, AccessState::Expired)
    }
}

impl Account {
    pub fn new(email: String, name: String, password_hash: String, now: DateTime<Utc>, trial_days: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            name,
            password_hash,
            created_at: now,
            trial_ends_at: now + Duration::days(trial_days),
            subscription: SubscriptionStatus::Trial,
            subscription_expires_at: None,
        }
    }

    pub fn access_state(&self, now: DateTime<Utc>) -> AccessState {
        if self.subscription == SubscriptionStatus::Active {
            if let Some(until) = self.subscription_expires_at {
                if until > now {
                    return AccessState::Active { until };
                }
            }
        }
        if now < self.trial_ends_at {
            let remaining = self.trial_ends_at - now;
            // partial days count as a full day left
            let days_left = (remaining.num_seconds() + 86_399) / 86_400;
            return AccessState::Trial { days_left, ends_at: self.trial_ends_at };
        }
        AccessState::Expired
    }

    /// Extend (or start) the paid period by `months` of 30 days, stacking on
    /// any time still remaining. Nothing changes when the end date would
    /// fall outside the representable range.
    pub fn activate_subscription(&mut self, months: u32, now: DateTime<Utc>) -> Result<DateTime<Utc>, ModelError> {
        let base = match self.subscription_expires_at {
            Some(until) if until > now && self.subscription == SubscriptionStatus::Active => until,
            _ => now,
        };
        let until = Duration::try_days(30 * i64::from(months))
            .and_then(|period| base.checked_add_signed(period))
            .ok_or_else(|| ModelError::validation("subscription period out of range"))?;
        self.subscription = SubscriptionStatus::Active;
        self.subscription_expires_at = Some(until);
        Ok(until)
    }

    pub fn cancel_subscription(&mut self) {
        self.subscription = SubscriptionStatus::Cancelled;
    }
}
