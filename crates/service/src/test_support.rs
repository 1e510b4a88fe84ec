//! Shared fixtures for service tests: an in-memory store, a pinned clock and
//! a scheduler that records what it was asked to do.
#![cfg(test)]

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use uuid::Uuid;

use crate::app::{AppSettings, StudioApp};
use crate::auth::AuthConfig;
use crate::clock::FixedClock;
use crate::reminders::RecordingScheduler;
use crate::storage::{KvStore, MemoryKvStore, UserScope};

pub struct TestEnv {
    pub app: StudioApp,
    pub scheduler: Arc<RecordingScheduler>,
    pub clock: Arc<FixedClock>,
    pub store: Arc<dyn KvStore>,
}

impl TestEnv {
    /// Clock pinned at 2024-06-01 08:00 local.
    pub fn new() -> Self {
        let store: Arc<dyn KvStore> = Arc::new(MemoryKvStore::new());
        let scheduler = Arc::new(RecordingScheduler::new());
        let clock = Arc::new(FixedClock::at_local(date(2024, 6, 1).and_time(time(8, 0))));
        let settings = AppSettings {
            reminder_offset_minutes: 60,
            auth: AuthConfig { jwt_secret: Some("test-secret".into()), ..Default::default() },
            ..Default::default()
        };
        let app = StudioApp::new(store.clone(), scheduler.clone(), clock.clone(), settings);
        Self { app, scheduler, clock, store }
    }

    /// A fresh, empty user namespace.
    pub fn scope(&self) -> UserScope {
        self.app.scope(Uuid::new_v4())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).expect("valid time")
}
