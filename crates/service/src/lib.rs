//! Service layer for the studio data: per-user collections in a key-value
//! store, the business rules on top of `models`, local reminders and
//! on-device auth.
//! - Every read and write goes through a `UserScope`, so users never see
//!   each other's keys.
//! - Side effects that leave the store (notifications) go through a trait.

pub mod errors;
pub mod clock;
pub mod storage;
pub mod pagination;
pub mod reminders;
pub mod services;
pub mod quote;
pub mod calendar;
pub mod auth;
pub mod app;
#[cfg(test)]
pub mod test_support;

pub use app::{AppSettings, StudioApp};
pub use errors::ServiceError;
