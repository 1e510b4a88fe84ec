//! Auth module: three-layer architecture (domain, repository, service).
//!
//! Accounts live on the device. Passwords are argon2-hashed; the session is
//! the single signed-in account id stored under a global key.

pub mod domain;
pub mod errors;
pub mod repository;
pub mod service;
pub mod repo;
pub mod token;

pub use service::{AuthConfig, AuthService};
