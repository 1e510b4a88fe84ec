pub mod auth;
pub mod errors;
pub mod routes;
pub mod startup;

pub use startup::{build_app, run};
