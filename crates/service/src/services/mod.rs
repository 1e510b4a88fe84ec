//! Per-entity services. Each loads its whole collection for the caller's
//! scope, changes it in memory, and writes it back.

pub mod client_service;
pub mod appointment_service;
pub mod catalog_service;
pub mod price_service;
pub mod template_service;
pub mod studio_service;

pub use appointment_service::AppointmentService;
pub use catalog_service::CatalogService;
pub use client_service::ClientService;
pub use price_service::PriceService;
pub use studio_service::StudioService;
pub use template_service::TemplateService;
