//! Service layer for driver flag processing.

mod driver_service;

pub use driver_service::DriverService;
