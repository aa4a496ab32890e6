pub mod registration_service;

pub use registration_service::{RegistrationService, Registrar};

#[cfg(any(test, feature = "test-utils"))]
pub use registration_service::MockRegistrationService;
