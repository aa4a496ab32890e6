//! Registration Service Library
//!
//! Turns raw registration input into validated users, wiring the domain
//! builders to configuration and to a local blocklist policy gate.

pub mod gates;
pub mod service;

pub use gates::BlocklistGate;
pub use service::{RegistrationService, Registrar};

#[cfg(any(test, feature = "test-utils"))]
pub use service::MockRegistrationService;
