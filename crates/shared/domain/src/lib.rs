//! Domain layer - Validated value objects and the user aggregate.
//!
//! This crate contains pure domain logic with no infrastructure dependencies.
//! Every construction path returns a [`DomainResult`]; invalid input is a
//! value, never a panic.

pub mod constants;
pub mod email;
pub mod error;
pub mod name;
pub mod policy;
pub mod rule;
pub mod user;

pub use constants::*;
pub use email::{Email, EmailBuilder};
pub use error::{DomainError, DomainResult, FailureKind, PolicyGateError};
pub use name::{DisplayName, NameBuilder};
pub use policy::PolicyGate;
pub use rule::{RuleOrder, ValidationRule};
pub use user::{User, UserId};

#[cfg(any(test, feature = "test-utils"))]
pub use policy::MockPolicyGate;
