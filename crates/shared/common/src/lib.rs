//! Common utilities shared by the registration service and the CLI.
//!
//! This crate provides:
//! - Application error type with exit codes
//! - Configuration loaded from the environment

pub mod config;
pub mod error;

pub use config::*;
pub use error::{AppError, AppResult};
