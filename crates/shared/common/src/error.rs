//! Unified error handling for the registration service and the CLI.
//!
//! Wraps domain construction failures alongside the few infrastructure
//! errors the application layer can hit, and maps each to a process exit code.

use domain::{DomainError, FailureKind};
use serde::Serialize;
use thiserror::Error;

// =============================================================================
// Exit codes
// =============================================================================

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_INVALID_INPUT: i32 = 2;
pub const EXIT_POLICY_REJECTED: i32 = 3;
pub const EXIT_POLICY_CHECK_FAILED: i32 = 4;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Construction of a domain value failed
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Several fields failed validation at once
    #[error("{} field(s) failed validation", .0.len())]
    InvalidFields(Vec<DomainError>),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error")]
    Internal(String),
}

/// Error body printed for machine consumers
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<ErrorDetail>,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub field: String,
    pub code: String,
    pub message: String,
}

impl From<&DomainError> for ErrorDetail {
    fn from(err: &DomainError) -> Self {
        Self {
            field: err.field().to_string(),
            code: err.kind().code().to_string(),
            message: err.message(),
        }
    }
}

impl AppError {
    /// Get error code for client
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Domain(e) => e.kind().code(),
            AppError::InvalidFields(_) => "VALIDATION_ERROR",
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Domain(e) => match e.kind() {
                FailureKind::InvalidFormat | FailureKind::RuleViolated => EXIT_INVALID_INPUT,
                FailureKind::PolicyRejected => EXIT_POLICY_REJECTED,
                FailureKind::PolicyCheckFailed => EXIT_POLICY_CHECK_FAILED,
            },
            AppError::InvalidFields(_) => EXIT_INVALID_INPUT,
            AppError::Config(_) | AppError::Internal(_) => EXIT_FAILURE,
        }
    }

    /// Get user-facing message (hides internal details)
    pub fn user_message(&self) -> String {
        match self {
            // Show full message for input errors
            AppError::Domain(e) => e.message(),
            AppError::Config(msg) => format!("Configuration error: {}", msg),

            // Hide details for internal errors
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }

            _ => self.to_string(),
        }
    }

    /// Serializable body for this error
    pub fn to_response(&self) -> ErrorResponse {
        let details = match self {
            AppError::InvalidFields(errors) => errors.iter().map(ErrorDetail::from).collect(),
            _ => Vec::new(),
        };

        ErrorResponse {
            error: ErrorBody {
                code: self.code().to_string(),
                message: self.user_message(),
                details,
            },
        }
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Convenience constructors
impl AppError {
    pub fn config(msg: impl Into<String>) -> Self {
        AppError::Config(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_errors_map_to_exit_codes() {
        let cases = [
            (DomainError::invalid_format("email", "x"), EXIT_INVALID_INPUT),
            (DomainError::rule_violated("email", "r", "x"), EXIT_INVALID_INPUT),
            (DomainError::policy_rejected("email", "x"), EXIT_POLICY_REJECTED),
            (
                DomainError::policy_check_failed("email", "x", "down"),
                EXIT_POLICY_CHECK_FAILED,
            ),
        ];

        for (domain, expected) in cases {
            assert_eq!(AppError::from(domain).exit_code(), expected);
        }
    }

    #[test]
    fn test_domain_message_is_shown() {
        let err = AppError::from(DomainError::invalid_format("email", "nope"));
        assert_eq!(err.code(), "INVALID_FORMAT");
        assert!(err.user_message().contains("nope"));
    }

    #[test]
    fn test_internal_details_hidden() {
        let err = AppError::internal("secret stack trace");
        assert_eq!(err.user_message(), "An internal error occurred");
        assert_eq!(err.exit_code(), EXIT_FAILURE);
    }

    #[test]
    fn test_invalid_fields_response_lists_details() {
        let err = AppError::InvalidFields(vec![
            DomainError::invalid_format("email", "bad"),
            DomainError::invalid_format("name", ""),
        ]);
        let json = serde_json::to_value(err.to_response()).unwrap();

        assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(json["error"]["details"].as_array().unwrap().len(), 2);
        assert_eq!(json["error"]["details"][1]["field"], "name");
    }

    #[test]
    fn test_plain_error_omits_details() {
        let err = AppError::config("missing blocklist");
        let json = serde_json::to_value(err.to_response()).unwrap();
        assert!(json["error"].get("details").is_none());
    }
}
