//! Domain-level errors.
//!
//! Every construction failure is reported as a [`DomainError`] value. The
//! message always embeds the raw input so a caller can explain the rejection
//! without inspecting internals.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Kind of construction failure, without the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureKind {
    InvalidFormat,
    RuleViolated,
    PolicyRejected,
    PolicyCheckFailed,
}

impl FailureKind {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            FailureKind::InvalidFormat => "INVALID_FORMAT",
            FailureKind::RuleViolated => "RULE_VIOLATED",
            FailureKind::PolicyRejected => "POLICY_REJECTED",
            FailureKind::PolicyCheckFailed => "POLICY_CHECK_FAILED",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Structured reason a value could not be constructed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Structural validation failed (empty, too long, malformed, consecutive dots)
    #[error("Invalid {field} format: '{input}'")]
    InvalidFormat { field: &'static str, input: String },

    /// An extra validation rule attached to the builder failed
    #[error("{field} '{input}' violates rule '{rule}'")]
    RuleViolated {
        field: &'static str,
        rule: String,
        input: String,
    },

    /// Structurally valid, but the policy gate flagged the value
    #[error("{field} '{input}' was rejected by policy")]
    PolicyRejected { field: &'static str, input: String },

    /// The policy gate did not produce an answer
    #[error("Policy check for {field} '{input}' failed: {cause}")]
    PolicyCheckFailed {
        field: &'static str,
        input: String,
        cause: String,
    },
}

impl DomainError {
    /// Create an invalid format error
    pub fn invalid_format(field: &'static str, input: impl Into<String>) -> Self {
        DomainError::InvalidFormat {
            field,
            input: input.into(),
        }
    }

    /// Create a rule violation error
    pub fn rule_violated(
        field: &'static str,
        rule: impl Into<String>,
        input: impl Into<String>,
    ) -> Self {
        DomainError::RuleViolated {
            field,
            rule: rule.into(),
            input: input.into(),
        }
    }

    /// Create a policy rejection error
    pub fn policy_rejected(field: &'static str, input: impl Into<String>) -> Self {
        DomainError::PolicyRejected {
            field,
            input: input.into(),
        }
    }

    /// Create a policy check failure
    pub fn policy_check_failed(
        field: &'static str,
        input: impl Into<String>,
        cause: impl fmt::Display,
    ) -> Self {
        DomainError::PolicyCheckFailed {
            field,
            input: input.into(),
            cause: cause.to_string(),
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            DomainError::InvalidFormat { .. } => FailureKind::InvalidFormat,
            DomainError::RuleViolated { .. } => FailureKind::RuleViolated,
            DomainError::PolicyRejected { .. } => FailureKind::PolicyRejected,
            DomainError::PolicyCheckFailed { .. } => FailureKind::PolicyCheckFailed,
        }
    }

    /// Name of the field that failed
    pub fn field(&self) -> &'static str {
        match self {
            DomainError::InvalidFormat { field, .. }
            | DomainError::RuleViolated { field, .. }
            | DomainError::PolicyRejected { field, .. }
            | DomainError::PolicyCheckFailed { field, .. } => *field,
        }
    }

    /// The raw input that caused the failure
    pub fn input(&self) -> &str {
        match self {
            DomainError::InvalidFormat { input, .. }
            | DomainError::RuleViolated { input, .. }
            | DomainError::PolicyRejected { input, .. }
            | DomainError::PolicyCheckFailed { input, .. } => input,
        }
    }

    /// Human-readable message
    pub fn message(&self) -> String {
        self.to_string()
    }
}

/// Result type alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Failure of the policy gate itself (as opposed to a rejection).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PolicyGateError {
    #[error("policy service unavailable: {0}")]
    Unavailable(String),

    #[error("policy check timed out after {0} ms")]
    Timeout(u64),

    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_matches_variant() {
        assert_eq!(
            DomainError::invalid_format("email", "x").kind(),
            FailureKind::InvalidFormat
        );
        assert_eq!(
            DomainError::rule_violated("email", "r", "x").kind(),
            FailureKind::RuleViolated
        );
        assert_eq!(
            DomainError::policy_rejected("email", "x").kind(),
            FailureKind::PolicyRejected
        );
        assert_eq!(
            DomainError::policy_check_failed("email", "x", "boom").kind(),
            FailureKind::PolicyCheckFailed
        );
    }

    #[test]
    fn test_message_embeds_raw_input() {
        let err = DomainError::invalid_format("email", "  not-an-email ");
        assert!(err.message().contains("  not-an-email "));
        assert_eq!(err.input(), "  not-an-email ");
        assert_eq!(err.field(), "email");
    }

    #[test]
    fn test_message_keeps_tabs_and_quotes_verbatim() {
        let raw = "\t\"quoted\"\n@x.io";
        let err = DomainError::rule_violated("email", "no_quotes", raw);
        assert!(err.message().contains(raw));
        assert!(DomainError::policy_rejected("email", raw).message().contains(raw));
    }

    #[test]
    fn test_policy_check_failed_carries_cause() {
        let cause = PolicyGateError::Timeout(250);
        let err = DomainError::policy_check_failed("email", "a@b.co", cause);
        assert!(err.message().contains("timed out after 250 ms"));
    }

    #[test]
    fn test_failure_kind_codes() {
        assert_eq!(FailureKind::PolicyCheckFailed.code(), "POLICY_CHECK_FAILED");
        assert_eq!(FailureKind::InvalidFormat.to_string(), "INVALID_FORMAT");
    }
}
