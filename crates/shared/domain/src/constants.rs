//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// Email
// =============================================================================

/// Maximum length of a trimmed email address
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Shape an email must match: `local@domain.tld` with no whitespace
pub const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

/// Separator between local part and domain
pub const EMAIL_DELIMITER: char = '@';

/// Sequence that may never appear in an email address
pub const FORBIDDEN_DOT_SEQUENCE: &str = "..";

// =============================================================================
// Display name
// =============================================================================

/// Minimum name length requirement
pub const MIN_NAME_LENGTH: usize = 1;

/// Maximum name length (in characters)
pub const MAX_NAME_LENGTH: usize = 100;

// =============================================================================
// Policy checks
// =============================================================================

/// Default upper bound on a single policy gate call
pub const DEFAULT_POLICY_TIMEOUT_MS: u64 = 5000;
