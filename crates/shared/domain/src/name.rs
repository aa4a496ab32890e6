//! Display name value object.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::{MAX_NAME_LENGTH, MIN_NAME_LENGTH};
use crate::error::{DomainError, DomainResult};
use crate::rule::{apply_rules, RuleOrder, ValidationRule};

const FIELD: &str = "name";

/// Human-readable user name. Trimmed, case preserved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DisplayName(String);

impl DisplayName {
    /// Trimmed length within bounds and no control characters.
    pub fn is_valid(raw: &str) -> bool {
        let candidate = raw.trim();
        let length = candidate.chars().count();

        (MIN_NAME_LENGTH..=MAX_NAME_LENGTH).contains(&length)
            && !candidate.chars().any(char::is_control)
    }

    pub fn parse(raw: &str) -> DomainResult<Self> {
        NameBuilder::new().build(raw)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<DisplayName> for String {
    fn from(name: DisplayName) -> Self {
        name.0
    }
}

impl TryFrom<String> for DisplayName {
    type Error = DomainError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        DisplayName::parse(&raw)
    }
}

impl FromStr for DisplayName {
    type Err = DomainError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        DisplayName::parse(raw)
    }
}

/// Construction service for [`DisplayName`].
#[derive(Debug, Clone, Default)]
pub struct NameBuilder {
    rules: Vec<ValidationRule>,
    rule_order: RuleOrder,
}

impl NameBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule; rules run in the order they were added.
    pub fn with_rule(mut self, rule: ValidationRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rule_order(mut self, order: RuleOrder) -> Self {
        self.rule_order = order;
        self
    }

    /// Trim and validate `raw`.
    ///
    /// # Errors
    /// `InvalidFormat` or `RuleViolated`, carrying `raw` unchanged.
    pub fn build(&self, raw: &str) -> DomainResult<DisplayName> {
        let trimmed = raw.trim();

        if self.rule_order == RuleOrder::BeforeStructural {
            apply_rules(&self.rules, FIELD, trimmed, raw)?;
        }

        if !DisplayName::is_valid(trimmed) {
            debug!(input = raw, "name failed structural validation");
            return Err(DomainError::invalid_format(FIELD, raw));
        }

        if self.rule_order == RuleOrder::AfterStructural {
            apply_rules(&self.rules, FIELD, trimmed, raw)?;
        }

        Ok(DisplayName(trimmed.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;

    #[test]
    fn test_name_trimmed_case_preserved() {
        let name = DisplayName::parse("  John Doe ").unwrap();
        assert_eq!(name.as_str(), "John Doe");
    }

    #[test]
    fn test_name_empty_rejected() {
        assert_eq!(
            DisplayName::parse("   ").unwrap_err().kind(),
            FailureKind::InvalidFormat
        );
    }

    #[test]
    fn test_name_length_bounds() {
        assert!(DisplayName::parse(&"x".repeat(MAX_NAME_LENGTH)).is_ok());
        assert!(DisplayName::parse(&"x".repeat(MAX_NAME_LENGTH + 1)).is_err());
        assert!(DisplayName::parse("Ö").is_ok());
    }

    #[test]
    fn test_name_control_characters_rejected() {
        assert!(DisplayName::parse("John\u{0}Doe").is_err());
        assert!(DisplayName::parse("John\nDoe").is_err());
    }

    #[test]
    fn test_name_rule_violation() {
        let builder = NameBuilder::new().with_rule(ValidationRule::new("no_digits", |v| {
            !v.chars().any(|c| c.is_ascii_digit())
        }));
        assert_eq!(
            builder.build("R2D2").unwrap_err().kind(),
            FailureKind::RuleViolated
        );
        assert!(builder.build("Artoo").is_ok());
    }
}
