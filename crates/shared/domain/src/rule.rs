//! Extra validation rules that can be attached to a builder.
//!
//! Rules are named predicates over the candidate value. A builder runs its
//! rules in registration order and stops at the first one that fails, so the
//! order in which rules are attached decides which failure gets reported.

use std::fmt;
use std::sync::Arc;

use crate::constants::EMAIL_DELIMITER;
use crate::error::{DomainError, DomainResult};

/// When attached rules run relative to the structural check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RuleOrder {
    /// Rules see the trimmed raw value; a rule failure pre-empts a format failure.
    BeforeStructural,
    /// Rules see the normalized value, only once it passed the structural check.
    #[default]
    AfterStructural,
}

type Predicate = dyn Fn(&str) -> bool + Send + Sync;

/// A named predicate; the value passes when the predicate returns `true`.
#[derive(Clone)]
pub struct ValidationRule {
    name: String,
    predicate: Arc<Predicate>,
}

impl fmt::Debug for ValidationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationRule")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl ValidationRule {
    pub fn new<F>(name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            predicate: Arc::new(predicate),
        }
    }

    /// Reject values longer than `max` characters.
    pub fn max_length(max: usize) -> Self {
        Self::new(format!("max_length({max})"), move |value| {
            value.chars().count() <= max
        })
    }

    /// Reject email addresses whose domain is one of `domains` (case-insensitive).
    ///
    /// Values without a domain part pass; the structural check owns that failure.
    pub fn deny_domains<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let denied: Vec<String> = domains
            .into_iter()
            .map(|d| d.as_ref().trim().to_lowercase())
            .collect();
        Self::new("deny_domains", move |value| {
            match value.split_once(EMAIL_DELIMITER) {
                Some((_, domain)) => {
                    let domain = domain.to_lowercase();
                    !denied.iter().any(|d| *d == domain)
                }
                None => true,
            }
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn check(&self, value: &str) -> bool {
        (self.predicate)(value)
    }
}

/// Run `rules` in order against `value`, stopping at the first failure.
pub(crate) fn apply_rules(
    rules: &[ValidationRule],
    field: &'static str,
    value: &str,
    raw: &str,
) -> DomainResult<()> {
    match rules.iter().find(|rule| !rule.check(value)) {
        Some(rule) => {
            tracing::debug!(field, rule = rule.name(), "validation rule failed");
            Err(DomainError::rule_violated(field, rule.name(), raw))
        }
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;

    #[test]
    fn test_max_length_counts_chars() {
        let rule = ValidationRule::max_length(3);
        assert!(rule.check("abc"));
        assert!(rule.check("äöü"));
        assert!(!rule.check("abcd"));
    }

    #[test]
    fn test_deny_domains_is_case_insensitive() {
        let rule = ValidationRule::deny_domains(["Mailinator.com"]);
        assert!(!rule.check("x@MAILINATOR.com"));
        assert!(rule.check("x@example.com"));
        assert!(rule.check("no-delimiter"));
    }

    #[test]
    fn test_apply_rules_reports_first_failure() {
        let rules = vec![
            ValidationRule::new("always", |_| true),
            ValidationRule::new("first", |_| false),
            ValidationRule::new("second", |_| false),
        ];

        let err = apply_rules(&rules, "email", "value", " raw ").unwrap_err();
        assert_eq!(err.kind(), FailureKind::RuleViolated);
        assert!(matches!(err, DomainError::RuleViolated { ref rule, .. } if rule == "first"));
        assert_eq!(err.input(), " raw ");
    }

    #[test]
    fn test_apply_rules_empty_passes() {
        assert!(apply_rules(&[], "email", "anything", "anything").is_ok());
    }

    #[test]
    fn test_debug_hides_predicate() {
        let rule = ValidationRule::new("named", |_| true);
        assert!(format!("{rule:?}").contains("named"));
    }
}
