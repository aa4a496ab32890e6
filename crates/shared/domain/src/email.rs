//! Email value object and its builder.
//!
//! An [`Email`] can only be obtained through [`EmailBuilder`] (directly, or via
//! `parse`/`TryFrom`/`Deserialize`, which all delegate to it), so holding one is
//! proof that the address is trimmed, lower-cased and structurally valid.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::constants::{
    DEFAULT_POLICY_TIMEOUT_MS, EMAIL_DELIMITER, EMAIL_PATTERN, FORBIDDEN_DOT_SEQUENCE,
    MAX_EMAIL_LENGTH,
};
use crate::error::{DomainError, DomainResult, PolicyGateError};
use crate::policy::PolicyGate;
use crate::rule::{apply_rules, RuleOrder, ValidationRule};

const FIELD: &str = "email";

static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(EMAIL_PATTERN).expect("EMAIL_PATTERN is a valid regex"));

/// Email address value object.
///
/// DDD: Value object - immutable, compared by value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Structural validity check on the trimmed input.
    ///
    /// Pure and total: length in `1..=254`, no `..`, and a
    /// `local@domain.tld` shape without whitespace.
    ///
    /// Both the trimmed input and its lower-cased form must pass, since some
    /// Unicode characters grow when lower-cased (`İ` becomes two chars).
    pub fn is_valid(raw: &str) -> bool {
        let candidate = raw.trim();

        is_well_formed(candidate)
            && (candidate.is_ascii() || is_well_formed(&candidate.to_lowercase()))
    }

    /// Build with the default builder (no extra rules).
    pub fn parse(raw: &str) -> DomainResult<Self> {
        EmailBuilder::new().build(raw)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Everything before the first `@`.
    pub fn local_part(&self) -> &str {
        self.0
            .split_once(EMAIL_DELIMITER)
            .map_or(self.0.as_str(), |(local, _)| local)
    }

    /// Everything after the first `@`.
    pub fn domain_part(&self) -> &str {
        self.0
            .split_once(EMAIL_DELIMITER)
            .map_or("", |(_, domain)| domain)
    }

    /// Consume and return the normalized address.
    pub fn into_string(self) -> String {
        self.0
    }
}

fn is_well_formed(candidate: &str) -> bool {
    let length = candidate.chars().count();

    length > 0
        && length <= MAX_EMAIL_LENGTH
        && !candidate.contains(FORBIDDEN_DOT_SEQUENCE)
        && EMAIL_REGEX.is_match(candidate)
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

impl TryFrom<String> for Email {
    type Error = DomainError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Email::parse(&raw)
    }
}

impl TryFrom<&str> for Email {
    type Error = DomainError;

    fn try_from(raw: &str) -> Result<Self, Self::Error> {
        Email::parse(raw)
    }
}

impl FromStr for Email {
    type Err = DomainError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Email::parse(raw)
    }
}

/// Stateless construction service for [`Email`].
///
/// Configuration (extra rules, their ordering, the policy timeout) is fixed
/// before `build` is called; a configured builder can be shared freely
/// between concurrent constructions.
#[derive(Debug, Clone)]
pub struct EmailBuilder {
    rules: Vec<ValidationRule>,
    rule_order: RuleOrder,
    policy_timeout: Duration,
}

impl Default for EmailBuilder {
    fn default() -> Self {
        Self {
            rules: Vec::new(),
            rule_order: RuleOrder::default(),
            policy_timeout: Duration::from_millis(DEFAULT_POLICY_TIMEOUT_MS),
        }
    }
}

impl EmailBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule; rules run in the order they were added.
    pub fn with_rule(mut self, rule: ValidationRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Choose whether rules run before or after the structural check.
    ///
    /// With [`RuleOrder::BeforeStructural`] rules receive the trimmed input as
    /// typed; with [`RuleOrder::AfterStructural`] they receive the lower-cased
    /// address and never run on malformed input.
    pub fn rule_order(mut self, order: RuleOrder) -> Self {
        self.rule_order = order;
        self
    }

    /// Upper bound for a single policy gate call.
    pub fn policy_timeout(mut self, timeout: Duration) -> Self {
        self.policy_timeout = timeout;
        self
    }

    pub fn rules(&self) -> &[ValidationRule] {
        &self.rules
    }

    pub fn order(&self) -> RuleOrder {
        self.rule_order
    }

    /// Trim, validate and normalize `raw`.
    ///
    /// # Errors
    /// `InvalidFormat` when the structural check fails, `RuleViolated` when an
    /// attached rule fails. Both carry `raw` unchanged.
    pub fn build(&self, raw: &str) -> DomainResult<Email> {
        let trimmed = raw.trim();

        if self.rule_order == RuleOrder::BeforeStructural {
            apply_rules(&self.rules, FIELD, trimmed, raw)?;
        }

        if !Email::is_valid(trimmed) {
            debug!(input = raw, "email failed structural validation");
            return Err(DomainError::invalid_format(FIELD, raw));
        }

        let normalized = trimmed.to_lowercase();

        if self.rule_order == RuleOrder::AfterStructural {
            apply_rules(&self.rules, FIELD, &normalized, raw)?;
        }

        Ok(Email(normalized))
    }

    /// [`build`](Self::build), then ask `gate` about the normalized address.
    ///
    /// The gate is never called when the synchronous build fails.
    ///
    /// # Errors
    /// Anything `build` returns, plus `PolicyRejected` when the gate answers
    /// `true` and `PolicyCheckFailed` when it errors or exceeds the timeout.
    ///
    /// # Panics
    /// Must be polled inside a Tokio runtime with the time driver enabled
    /// (`#[tokio::main]` and `#[tokio::test]` both qualify).
    pub async fn build_with_policy_check<G>(&self, raw: &str, gate: &G) -> DomainResult<Email>
    where
        G: PolicyGate + ?Sized,
    {
        let email = self.build(raw)?;
        self.check_policy(email, raw, gate).await
    }

    pub(crate) async fn check_policy<G>(
        &self,
        email: Email,
        raw: &str,
        gate: &G,
    ) -> DomainResult<Email>
    where
        G: PolicyGate + ?Sized,
    {
        let verdict =
            tokio::time::timeout(self.policy_timeout, gate.is_rejected(email.as_str())).await;

        match verdict {
            Ok(Ok(false)) => Ok(email),
            Ok(Ok(true)) => {
                debug!(email = %email, "email rejected by policy gate");
                Err(DomainError::policy_rejected(FIELD, raw))
            }
            Ok(Err(e)) => {
                warn!(email = %email, error = %e, "policy gate failed");
                Err(DomainError::policy_check_failed(FIELD, raw, e))
            }
            Err(_) => {
                let limit = u64::try_from(self.policy_timeout.as_millis()).unwrap_or(u64::MAX);
                warn!(email = %email, timeout_ms = limit, "policy gate timed out");
                Err(DomainError::policy_check_failed(
                    FIELD,
                    raw,
                    PolicyGateError::Timeout(limit),
                ))
            }
        }
    }
}
