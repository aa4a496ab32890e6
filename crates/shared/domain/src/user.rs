//! User aggregate.
//!
//! A [`User`] only ever holds validated scalars. There are two ways in:
//! [`User::create`] from scalars that are already valid (cannot fail), and
//! [`User::create_from_raw`] from unchecked strings (may fail, never panics).
//! Updates return a new instance and leave the original untouched.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::email::{Email, EmailBuilder};
use crate::error::{DomainError, DomainResult};
use crate::name::{DisplayName, NameBuilder};
use crate::policy::PolicyGate;

/// Opaque user identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Generate a fresh random identity
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for UserId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for UserId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// User domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    email: Email,
    name: DisplayName,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl User {
    /// Compose a user from already-validated scalars.
    ///
    /// Generates an identity when `id` is `None`; both timestamps are set to now.
    pub fn create(email: Email, name: DisplayName, id: Option<UserId>) -> Self {
        let now = Utc::now();
        Self {
            id: id.unwrap_or_default(),
            email,
            name,
            created_at: now,
            updated_at: now,
        }
    }

    /// Validate raw strings with default builders and compose a user.
    ///
    /// See [`User::create_from_raw_with`] for the evaluation order.
    pub async fn create_from_raw(
        email_raw: &str,
        name_raw: &str,
        gate: Option<&dyn PolicyGate>,
        id: Option<UserId>,
    ) -> DomainResult<Self> {
        Self::create_from_raw_with(
            &EmailBuilder::default(),
            &NameBuilder::default(),
            email_raw,
            name_raw,
            gate,
            id,
        )
        .await
    }

    /// Validate raw strings with the given builders and compose a user.
    ///
    /// Fail-fast, in this order: email structure and rules, name structure
    /// and rules, then the policy gate (if any). The gate is only consulted
    /// once every field is structurally valid, and the first error wins.
    pub async fn create_from_raw_with(
        email_builder: &EmailBuilder,
        name_builder: &NameBuilder,
        email_raw: &str,
        name_raw: &str,
        gate: Option<&dyn PolicyGate>,
        id: Option<UserId>,
    ) -> DomainResult<Self> {
        let email = email_builder.build(email_raw)?;
        let name = name_builder.build(name_raw)?;

        let email = match gate {
            Some(gate) => email_builder.check_policy(email, email_raw, gate).await?,
            None => email,
        };

        Ok(Self::create(email, name, id))
    }

    /// Every structural field error for the given input, in field order.
    ///
    /// Unlike `create_from_raw` this does not stop at the first failure and
    /// never consults a policy gate. An empty vector means both fields are valid.
    pub fn validate_raw(email_raw: &str, name_raw: &str) -> Vec<DomainError> {
        Self::validate_raw_with(
            &EmailBuilder::default(),
            &NameBuilder::default(),
            email_raw,
            name_raw,
        )
    }

    pub fn validate_raw_with(
        email_builder: &EmailBuilder,
        name_builder: &NameBuilder,
        email_raw: &str,
        name_raw: &str,
    ) -> Vec<DomainError> {
        [
            email_builder.build(email_raw).err(),
            name_builder.build(name_raw).err(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn name(&self) -> &DisplayName {
        &self.name
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// New user with the email replaced and `updated_at` refreshed
    pub fn update_email(&self, email: Email) -> Self {
        Self {
            email,
            updated_at: self.touched(),
            ..self.clone()
        }
    }

    /// New user with the name replaced and `updated_at` refreshed
    pub fn update_name(&self, name: DisplayName) -> Self {
        Self {
            name,
            updated_at: self.touched(),
            ..self.clone()
        }
    }

    // Never moves backwards, even if the wall clock does.
    fn touched(&self) -> DateTime<Utc> {
        Utc::now().max(self.updated_at)
    }
}

impl PartialEq for User {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for User {}

impl Hash for User {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;
    use crate::policy::MockPolicyGate;

    fn sample_user() -> User {
        User::create(
            Email::parse("john@gmail.com").unwrap(),
            DisplayName::parse("John Doe").unwrap(),
            None,
        )
    }

    #[test]
    fn test_create_sets_equal_timestamps() {
        let user = sample_user();
        assert_eq!(user.created_at(), user.updated_at());
    }

    #[test]
    fn test_create_keeps_supplied_id() {
        let id = UserId::new();
        let user = User::create(
            Email::parse("a@b.io").unwrap(),
            DisplayName::parse("A").unwrap(),
            Some(id),
        );
        assert_eq!(user.id(), id);
    }

    #[test]
    fn test_equality_is_identity_based() {
        let id = UserId::new();
        let a = User::create(
            Email::parse("a@b.io").unwrap(),
            DisplayName::parse("A").unwrap(),
            Some(id),
        );
        let b = User::create(
            Email::parse("other@b.io").unwrap(),
            DisplayName::parse("B").unwrap(),
            Some(id),
        );
        assert_eq!(a, b);
        assert_ne!(a, sample_user());
    }

    #[test]
    fn test_update_email_is_copy_on_write() {
        let original = sample_user();
        let updated = original.update_email(Email::parse("new@example.com").unwrap());

        assert_eq!(original.email().as_str(), "john@gmail.com");
        assert_eq!(updated.email().as_str(), "new@example.com");
        assert_eq!(updated.id(), original.id());
        assert_eq!(updated.name(), original.name());
        assert_eq!(updated.created_at(), original.created_at());
        assert!(updated.updated_at() >= original.updated_at());
    }

    #[test]
    fn test_update_name_is_copy_on_write() {
        let original = sample_user();
        let updated = original.update_name(DisplayName::parse("Johnny").unwrap());

        assert_eq!(original.name().as_str(), "John Doe");
        assert_eq!(updated.name().as_str(), "Johnny");
        assert_eq!(updated.email(), original.email());
    }

    #[tokio::test]
    async fn test_create_from_raw_success() {
        let user = User::create_from_raw("john@gmail.com", "John Doe", None, None)
            .await
            .unwrap();
        assert_eq!(user.email().as_str(), "john@gmail.com");
        assert_eq!(user.name().as_str(), "John Doe");
    }

    #[tokio::test]
    async fn test_create_from_raw_email_error_wins() {
        let err = User::create_from_raw("bad", "", None, None)
            .await
            .unwrap_err();
        assert_eq!(err.field(), "email");
        assert_eq!(err.kind(), FailureKind::InvalidFormat);
    }

    #[tokio::test]
    async fn test_create_from_raw_skips_gate_when_name_invalid() {
        let mut gate = MockPolicyGate::new();
        gate.expect_is_rejected().times(0);

        let err = User::create_from_raw("john@gmail.com", "   ", Some(&gate), None)
            .await
            .unwrap_err();
        assert_eq!(err.field(), "name");
    }

    #[tokio::test]
    async fn test_create_from_raw_policy_rejected() {
        let mut gate = MockPolicyGate::new();
        gate.expect_is_rejected().times(1).returning(|_| Ok(true));

        let err = User::create_from_raw("blocked@example.com", "Spammer", Some(&gate), None)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), FailureKind::PolicyRejected);
    }

    #[test]
    fn test_validate_raw_accumulates() {
        let errors = User::validate_raw("bad", "");
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field(), "email");
        assert_eq!(errors[1].field(), "name");

        assert!(User::validate_raw("ok@example.com", "Ok").is_empty());
    }

    #[test]
    fn test_user_id_parse_roundtrip() {
        let id = UserId::new();
        let parsed: UserId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert!("not-a-uuid".parse::<UserId>().is_err());
    }
}
