//! Registration service - validates input and composes users.
//!
//! SOLID (SRP): Handles registration use cases only.
//! The domain reports a policy gate that could not answer as
//! `PolicyCheckFailed`; this layer decides, per configuration, whether that
//! blocks the registration (closed) or is ignored (open).

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use common::{AppError, AppResult, PolicyFailureMode, RegistrationConfig};
use domain::{
    DisplayName, DomainError, Email, EmailBuilder, FailureKind, NameBuilder, PolicyGate, User,
    UserId, ValidationRule,
};

use crate::gates::BlocklistGate;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Registration service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait RegistrationService: Send + Sync {
    /// Validate and normalize an email, consulting the policy gate if configured
    async fn check_email(&self, raw: &str) -> AppResult<Email>;

    /// Validate and normalize a display name
    fn check_name(&self, raw: &str) -> AppResult<DisplayName>;

    /// Report every structural field error at once
    fn validate(&self, email_raw: &str, name_raw: &str) -> AppResult<()>;

    /// Build a new user from raw input
    async fn register(
        &self,
        email_raw: &str,
        name_raw: &str,
        id: Option<UserId>,
    ) -> AppResult<User>;
}

/// Concrete implementation of RegistrationService.
pub struct Registrar {
    email_builder: EmailBuilder,
    name_builder: NameBuilder,
    gate: Option<Arc<dyn PolicyGate>>,
    on_policy_failure: PolicyFailureMode,
}

impl Registrar {
    /// Create a registrar with default builders and no policy gate
    pub fn new() -> Self {
        Self {
            email_builder: EmailBuilder::default(),
            name_builder: NameBuilder::default(),
            gate: None,
            on_policy_failure: PolicyFailureMode::default(),
        }
    }

    /// Create a registrar from configuration, loading the blocklist if one is set
    pub async fn from_config(config: &RegistrationConfig) -> AppResult<Self> {
        let mut email_builder = EmailBuilder::new().policy_timeout(config.policy_timeout());
        if !config.denied_domains.is_empty() {
            email_builder =
                email_builder.with_rule(ValidationRule::deny_domains(&config.denied_domains));
        }

        let gate: Option<Arc<dyn PolicyGate>> = match &config.blocklist_path {
            Some(path) => {
                let blocklist = BlocklistGate::load(path).await.map_err(|e| {
                    AppError::config(format!(
                        "cannot read blocklist {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                Some(Arc::new(blocklist))
            }
            None => None,
        };

        Ok(Self::new()
            .with_email_builder(email_builder)
            .with_gate_opt(gate)
            .on_policy_failure(config.on_policy_failure))
    }

    pub fn with_email_builder(mut self, builder: EmailBuilder) -> Self {
        self.email_builder = builder;
        self
    }

    pub fn with_name_builder(mut self, builder: NameBuilder) -> Self {
        self.name_builder = builder;
        self
    }

    pub fn with_gate(self, gate: Arc<dyn PolicyGate>) -> Self {
        self.with_gate_opt(Some(gate))
    }

    fn with_gate_opt(mut self, gate: Option<Arc<dyn PolicyGate>>) -> Self {
        self.gate = gate;
        self
    }

    pub fn on_policy_failure(mut self, mode: PolicyFailureMode) -> Self {
        self.on_policy_failure = mode;
        self
    }

    fn fails_open(&self, err: &DomainError) -> bool {
        err.kind() == FailureKind::PolicyCheckFailed
            && self.on_policy_failure == PolicyFailureMode::Open
    }
}

impl Default for Registrar {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RegistrationService for Registrar {
    async fn check_email(&self, raw: &str) -> AppResult<Email> {
        let gate = match &self.gate {
            Some(gate) => gate,
            None => return Ok(self.email_builder.build(raw)?),
        };

        match self.email_builder.build_with_policy_check(raw, gate).await {
            Err(e) if self.fails_open(&e) => {
                warn!(error = %e, "policy check failed, accepting email (fail-open)");
                Ok(self.email_builder.build(raw)?)
            }
            result => Ok(result?),
        }
    }

    fn check_name(&self, raw: &str) -> AppResult<DisplayName> {
        Ok(self.name_builder.build(raw)?)
    }

    fn validate(&self, email_raw: &str, name_raw: &str) -> AppResult<()> {
        let errors =
            User::validate_raw_with(&self.email_builder, &self.name_builder, email_raw, name_raw);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::InvalidFields(errors))
        }
    }

    async fn register(
        &self,
        email_raw: &str,
        name_raw: &str,
        id: Option<UserId>,
    ) -> AppResult<User> {
        let gate = self.gate.as_deref();
        let result = User::create_from_raw_with(
            &self.email_builder,
            &self.name_builder,
            email_raw,
            name_raw,
            gate,
            id,
        )
        .await;

        let user = match result {
            Err(e) if self.fails_open(&e) => {
                warn!(error = %e, "policy check failed, registering anyway (fail-open)");
                User::create_from_raw_with(
                    &self.email_builder,
                    &self.name_builder,
                    email_raw,
                    name_raw,
                    None,
                    id,
                )
                .await?
            }
            result => result?,
        };

        info!(user_id = %user.id(), email = %user.email(), "user registered");
        Ok(user)
    }
}
