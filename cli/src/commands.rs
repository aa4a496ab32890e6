//! Command implementations.
//!
//! Each command returns a serializable report; printing and exit codes are
//! handled by `main`.

use serde::Serialize;

use common::{AppError, AppResult, RegistrationConfig};
use domain::{DisplayName, Email, User};
use registration_service::{RegistrationService, Registrar};

use crate::args::Commands;

/// Outcome of a successful command
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Report {
    Email(EmailReport),
    Name { name: DisplayName },
    User(User),
    Valid { valid: bool },
}

#[derive(Debug, Serialize)]
pub struct EmailReport {
    pub email: Email,
    pub local_part: String,
    pub domain_part: String,
}

impl From<Email> for EmailReport {
    fn from(email: Email) -> Self {
        Self {
            local_part: email.local_part().to_string(),
            domain_part: email.domain_part().to_string(),
            email,
        }
    }
}

impl Report {
    pub fn to_json(&self, pretty: bool) -> AppResult<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        };
        json.map_err(|e| AppError::internal(format!("cannot serialize report: {}", e)))
    }
}

/// Build the registrar from configuration and run `command`.
pub async fn execute(command: Commands, config: &RegistrationConfig) -> AppResult<Report> {
    let registrar = Registrar::from_config(config).await?;
    tracing::debug!(?config, "registrar ready");
    run(&registrar, command).await
}

/// Run `command` against any registration service.
pub async fn run<S>(service: &S, command: Commands) -> AppResult<Report>
where
    S: RegistrationService + ?Sized,
{
    match command {
        Commands::Email { raw } => {
            let email = service.check_email(&raw).await?;
            Ok(Report::Email(email.into()))
        }
        Commands::Name { raw } => Ok(Report::Name {
            name: service.check_name(&raw)?,
        }),
        Commands::User { email, name, id } => {
            let user = service.register(&email, &name, id).await?;
            Ok(Report::User(user))
        }
        Commands::Check { email, name } => {
            service.validate(&email, &name)?;
            Ok(Report::Valid { valid: true })
        }
    }
}
