//! Registration configuration loaded from environment variables.

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use domain::DEFAULT_POLICY_TIMEOUT_MS;

// =============================================================================
// Environment variables
// =============================================================================

/// Path to a policy blocklist file
pub const ENV_BLOCKLIST: &str = "REGCHECK_BLOCKLIST";

/// Policy gate timeout in milliseconds
pub const ENV_POLICY_TIMEOUT_MS: &str = "REGCHECK_POLICY_TIMEOUT_MS";

/// What to do when the policy gate cannot answer: `open` or `closed`
pub const ENV_ON_POLICY_FAILURE: &str = "REGCHECK_ON_POLICY_FAILURE";

/// Comma-separated email domains refused before any policy call
pub const ENV_DENIED_DOMAINS: &str = "REGCHECK_DENIED_DOMAINS";

/// How a caller treats a policy gate that failed to answer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyFailureMode {
    /// Accept the value as if the gate had let it through
    Open,
    /// Surface the failure to the caller
    #[default]
    Closed,
}

impl FromStr for PolicyFailureMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "open" => Ok(PolicyFailureMode::Open),
            "closed" => Ok(PolicyFailureMode::Closed),
            other => Err(format!(
                "unknown policy failure mode '{}', expected 'open' or 'closed'",
                other
            )),
        }
    }
}

impl fmt::Display for PolicyFailureMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyFailureMode::Open => write!(f, "open"),
            PolicyFailureMode::Closed => write!(f, "closed"),
        }
    }
}

/// Registration configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationConfig {
    /// Blocklist consulted by the policy gate (none = no policy check)
    pub blocklist_path: Option<PathBuf>,
    /// Upper bound for one policy gate call
    pub policy_timeout_ms: u64,
    /// Fail open or closed when the gate cannot answer
    pub on_policy_failure: PolicyFailureMode,
    /// Domains refused by a builder rule
    pub denied_domains: Vec<String>,
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            blocklist_path: None,
            policy_timeout_ms: DEFAULT_POLICY_TIMEOUT_MS,
            on_policy_failure: PolicyFailureMode::default(),
            denied_domains: Vec::new(),
        }
    }
}

impl RegistrationConfig {
    /// Load configuration from environment variables (and `.env`, if present).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Unparseable values fall back to defaults with a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let policy_timeout_ms = lookup(ENV_POLICY_TIMEOUT_MS)
            .and_then(|v| match v.trim().parse::<u64>() {
                Ok(ms) => Some(ms),
                Err(_) => {
                    tracing::warn!(value = %v, "invalid {}, using default", ENV_POLICY_TIMEOUT_MS);
                    None
                }
            })
            .unwrap_or(defaults.policy_timeout_ms);

        let on_policy_failure = lookup(ENV_ON_POLICY_FAILURE)
            .and_then(|v| match v.parse::<PolicyFailureMode>() {
                Ok(mode) => Some(mode),
                Err(e) => {
                    tracing::warn!("{}, using default", e);
                    None
                }
            })
            .unwrap_or(defaults.on_policy_failure);

        Self {
            blocklist_path: lookup(ENV_BLOCKLIST)
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            policy_timeout_ms,
            on_policy_failure,
            denied_domains: lookup(ENV_DENIED_DOMAINS)
                .map(|v| parse_list(&v))
                .unwrap_or_default(),
        }
    }

    pub fn policy_timeout(&self) -> Duration {
        Duration::from_millis(self.policy_timeout_ms)
    }
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
