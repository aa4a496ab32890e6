//! CLI argument definitions.
//!
//! Uses clap derive macros for type-safe argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use common::{PolicyFailureMode, RegistrationConfig};
use domain::UserId;

/// Validate registration input the way the registration service does
#[derive(Parser, Debug)]
#[command(name = "regcheck")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Blocklist file consulted as policy gate
    #[arg(long, global = true)]
    pub blocklist: Option<PathBuf>,

    /// Policy gate timeout in milliseconds
    #[arg(long, global = true)]
    pub policy_timeout_ms: Option<u64>,

    /// Accept (open) or refuse (closed) input when the policy gate cannot answer
    #[arg(long, global = true)]
    pub on_policy_failure: Option<PolicyFailureMode>,

    /// Email domain to refuse outright (repeatable, comma-separated)
    #[arg(long = "deny-domain", global = true, value_delimiter = ',')]
    pub deny_domains: Vec<String>,

    /// Pretty-print JSON output
    #[arg(long, global = true, env = "REGCHECK_PRETTY")]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Validate and normalize an email address
    Email {
        /// Raw email input
        raw: String,
    },

    /// Validate a display name
    Name {
        /// Raw name input
        raw: String,
    },

    /// Register a user from raw email and name
    User {
        email: String,
        name: String,
        /// Use this identity instead of generating one
        #[arg(long)]
        id: Option<UserId>,
    },

    /// Report every field error without registering
    Check { email: String, name: String },
}

impl Cli {
    /// Overlay command-line flags on configuration loaded from the environment.
    pub fn apply_to(&self, mut config: RegistrationConfig) -> RegistrationConfig {
        if let Some(path) = &self.blocklist {
            config.blocklist_path = Some(path.clone());
        }
        if let Some(ms) = self.policy_timeout_ms {
            config.policy_timeout_ms = ms;
        }
        if let Some(mode) = self.on_policy_failure {
            config.on_policy_failure = mode;
        }
        if !self.deny_domains.is_empty() {
            config.denied_domains = self.deny_domains.clone();
        }
        config
    }
}
