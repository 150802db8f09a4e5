//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use kg_01_bridge::{ConfigError, KeygateConfig};

/// Keygate admin: manage license keys in the remote sheet
#[derive(Parser, Debug)]
#[command(name = "kg-admin")]
#[command(about = "Manage license keys through the key sheet API")]
pub struct Args {
    /// TOML configuration file
    #[arg(short, long, env = "KG_CONFIG")]
    pub config: Option<PathBuf>,

    /// API deployment URL (overrides the file and KG_API_URL)
    #[arg(long)]
    pub api_url: Option<String>,

    /// Shared secret (overrides the file and KG_SECRET)
    #[arg(long)]
    pub secret: Option<String>,

    /// Work on the built-in demo data without contacting the API
    #[arg(long)]
    pub demo: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Check that the API answers
    Test,
    /// List keys
    List {
        /// Only keys whose key, hwid, notes or status contain this text
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show key statistics
    Stats,
    /// Ban a key
    Ban { key: String },
    /// Delete a key permanently
    Delete { key: String },
    /// Create a key
    Add {
        key: String,
        /// Validity in days (1-3650)
        #[arg(long)]
        days: u32,
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// Change a key's expiry and notes
    Update {
        key: String,
        /// New validity in days (1-3650)
        #[arg(long)]
        days: u32,
        #[arg(long, default_value = "")]
        notes: String,
    },
}

impl Command {
    /// Whether the command changes the remote sheet.
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Command::Ban { .. } | Command::Delete { .. } | Command::Add { .. } | Command::Update { .. }
        )
    }
}

impl Args {
    /// File, then environment, then flags.
    pub fn resolve_config(&self) -> Result<KeygateConfig, ConfigError> {
        let mut config = KeygateConfig::load(self.config.as_deref())?;
        if let Some(url) = &self.api_url {
            config.api.base_url = url.clone();
        }
        if let Some(secret) = &self.secret {
            config.api.secret = secret.clone();
        }
        Ok(config)
    }
}
