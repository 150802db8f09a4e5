//! KG-Admin: Keygate admin CLI
//!
//! Runs one key administration command against the remote key sheet and
//! prints the panel events it produced.
//!
//! ```text
//! kg-admin --config keygate.toml list --search vip
//! [..] Loading keys data...
//! [ok] Loaded 42 keys successfully!
//! KEY           EXPIRES     STATUS  HWID         NOTES
//! VIP-KEY-2024  2025-12-31  ACTIVE  USER-PC-001  Premium user
//! ```

pub mod cli;
pub mod ui;

pub use cli::{Args, Command};
