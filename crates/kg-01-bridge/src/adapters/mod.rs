//! Adapters for the bridge's outbound ports.

pub mod http;

pub use http::{HttpDirectFetcher, HttpScriptLoader};
