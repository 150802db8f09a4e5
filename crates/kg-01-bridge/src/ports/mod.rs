//! Ports for the API bridge.
//!
//! Inbound: what the retry coordinator drives (`CallTransport`).
//! Outbound: what the bridge needs from the outside world.

pub mod inbound;
pub mod outbound;

pub use inbound::CallTransport;
pub use outbound::{DirectFetcher, ScriptLoader, SystemTimeSource, TimeSource};
