//! Bridge services: the script transport and the retry coordinator on top.

pub mod bridge;
pub mod retry;

pub use bridge::ScriptBridge;
pub use retry::RetryCoordinator;
