//! # Integration Flows
//!
//! Everything below the script loader is real: the key administration
//! service drives the retry coordinator, which drives a `ScriptBridge` with
//! its own handler registry and timer. Only the network is scripted.

#[cfg(test)]
mod fixtures;
#[cfg(test)]
mod flows;
#[cfg(test)]
mod transport;
