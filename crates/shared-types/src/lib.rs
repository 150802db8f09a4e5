//! # Shared Types Crate
//!
//! Value types shared across the Keygate workspace.
//!
//! ## Design Principles
//!
//! - **Opaque Transport**: The bridge never interprets a `KeyRecord`; it only
//!   carries the JSON the remote sheet produced. Interpretation happens in the
//!   key administration service.
//! - **Single Source of Truth**: Anything that crosses a crate boundary
//!   (records, statistics, alert levels, connectivity causes) is defined here.

pub mod entities;
pub mod panel;

pub use entities::*;
pub use panel::*;
