//! # KG-02 Key Admin - license key administration
//!
//! Loads the key collection from the remote sheet through the API bridge,
//! applies confirmed mutations locally, and reports progress on the panel
//! event bus. When the sheet cannot be reached the service switches to a
//! built-in demo collection so the panel stays usable offline.
//!
//! ## Operations
//!
//! | Operation | Remote call | Local effect |
//! |-----------|-------------|--------------|
//! | `initialize` | `test` (single attempt) | load keys or demo |
//! | `load_keys` / `refresh` | `getkeys` | replace collection |
//! | `ban_key` | `ban` | status becomes banned |
//! | `delete_key` | `deletekey` | record removed |
//! | `add_key` | `addkey` | record appended |
//! | `update_key` | `updatekey` | notes and expiry changed |

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod domain;
pub mod error;
pub mod service;

pub use domain::{
    demo_keys, KeyCollection, KeySource, NewKey, UpdateKey, MAX_EXPIRE_DAYS, MIN_EXPIRE_DAYS,
};
pub use error::{KeyAdminError, KeyAdminResult};
pub use service::KeyAdminService;
