//! Key administration domain

pub mod collection;
pub mod demo;
pub mod requests;

pub use collection::{KeyCollection, KeySource};
pub use demo::demo_keys;
pub use requests::{normalize_key, NewKey, UpdateKey, MAX_EXPIRE_DAYS, MIN_EXPIRE_DAYS};
