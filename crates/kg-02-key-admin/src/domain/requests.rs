//! Validated input for key creation and updates.

use serde::{Deserialize, Serialize};

use crate::error::{KeyAdminError, KeyAdminResult};

/// Shortest allowed validity, in days.
pub const MIN_EXPIRE_DAYS: u32 = 1;
/// Longest allowed validity, in days (about ten years).
pub const MAX_EXPIRE_DAYS: u32 = 3650;

/// Request to create a key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewKey {
    pub key: String,
    pub expire_days: u32,
    #[serde(default)]
    pub notes: String,
}

impl NewKey {
    pub fn new(key: impl Into<String>, expire_days: u32, notes: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            expire_days,
            notes: notes.into(),
        }
    }

    /// Trimmed copy, or the first validation failure.
    pub fn normalized(&self) -> KeyAdminResult<Self> {
        Ok(Self {
            key: normalize_key(&self.key)?,
            expire_days: check_expire_days(self.expire_days)?,
            notes: self.notes.trim().to_string(),
        })
    }
}

/// Request to change an existing key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateKey {
    pub key: String,
    pub expire_days: u32,
    #[serde(default)]
    pub notes: String,
}

impl UpdateKey {
    pub fn new(key: impl Into<String>, expire_days: u32, notes: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            expire_days,
            notes: notes.into(),
        }
    }

    /// Trimmed copy, or the first validation failure.
    pub fn normalized(&self) -> KeyAdminResult<Self> {
        Ok(Self {
            key: normalize_key(&self.key)?,
            expire_days: check_expire_days(self.expire_days)?,
            notes: self.notes.trim().to_string(),
        })
    }
}

/// Trim a key and reject it when nothing is left.
pub fn normalize_key(raw: &str) -> KeyAdminResult<String> {
    let key = raw.trim();
    if key.is_empty() {
        return Err(KeyAdminError::validation("Please enter a key"));
    }
    Ok(key.to_string())
}

fn check_expire_days(days: u32) -> KeyAdminResult<u32> {
    if (MIN_EXPIRE_DAYS..=MAX_EXPIRE_DAYS).contains(&days) {
        Ok(days)
    } else {
        Err(KeyAdminError::validation(format!(
            "Please enter valid expire days ({}-{})",
            MIN_EXPIRE_DAYS, MAX_EXPIRE_DAYS
        )))
    }
}
