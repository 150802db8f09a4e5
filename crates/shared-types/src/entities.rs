//! # Key Entities
//!
//! The license-key records managed by the panel, exactly as the remote
//! spreadsheet API serialises them.
//!
//! Dates arrive as strings. The sheet usually sends `YYYY-MM-DD`, but cells
//! formatted as timestamps come back as full ISO 8601 (`2025-12-31T00:00:00.000Z`),
//! so only the leading date part is ever parsed.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Lifecycle status of a license key.
///
/// Matching is case-insensitive and a blank cell reads as `Active`. Any other
/// value is kept verbatim in `Other` so it survives a round trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum KeyStatus {
    /// Key can be used.
    #[default]
    Active,
    /// Key was revoked by an administrator.
    Banned,
    /// Key passed its expiry date.
    Expired,
    /// A status this panel does not know about.
    Other(String),
}

impl KeyStatus {
    /// Read a status cell.
    #[must_use]
    pub fn from_wire(raw: &str) -> Self {
        let raw = raw.trim();
        match raw.to_ascii_lowercase().as_str() {
            "" | "active" => KeyStatus::Active,
            "banned" => KeyStatus::Banned,
            "expired" => KeyStatus::Expired,
            _ => KeyStatus::Other(raw.to_string()),
        }
    }

    /// Wire name of the status.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            KeyStatus::Active => "active",
            KeyStatus::Banned => "banned",
            KeyStatus::Expired => "expired",
            KeyStatus::Other(raw) => raw,
        }
    }
}

impl std::fmt::Display for KeyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for KeyStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for KeyStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        sheet_cell::text(deserializer).map(|raw| KeyStatus::from_wire(&raw))
    }
}

/// Lenient decoding of spreadsheet cells.
///
/// The sheet returns whatever a cell holds: text, a number, a boolean, or
/// `null` for a blank cell. All of them decode to text.
pub mod sheet_cell {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Cell {
        Text(String),
        Unsigned(u64),
        Signed(i64),
        Float(f64),
        Bool(bool),
    }

    impl Cell {
        fn into_text(self) -> String {
            match self {
                Cell::Text(text) => text,
                Cell::Unsigned(n) => n.to_string(),
                Cell::Signed(n) => n.to_string(),
                Cell::Float(n) => n.to_string(),
                Cell::Bool(b) => b.to_string(),
            }
        }
    }

    /// Any scalar cell as text; `null` reads as empty.
    pub fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        Ok(optional(deserializer)?.unwrap_or_default())
    }

    /// Any scalar cell as text; `null` reads as `None`.
    pub fn optional<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<String>, D::Error> {
        Ok(Option::<Cell>::deserialize(deserializer)?.map(Cell::into_text))
    }
}

/// A license key row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyRecord {
    /// The key string itself. Unique within a collection.
    #[serde(deserialize_with = "sheet_cell::text")]
    pub key: String,
    /// Expiry date as sent by the sheet.
    #[serde(default, deserialize_with = "sheet_cell::text")]
    pub expire_date: String,
    /// Current status.
    #[serde(default)]
    pub status: KeyStatus,
    /// Hardware binding, empty until the key is first used.
    #[serde(
        default,
        deserialize_with = "sheet_cell::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub hwid: Option<String>,
    /// Free-text administrator notes.
    #[serde(default, deserialize_with = "sheet_cell::text")]
    pub notes: String,
    /// Creation date as sent by the sheet.
    #[serde(default, deserialize_with = "sheet_cell::text")]
    pub created_date: String,
}

impl KeyRecord {
    /// Create an active record with no hardware binding.
    pub fn new(
        key: impl Into<String>,
        expire_date: impl Into<String>,
        notes: impl Into<String>,
        created_date: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            expire_date: expire_date.into(),
            status: KeyStatus::Active,
            hwid: None,
            notes: notes.into(),
            created_date: created_date.into(),
        }
    }

    /// Parsed expiry date, if the sheet sent something date-like.
    #[must_use]
    pub fn expiry(&self) -> Option<NaiveDate> {
        parse_sheet_date(&self.expire_date)
    }

    /// Whether the key is expired on `today`.
    ///
    /// A key lapses at the start of its expiry day, so it counts as expired on
    /// that day already. Records with an unparseable expiry never expire.
    #[must_use]
    pub fn is_expired_on(&self, today: NaiveDate) -> bool {
        self.expiry().is_some_and(|d| d <= today)
    }

    /// Hardware binding, treating an empty string as unset.
    #[must_use]
    pub fn hwid(&self) -> Option<&str> {
        self.hwid.as_deref().filter(|h| !h.is_empty())
    }
}

/// Parse the date part of a sheet date string.
#[must_use]
pub fn parse_sheet_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let date_part = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// Aggregate counters over a key collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KeyStats {
    pub total_keys: usize,
    pub active_keys: usize,
    pub banned_keys: usize,
    pub expired_keys: usize,
    /// One user per key.
    pub total_users: usize,
    /// Active keys that are not yet expired, floored at zero.
    pub active_users: usize,
}

impl KeyStats {
    /// Compute statistics for `keys` as of `today`.
    #[must_use]
    pub fn compute(keys: &[KeyRecord], today: NaiveDate) -> Self {
        let total_keys = keys.len();
        let active_keys = keys.iter().filter(|k| k.status == KeyStatus::Active).count();
        let banned_keys = keys.iter().filter(|k| k.status == KeyStatus::Banned).count();
        let expired_keys = keys.iter().filter(|k| k.is_expired_on(today)).count();

        Self {
            total_keys,
            active_keys,
            banned_keys,
            expired_keys,
            total_users: total_keys,
            active_users: active_keys.saturating_sub(expired_keys),
        }
    }
}
