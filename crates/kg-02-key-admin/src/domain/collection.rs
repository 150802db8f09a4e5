//! The locally held key collection.
//!
//! A plain in-memory mirror of the remote sheet. Mutations are applied only
//! after the remote side confirmed them; nothing here talks to the network.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared_types::{KeyRecord, KeyStats, KeyStatus};

/// Where the current collection came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum KeySource {
    /// Nothing loaded yet.
    #[default]
    Empty,
    /// Loaded from the remote sheet.
    Remote,
    /// Built-in demo records.
    Demo,
}

impl KeySource {
    pub fn is_demo(&self) -> bool {
        matches!(self, KeySource::Demo)
    }
}

#[derive(Debug, Clone, Default)]
pub struct KeyCollection {
    records: Vec<KeyRecord>,
    source: KeySource,
}

impl KeyCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every record.
    pub fn replace(&mut self, records: Vec<KeyRecord>, source: KeySource) {
        self.records = records;
        self.source = source;
    }

    pub fn source(&self) -> KeySource {
        self.source
    }

    pub fn records(&self) -> &[KeyRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.records.iter().any(|r| r.key == key)
    }

    pub fn get(&self, key: &str) -> Option<&KeyRecord> {
        self.records.iter().find(|r| r.key == key)
    }

    fn get_mut(&mut self, key: &str) -> Option<&mut KeyRecord> {
        self.records.iter_mut().find(|r| r.key == key)
    }

    /// Mark `key` banned. Returns `false` when it is not held locally.
    pub fn mark_banned(&mut self, key: &str) -> bool {
        match self.get_mut(key) {
            Some(record) => {
                record.status = KeyStatus::Banned;
                true
            }
            None => false,
        }
    }

    /// Drop `key`. Returns `false` when it is not held locally.
    pub fn remove(&mut self, key: &str) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.key != key);
        self.records.len() != before
    }

    pub fn push(&mut self, record: KeyRecord) {
        self.records.push(record);
    }

    /// Overwrite notes and, when given, the expiry of `key`.
    pub fn update(&mut self, key: &str, notes: &str, expire_date: Option<&str>) -> Option<KeyRecord> {
        let record = self.get_mut(key)?;
        record.notes = notes.to_string();
        if let Some(date) = expire_date {
            record.expire_date = date.to_string();
        }
        Some(record.clone())
    }

    /// Case-insensitive substring match over key, hwid, notes and status.
    ///
    /// A blank term matches everything.
    pub fn search(&self, term: &str) -> Vec<KeyRecord> {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return self.records.clone();
        }

        self.records
            .iter()
            .filter(|r| matches_term(r, &term))
            .cloned()
            .collect()
    }

    pub fn stats(&self, today: NaiveDate) -> KeyStats {
        KeyStats::compute(&self.records, today)
    }
}

fn matches_term(record: &KeyRecord, term: &str) -> bool {
    record.key.to_lowercase().contains(term)
        || record
            .hwid()
            .is_some_and(|h| h.to_lowercase().contains(term))
        || record.notes.to_lowercase().contains(term)
        || record.status.as_str().to_lowercase().contains(term)
}
