//! Built-in records shown when the remote sheet is unreachable.

use shared_types::{KeyRecord, KeyStatus};

fn record(
    key: &str,
    expire_date: &str,
    status: KeyStatus,
    hwid: &str,
    notes: &str,
    created_date: &str,
) -> KeyRecord {
    KeyRecord {
        status,
        hwid: Some(hwid.to_string()),
        ..KeyRecord::new(key, expire_date, notes, created_date)
    }
}

/// The offline demo collection.
pub fn demo_keys() -> Vec<KeyRecord> {
    vec![
        record(
            "VIP-KEY-2024",
            "2025-12-31",
            KeyStatus::Active,
            "USER-PC-001",
            "Premium user",
            "2024-01-15",
        ),
        record(
            "TEST-KEY-001",
            "2024-06-30",
            KeyStatus::Active,
            "TEST-HWID",
            "Testing account",
            "2024-01-10",
        ),
        record(
            "BANNED-KEY-002",
            "2024-12-31",
            KeyStatus::Banned,
            "HWID-456789",
            "Violation of terms",
            "2024-01-05",
        ),
    ]
}
