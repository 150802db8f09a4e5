//! Plain-text rendering for the terminal.
//!
//! Every function returns a `String` so output can be tested without a
//! terminal; `main` decides where it goes.

mod events;
mod table;

pub use events::render_event;
pub use table::render_keys;

use shared_types::KeyStats;

/// Statistics block, one counter per line.
pub fn render_stats(stats: &KeyStats) -> String {
    let rows = [
        ("Total keys", stats.total_keys),
        ("Active keys", stats.active_keys),
        ("Banned keys", stats.banned_keys),
        ("Expired keys", stats.expired_keys),
        ("Total users", stats.total_users),
        ("Active users", stats.active_users),
    ];

    rows.iter()
        .map(|(label, value)| format!("{:<14}{:>6}\n", label, value))
        .collect()
}
