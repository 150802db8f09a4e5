//! Correlation ID for matching a response script to its pending call.
//!
//! The remote side only ever sees the rendered callback name, so the ID has to
//! survive a round trip through a valid script identifier:
//! `kgcb_<seq>_<issued_ms>`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix of every callback name handed to the remote side.
pub const CALLBACK_PREFIX: &str = "kgcb";

/// Correlation ID for one bridge invocation.
///
/// `seq` is monotonic per registry; `issued_ms` salts it with wall-clock time
/// so names from two registries (or two process runs) never look alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CorrelationId {
    seq: u64,
    issued_ms: u64,
}

impl CorrelationId {
    /// Create from parts.
    pub fn new(seq: u64, issued_ms: u64) -> Self {
        Self { seq, issued_ms }
    }

    /// Per-registry sequence number.
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Wall-clock milliseconds at allocation.
    pub fn issued_ms(&self) -> u64 {
        self.issued_ms
    }

    /// Name under which the response handler is registered.
    pub fn callback_name(&self) -> String {
        self.to_string()
    }

    /// Parse a callback name back into an ID.
    ///
    /// Returns `None` for anything this bridge could not have issued.
    pub fn parse(name: &str) -> Option<Self> {
        let rest = name.strip_prefix(CALLBACK_PREFIX)?.strip_prefix('_')?;
        let (seq, issued_ms) = rest.split_once('_')?;
        if !is_plain_number(seq) || !is_plain_number(issued_ms) {
            return None;
        }
        Some(Self {
            seq: seq.parse().ok()?,
            issued_ms: issued_ms.parse().ok()?,
        })
    }
}

fn is_plain_number(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_{}", CALLBACK_PREFIX, self.seq, self.issued_ms)
    }
}
