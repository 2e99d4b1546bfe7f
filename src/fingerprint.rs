//! Directory content fingerprints.
//!
//! A fingerprint summarises the direct entries of a directory: their names and
//! modification times. It is exposed to page templates (e.g. as a cache-busting
//! key) and never decides whether anything is regenerated.
//!
//! # Key computation
//!
//! Entries are sorted by name and fed to SHA-256 as `name\0mtime\n`, where
//! `mtime` is nanoseconds since the Unix epoch (0 when unavailable). The first
//! 16 hex digits of the digest are kept. The value is stable for a given tree on
//! a given machine; it is not meant to match across platforms.

use sha2::{Digest, Sha256};
use std::time::{SystemTime, UNIX_EPOCH};

/// Number of hex digits kept from the digest.
const FINGERPRINT_LEN: usize = 16;

/// One direct entry contributing to a fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct EntryStamp {
    pub name: String,
    pub mtime_nanos: u128,
}

impl EntryStamp {
    pub fn new(name: impl Into<String>, modified: Option<SystemTime>) -> Self {
        let mtime_nanos = modified
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        Self {
            name: name.into(),
            mtime_nanos,
        }
    }
}

/// Hash the sorted (name, mtime) sequence of a directory's entries.
pub fn content_fingerprint(mut entries: Vec<EntryStamp>) -> String {
    entries.sort();
    let mut hasher = Sha256::new();
    for entry in &entries {
        hasher.update(entry.name.as_bytes());
        hasher.update(b"\0");
        hasher.update(entry.mtime_nanos.to_string().as_bytes());
        hasher.update(b"\n");
    }
    let mut hex = format!("{:x}", hasher.finalize());
    hex.truncate(FINGERPRINT_LEN);
    hex
}
