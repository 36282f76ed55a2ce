//! DB-Library header checks.

use std::path::Path;

/// Headers that make up the DB-Library API, in inclusion order.
pub const REQUIRED_HEADERS: [&str; 2] = ["sybdb.h", "sybfront.h"];

/// Required headers that are absent from `dir`.
#[must_use]
pub fn missing_headers(dir: &Path) -> Vec<&'static str> {
    REQUIRED_HEADERS
        .iter()
        .copied()
        .filter(|name| !dir.join(name).is_file())
        .collect()
}

/// Check if `dir` holds every required header.
#[must_use]
pub fn has_headers(dir: &Path) -> bool {
    missing_headers(dir).is_empty()
}
