//! Username validation and batch normalization.
//!
//! A remote-directory username is 1–39 characters of ASCII letters, digits,
//! and single hyphens, never starting or ending with a hyphen. The `regex`
//! crate has no lookahead, so the "hyphen must be followed by an
//! alphanumeric" rule is expressed as hyphen-separated alphanumeric runs
//! plus an explicit length cap.

use std::collections::HashSet;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Longest username the remote directory accepts.
pub const MAX_USERNAME_LEN: usize = 39;

static USERNAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9]+(?:-[A-Za-z0-9]+)*$").expect("valid regex")
});

/// A validated remote-directory username.
///
/// Only constructible through [`Username::parse`], so holding one proves the
/// value passed the format check.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Username(String);

impl Username {
    /// Validates `raw` and wraps it. Returns `None` for blank or malformed input.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        if is_valid_username(raw) {
            Some(Self(raw.to_owned()))
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Returns `true` if `raw` is a well-formed username.
#[must_use]
pub fn is_valid_username(raw: &str) -> bool {
    !raw.trim().is_empty() && raw.len() <= MAX_USERNAME_LEN && USERNAME_PATTERN.is_match(raw)
}

/// Deduplicates, validates, and sorts a batch of raw username candidates.
///
/// - Duplicates are removed by exact string equality (case-sensitive).
/// - Empty, whitespace-only, and malformed entries are dropped silently.
/// - Survivors are sorted by ordinal byte order, so `"JaneJo"` sorts before
///   `"johndoe"`.
#[must_use]
pub fn normalize_usernames<S: AsRef<str>>(raw: &[S]) -> Vec<Username> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(raw.len());
    let mut valid: Vec<Username> = Vec::with_capacity(raw.len());

    for candidate in raw.iter().map(AsRef::as_ref) {
        if !seen.insert(candidate) {
            continue;
        }
        match Username::parse(candidate) {
            Some(username) => valid.push(username),
            None => tracing::debug!(candidate, "dropping invalid username"),
        }
    }

    // Byte order on `String` is ordinal comparison.
    valid.sort();
    valid
}
