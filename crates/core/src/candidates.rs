use std::sync::OnceLock;

use regex::Regex;

use crate::money::{normalize, CanonicalAmount};

// ── Compiled regex cache ─────────────────────────────────────────────────────

macro_rules! re {
    ($name:ident, $pat:expr) => {
        fn $name() -> &'static Regex {
            static R: OnceLock<Regex> = OnceLock::new();
            R.get_or_init(|| Regex::new($pat).expect("invalid regex"))
        }
    };
}

// Thousands-grouped run tried before a bare run, then an optional 2-digit fraction.
// ASCII digits only, matching what `normalize` keeps.
re!(re_money,
    r"(?:[0-9]{1,3}(?:[.,][0-9]{3})+|[0-9]+)(?:[.,][0-9]{2})?");

/// A money-like span found in a line, kept alongside its canonical form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate<'a> {
    pub raw: &'a str,
    /// Byte offsets of `raw` within the scanned line.
    pub start: usize,
    pub end: usize,
    pub normalized: CanonicalAmount,
}

/// Scan `line` left to right for non-overlapping money-like tokens.
pub fn scan_candidates(line: &str) -> Vec<Candidate<'_>> {
    re_money()
        .find_iter(line)
        .map(|m| Candidate {
            raw: m.as_str(),
            start: m.start(),
            end: m.end(),
            normalized: normalize(m.as_str()),
        })
        .collect()
}

/// Normalized amounts of every money-like token in `line`, in scan order.
pub fn extract_candidates(line: &str) -> Vec<CanonicalAmount> {
    re_money()
        .find_iter(line)
        .map(|m| normalize(m.as_str()))
        .collect()
}
