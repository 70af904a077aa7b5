use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, instrument, trace};

use crate::linter::{range::Range, tokens::LineTokenSource};

/// One step of a JSON-pointer-like path into a parsed document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    Index(usize),
    Key(String),
}

impl PathSegment {
    /// Build a segment from a raw pointer component. Components that read as
    /// numbers are array indices, which is how validators report them.
    pub fn parse(raw: &str) -> Self {
        match raw.parse::<usize>() {
            Ok(index) => PathSegment::Index(index),
            Err(_) => PathSegment::Key(raw.to_string()),
        }
    }

    /// Parse an RFC 6901 pointer such as `/paths/~1pets/get`.
    pub fn from_pointer(pointer: &str) -> Vec<Self> {
        pointer
            .split('/')
            .skip(1)
            .map(|part| Self::parse(&part.replace("~1", "/").replace("~0", "~")))
            .collect()
    }

    /// The key this segment names, if it can appear as a token in the source.
    pub fn as_key(&self) -> Option<&str> {
        match self {
            PathSegment::Key(key) if !is_numeric(key) => Some(key),
            _ => None,
        }
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Index(index) => write!(f, "{}", index),
            PathSegment::Key(key) => f.write_str(key),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(raw: &str) -> Self {
        PathSegment::Key(raw.to_string())
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}

/// Whether `key` reads as a number the way validators spell indices and
/// status codes: decimal or exponent notation, `0x`/`0o`/`0b` literals, a
/// signed `Infinity`, or blank. Words such as `nan` or `inf` are keys.
fn is_numeric(key: &str) -> bool {
    let trimmed = key.trim();
    if trimmed.is_empty() {
        return true;
    }

    let unsigned = trimmed.strip_prefix(['+', '-']).unwrap_or(trimmed);
    if unsigned == "Infinity" {
        return true;
    }

    if let Some(digits) = radix_digits(trimmed) {
        return digits;
    }

    unsigned
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'))
        && trimmed.parse::<f64>().is_ok()
}

/// For an unsigned `0x`/`0o`/`0b` literal, whether its digits are valid.
fn radix_digits(literal: &str) -> Option<bool> {
    let prefix = literal.get(..2)?.to_ascii_lowercase();
    let radix = match prefix.as_str() {
        "0x" => 16,
        "0o" => 8,
        "0b" => 2,
        _ => return None,
    };
    let digits = &literal[2..];
    Some(!digits.is_empty() && digits.chars().all(|c| c.is_digit(radix)))
}

/// Drop the segments that have no lexical representation (array indices and
/// numeric-looking keys), keeping the key names in order.
pub fn key_segments(path: &[PathSegment]) -> Vec<&str> {
    path.iter().filter_map(PathSegment::as_key).collect()
}

/// Locate the source range of the key token that `path` ends at.
///
/// # Algorithm
///
/// 1. Strip numeric segments, since array indices never appear as key tokens.
/// 2. Scan lines from 0 up to and including `source.line_count()`, stopping
///    early when the source has no tokens for a line.
/// 3. Walk each line's tokens left to right, tracking the character offset of
///    the current token.
/// 4. A token that is a structural key and equals the next unmatched segment
///    advances the match. This is a greedy subsequence match, so a repeated
///    key name at another depth can be picked up instead of the intended one.
/// 5. When every segment has matched, the range of the last matching token is
///    returned.
///
/// Returns `None` when the document ends before the whole path matched, or
/// when the path has no key segments at all.
#[instrument(level = "debug", skip_all, fields(path = %display_path(path)))]
pub fn resolve_range<S: LineTokenSource + ?Sized>(path: &[PathSegment], source: &S) -> Option<Range> {
    let keys = key_segments(path);
    if keys.is_empty() {
        debug!("path has no key segments");
        return None;
    }

    let mut next = 0;
    let last_line = source.line_count();

    for line_number in 0..=last_line {
        let Some(line) = source.tokens_for_line(line_number) else {
            trace!(line_number, "tokenization unavailable, treating as end of document");
            break;
        };

        let mut offset = 0;
        for token in &line.tokens {
            let width = token.len();
            if token.is_structural_key() && token.value == keys[next] {
                next += 1;
                trace!(line_number, offset, key = %token.value, matched = next, "matched key");
                if next == keys.len() {
                    return Some(Range::on_line(line_number, offset, offset + width));
                }
            }
            offset += width;
        }
    }

    debug!(matched = next, total = keys.len(), "path did not resolve");
    None
}

/// Render a path as a JSON pointer for logs and messages.
pub fn display_path(path: &[PathSegment]) -> String {
    path.iter()
        .map(|segment| format!("/{}", segment))
        .collect::<String>()
}
