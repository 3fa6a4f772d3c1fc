//! Numeric-segment version ordering.
//!
//! Dot-separated segments are compared as integers, so "2.10" orders
//! after "2.9". Shorter sequences are zero-padded, making "1.0" equal
//! to "1.0.0".

use std::cmp::Ordering;

/// Parse a dot-separated version into numeric segments. Returns `None`
/// if any segment is not a non-negative integer.
pub fn parse_segments(version: &str) -> Option<Vec<u64>> {
    version
        .split('.')
        .map(|segment| segment.trim().parse::<u64>().ok())
        .collect()
}

/// Compare two parsed versions segment by segment, zero-padding the
/// shorter sequence.
pub fn compare(a: &[u64], b: &[u64]) -> Ordering {
    let len = a.len().max(b.len());
    for i in 0..len {
        let left = a.get(i).copied().unwrap_or(0);
        let right = b.get(i).copied().unwrap_or(0);
        match left.cmp(&right) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    Ordering::Equal
}

/// Strict upgrade gate: true only when `candidate` orders after
/// `current`. Equal, lesser, or unparsable input is "no update".
pub fn is_upgrade(candidate: &str, current: &str) -> bool {
    match (parse_segments(candidate), parse_segments(current)) {
        (Some(candidate), Some(current)) => compare(&candidate, &current) == Ordering::Greater,
        _ => false,
    }
}
