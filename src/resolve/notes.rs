//! Free-text extraction from release notes.

use regex::Regex;
use std::sync::LazyLock;

/// Ordered patterns for the minimum platform version. Each captures a
/// numeric version token. The first pattern matching anywhere in the
/// notes wins; later patterns and larger numbers elsewhere in the text
/// are ignored.
static MIN_VERSION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)requires\s+macos\s+(\d+(?:\.\d+)*)",
        r"(?i)minimum[:\s]\s*macos\s+(\d+(?:\.\d+)*)",
        r"(?i)macos\s+(\d+(?:\.\d+)*)\s+or\s+later",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("static pattern"))
    .collect()
});

/// Extract the minimum platform version stated in release notes.
/// `None` when no pattern matches; that is a valid absence.
pub fn min_platform_version(notes: &str) -> Option<String> {
    MIN_VERSION_PATTERNS
        .iter()
        .find_map(|pattern| pattern.captures(notes))
        .map(|captures| captures[1].to_string())
}
