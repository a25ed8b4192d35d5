//! Label normalization
//!
//! Categories and tags share one normalization rule: surrounding whitespace is
//! trimmed and empty results are discarded. Comparison after trimming is exact
//! and case-sensitive ("Lunch" and "lunch" are different labels).

use std::collections::HashSet;

/// Trim surrounding whitespace from a label
pub fn normalize_label(value: &str) -> String {
    value.trim().to_string()
}

/// Normalize an optional label, mapping absent or blank input to `None`
pub fn normalize_optional_label(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

/// Normalize, drop empties and de-duplicate, keeping order of first occurrence
pub fn unique_labels<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for value in values {
        let label = value.as_ref().trim();
        if label.is_empty() || seen.contains(label) {
            continue;
        }
        seen.insert(label.to_string());
        out.push(label.to_string());
    }
    out
}

/// Split a comma-separated tag input into trimmed, non-empty labels
///
/// Duplicates are kept; they are collapsed when the recipe is stored.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
