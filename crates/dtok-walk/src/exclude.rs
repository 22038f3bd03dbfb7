//! Exclude-pattern normalization so equivalent spellings collapse to one glob.

use std::path::Path;

use dtok_path::normalize_rel_path;

/// Normalize one exclude pattern:
/// - an absolute path under `root` becomes root-relative
/// - `\` becomes `/`
/// - leading `./` is stripped
#[must_use]
pub fn normalize_exclude_pattern(root: &Path, pattern: &str) -> String {
    let path = Path::new(pattern);
    let rel = if path.is_absolute() {
        path.strip_prefix(root).unwrap_or(path)
    } else {
        path
    };
    normalize_rel_path(&rel.to_string_lossy())
}

/// Whether `existing` already holds `pattern` after normalization.
#[must_use]
pub fn has_exclude_pattern(existing: &[String], pattern: &str) -> bool {
    let normalized = normalize_rel_path(pattern);
    existing
        .iter()
        .any(|candidate| normalize_rel_path(candidate) == normalized)
}

/// Push `pattern` unless it is empty or already present. Returns whether it was added.
pub fn add_exclude_pattern(existing: &mut Vec<String>, pattern: String) -> bool {
    if pattern.is_empty() || has_exclude_pattern(existing, &pattern) {
        return false;
    }
    existing.push(pattern);
    true
}

/// Normalize and dedupe a whole exclude list, keeping first-seen order.
#[must_use]
pub fn normalize_exclude_patterns(root: &Path, patterns: &[String]) -> Vec<String> {
    let mut out = Vec::with_capacity(patterns.len());
    for pattern in patterns {
        add_exclude_pattern(&mut out, normalize_exclude_pattern(root, pattern));
    }
    out
}
