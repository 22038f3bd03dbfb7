//! Path normalization helpers shared by discovery, matching and reporting.

use std::path::Path;

/// Normalize a relative path for matching and display:
/// - converts `\` to `/`
/// - strips every leading `./`
///
/// # Examples
///
/// ```
/// use dtok_path::normalize_rel_path;
///
/// assert_eq!(normalize_rel_path("./src/theme.scss"), "src/theme.scss");
/// assert_eq!(normalize_rel_path(r".\styles\_vars.scss"), "styles/_vars.scss");
/// assert_eq!(normalize_rel_path("../shared/tokens.js"), "../shared/tokens.js");
/// ```
#[must_use]
pub fn normalize_rel_path(path: &str) -> String {
    let mut normalized = if path.contains('\\') {
        path.replace('\\', "/")
    } else {
        path.to_string()
    };
    while let Some(stripped) = normalized.strip_prefix("./") {
        normalized = stripped.to_string();
    }
    normalized
}

/// Display `path` relative to `root` with forward slashes.
///
/// Paths outside `root` are kept whole.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use dtok_path::relative_display;
///
/// let root = Path::new("/repo");
/// assert_eq!(relative_display(root, Path::new("/repo/src/a.scss")), "src/a.scss");
/// ```
#[must_use]
pub fn relative_display(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    normalize_rel_path(&rel.to_string_lossy())
}

/// Lowercase extension of `path` without the dot, if any.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use dtok_path::extension_lower;
///
/// assert_eq!(extension_lower(Path::new("Button.SCSS")), Some("scss".to_string()));
/// assert_eq!(extension_lower(Path::new("Makefile")), None);
/// ```
#[must_use]
pub fn extension_lower(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty())
        .map(|e| e.to_ascii_lowercase())
}

/// Normalize a configured extension (`".SCSS"` → `"scss"`).
#[must_use]
pub fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn normalize_rel_path_strips_repeated_dot_slash() {
        assert_eq!(normalize_rel_path("././src/a.css"), "src/a.css");
    }

    #[test]
    fn relative_display_keeps_outside_paths() {
        let got = relative_display(Path::new("/repo"), Path::new("/elsewhere/a.css"));
        assert_eq!(got, "/elsewhere/a.css");
    }

    #[test]
    fn extension_lower_handles_dotfiles() {
        assert_eq!(extension_lower(Path::new(".env")), None);
        assert_eq!(extension_lower(Path::new("dir/theme.Tokens.JSON")), Some("json".to_string()));
    }

    #[test]
    fn normalize_extension_strips_dot_and_case() {
        assert_eq!(normalize_extension(".SCSS"), "scss");
        assert_eq!(normalize_extension(" tsx "), "tsx");
    }

    proptest! {
        #[test]
        fn normalize_rel_path_no_backslashes(path in "\\PC*") {
            prop_assert!(!normalize_rel_path(&path).contains('\\'));
        }

        #[test]
        fn normalize_rel_path_idempotent(path in "\\PC*") {
            let once = normalize_rel_path(&path);
            let twice = normalize_rel_path(&once);
            prop_assert_eq!(once, twice);
        }
    }
}
