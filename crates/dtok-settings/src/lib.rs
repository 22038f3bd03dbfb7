//! # dtok-settings
//!
//! **Tier 0 (Pure Settings)**
//!
//! Clap-free settings types for the scan and change-detection layers.
//! These mirror the TOML/CLI configuration without Clap or TOML
//! dependencies, so library consumers can build them directly.
//!
//! ## What belongs here
//! * Pure data types with Serde derive
//! * Default values
//!
//! ## What does NOT belong here
//! * Clap parsing (use dtok-config)
//! * I/O operations
//! * Business logic

use serde::{Deserialize, Serialize};

/// Default context window, in characters, on each side of a match start.
pub const DEFAULT_CONTEXT_WIDTH: usize = 50;

/// Default lookback used when a repository has no recorded commit pointer.
pub const DEFAULT_LOOKBACK_HOURS: u32 = 24;

/// Default number of lines searched after a removed line for its replacement.
pub const DEFAULT_LOOKAHEAD: usize = 4;

/// Options for scanning one repository.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScanOptions {
    /// Include globs, relative to the repository root.
    #[serde(default = "default_include")]
    pub include: Vec<String>,

    /// Exclude globs, applied after includes as a blanket filter.
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,

    /// Characters of context kept on each side of a match start.
    #[serde(default = "default_context_width")]
    pub context_width: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            include: default_include(),
            exclude: default_exclude(),
            context_width: DEFAULT_CONTEXT_WIDTH,
        }
    }
}

fn default_include() -> Vec<String> {
    vec!["**/*".to_string()]
}

fn default_exclude() -> Vec<String> {
    [
        "**/node_modules/**",
        "**/dist/**",
        "**/build/**",
        "**/coverage/**",
        "**/vendor/**",
        "**/.git/**",
        "**/*.min.css",
        "**/*.min.js",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_context_width() -> usize {
    DEFAULT_CONTEXT_WIDTH
}

/// Options for one change-detection pass over a repository's history.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChangeOptions {
    /// History window used when no commit pointer has been recorded yet.
    #[serde(default = "default_lookback_hours")]
    pub lookback_hours: u32,

    /// Lines searched after a removed token line for its replacement.
    #[serde(default = "default_lookahead")]
    pub lookahead: usize,
}

impl Default for ChangeOptions {
    fn default() -> Self {
        Self {
            lookback_hours: DEFAULT_LOOKBACK_HOURS,
            lookahead: DEFAULT_LOOKAHEAD,
        }
    }
}

impl ChangeOptions {
    /// The `--since` argument git understands for the lookback window.
    pub fn since_arg(&self) -> String {
        format!("{} hours ago", self.lookback_hours)
    }
}

fn default_lookback_hours() -> u32 {
    DEFAULT_LOOKBACK_HOURS
}

fn default_lookahead() -> usize {
    DEFAULT_LOOKAHEAD
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_options_defaults() {
        let opts = ScanOptions::default();
        assert_eq!(opts.include, vec!["**/*".to_string()]);
        assert!(opts.exclude.iter().any(|p| p.contains("node_modules")));
        assert_eq!(opts.context_width, 50);
    }

    #[test]
    fn scan_options_missing_fields_use_defaults() {
        let opts: ScanOptions = serde_json::from_str(r#"{"context_width": 10}"#).unwrap();
        assert_eq!(opts.context_width, 10);
        assert_eq!(opts.include, ScanOptions::default().include);
        assert_eq!(opts.exclude, ScanOptions::default().exclude);
    }

    #[test]
    fn change_options_defaults() {
        let opts = ChangeOptions::default();
        assert_eq!(opts.lookback_hours, 24);
        assert_eq!(opts.lookahead, 4);
        assert_eq!(opts.since_arg(), "24 hours ago");
    }

    #[test]
    fn change_options_partial_json() {
        let opts: ChangeOptions = serde_json::from_str(r#"{"lookahead": 8}"#).unwrap();
        assert_eq!(opts.lookahead, 8);
        assert_eq!(opts.lookback_hours, 24);
    }
}
