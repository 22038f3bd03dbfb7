//! # dtok-types
//!
//! **Tier 0 (Core Types)**
//!
//! This crate defines the core data structures and contracts for `dtok`.
//! It contains only data types, Serde definitions, and `SCHEMA_VERSION`.
//!
//! ## Stability Policy
//!
//! **JSON-first stability**: the primary contract is the JSON report, not Rust
//! struct literals. New fields get sensible defaults; removed or renamed
//! fields bump `SCHEMA_VERSION`.
//!
//! ## What belongs here
//! * Pure data structs (formats, occurrences, scan results, commit changes)
//! * Serialization/Deserialization logic
//! * Stability markers (SCHEMA_VERSION)
//!
//! ## What does NOT belong here
//! * File I/O
//! * CLI argument parsing
//! * Matching, aggregation or categorization logic

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// The current schema version for report artifacts.
pub const SCHEMA_VERSION: u32 = 1;

// -----------------------------------------------------------------------------
// Configuration records
// -----------------------------------------------------------------------------

/// A named token syntax: a regex plus the file extensions it applies to.
///
/// When `pattern` has a capture group, group 1 is the token name; otherwise
/// the whole match is.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenFormat {
    pub name: String,
    pub pattern: String,
    /// Lowercase extensions without the leading dot.
    pub file_extensions: BTreeSet<String>,
    #[serde(default)]
    pub description: String,
}

/// One repository to scan. `location` is either a local path or a clone URL.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RepositoryConfig {
    pub location: String,
    pub name: String,
    #[serde(default = "default_branch")]
    pub branch: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub repo_type: Option<String>,
}

fn default_branch() -> String {
    "main".to_string()
}

impl RepositoryConfig {
    /// A repository rooted at a local directory, named after its last path component.
    pub fn local(path: &str) -> Self {
        let name = std::path::Path::new(path)
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .filter(|n| !n.is_empty() && n != ".")
            .unwrap_or_else(|| path.to_string());
        Self {
            location: path.to_string(),
            name,
            branch: default_branch(),
            team: None,
            repo_type: None,
        }
    }
}

// -----------------------------------------------------------------------------
// Scan results
// -----------------------------------------------------------------------------

/// One concrete location where a token format matched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenOccurrence {
    pub file_path: String,
    /// 1-based.
    pub line: usize,
    /// 1-based, counted in characters.
    pub column: usize,
    pub context_snippet: String,
    pub matched_text: String,
    pub format_name: String,
}

/// Usage of one (token name, token type) pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenUsageResult {
    pub token_name: String,
    /// Name of the format that produced the matches.
    pub token_type: String,
    pub occurrences: Vec<TokenOccurrence>,
    pub total_count: usize,
    pub files: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<TokenCategory>,
}

impl TokenUsageResult {
    pub fn new(token_name: impl Into<String>, token_type: impl Into<String>) -> Self {
        Self {
            token_name: token_name.into(),
            token_type: token_type.into(),
            occurrences: Vec::new(),
            total_count: 0,
            files: BTreeSet::new(),
            category: None,
        }
    }

    /// Record one occurrence, keeping `total_count` and `files` in step.
    pub fn record(&mut self, occurrence: TokenOccurrence) {
        self.files.insert(occurrence.file_path.clone());
        self.occurrences.push(occurrence);
        self.total_count += 1;
    }
}

/// Static complexity of a structural UI signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternComplexity {
    Simple,
    Moderate,
    Complex,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PatternUsageResult {
    pub pattern_name: String,
    pub usage_count: usize,
    pub locations: BTreeSet<String>,
    pub complexity: PatternComplexity,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TierCounts {
    pub raw: usize,
    pub foundation: usize,
    pub component: usize,
    pub uncategorized: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScanSummary {
    pub files_scanned: usize,
    pub files_with_tokens: usize,
    pub unique_tokens: usize,
    pub tokens_by_tier: TierCounts,
    /// Highest-usage token names, most used first.
    pub top_tokens: Vec<String>,
}

/// Result of scanning one repository. Immutable once produced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScanResult {
    pub repository: RepositoryConfig,
    /// RFC 3339 timestamp.
    pub scan_date: String,
    pub tokens_found: Vec<TokenUsageResult>,
    pub total_usage: usize,
    pub coverage_percent: f64,
    pub patterns: Vec<PatternUsageResult>,
    pub errors: Vec<String>,
    pub summary: ScanSummary,
}

impl ScanResult {
    /// A result for a repository whose scan could not start.
    pub fn failed(repository: RepositoryConfig, scan_date: String, error: String) -> Self {
        Self {
            repository,
            scan_date,
            tokens_found: Vec::new(),
            total_usage: 0,
            coverage_percent: 0.0,
            patterns: Vec::new(),
            errors: vec![error],
            summary: ScanSummary::default(),
        }
    }
}

// -----------------------------------------------------------------------------
// Categorization
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenTier {
    /// Base values: palette colors, scale steps, weights.
    Raw,
    /// Design-system level semantic tokens.
    Foundation,
    /// UI-specific tokens.
    Component,
}

impl TokenTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenTier::Raw => "raw",
            TokenTier::Foundation => "foundation",
            TokenTier::Component => "component",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategorySource {
    Dictionary,
    Heuristic,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenCategory {
    pub tier: TokenTier,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    pub purpose: String,
    pub source: CategorySource,
}

/// Reference entry of the token dictionary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenDefinition {
    pub name: String,
    pub tier: TokenTier,
    #[serde(rename = "type")]
    pub token_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
}

// -----------------------------------------------------------------------------
// Git changes
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Added,
    Modified,
    Deleted,
}

/// What a single [`TokenChange`] represents, derived from which values are present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenChangeKind {
    Added,
    Modified,
    Removed,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenChange {
    pub token_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_value: Option<String>,
    pub line_number: usize,
}

impl TokenChange {
    pub fn kind(&self) -> TokenChangeKind {
        match (&self.old_value, &self.new_value) {
            (Some(_), Some(_)) => TokenChangeKind::Modified,
            (Some(_), None) => TokenChangeKind::Removed,
            _ => TokenChangeKind::Added,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GitChange {
    pub kind: ChangeKind,
    pub file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_changes: Option<Vec<TokenChange>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommitInfo {
    pub hash: String,
    pub author: String,
    /// Author date, ISO 8601 as printed by git.
    pub date: String,
    pub message: String,
    pub changes: Vec<GitChange>,
}

// -----------------------------------------------------------------------------
// Reports
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ToolInfo {
    pub name: String,
    pub version: String,
}

impl ToolInfo {
    pub fn current() -> Self {
        Self {
            name: "dtok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ReportTotals {
    pub repositories: usize,
    pub failed_repositories: usize,
    pub unique_tokens: usize,
    pub total_usage: usize,
    pub errors: usize,
}

/// Usage of one token name summed across repositories.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenTotal {
    pub token_name: String,
    pub total_count: usize,
    pub repositories: BTreeSet<String>,
}

/// Multi-repository report written as the scan artifact.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScanReport {
    pub schema_version: u32,
    pub generated_at: String,
    pub tool: ToolInfo,
    pub repositories: Vec<ScanResult>,
    pub totals: ReportTotals,
    pub top_tokens: Vec<TokenTotal>,
}

// -----------------------------------------------------------------------------
// Enums shared with CLI
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Markdown (great for pasting into PRs and chat).
    #[default]
    Md,
    /// JSON (pretty-printed).
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn occurrence(file: &str, line: usize) -> TokenOccurrence {
        TokenOccurrence {
            file_path: file.to_string(),
            line,
            column: 1,
            context_snippet: String::new(),
            matched_text: "$x".to_string(),
            format_name: "scss-variable".to_string(),
        }
    }

    #[test]
    fn record_keeps_counts_and_files_in_step() {
        let mut usage = TokenUsageResult::new("x", "scss-variable");
        usage.record(occurrence("a.scss", 1));
        usage.record(occurrence("a.scss", 2));
        usage.record(occurrence("b.scss", 1));
        assert_eq!(usage.total_count, 3);
        assert_eq!(usage.occurrences.len(), 3);
        assert_eq!(usage.files.len(), 2);
    }

    #[test]
    fn token_change_kind_follows_present_values() {
        let mut change = TokenChange {
            token_name: "$a".to_string(),
            old_value: Some("1".to_string()),
            new_value: Some("2".to_string()),
            line_number: 3,
        };
        assert_eq!(change.kind(), TokenChangeKind::Modified);
        change.new_value = None;
        assert_eq!(change.kind(), TokenChangeKind::Removed);
        change.old_value = None;
        change.new_value = Some("2".to_string());
        assert_eq!(change.kind(), TokenChangeKind::Added);
    }

    #[test]
    fn repository_type_serializes_as_type() {
        let repo = RepositoryConfig {
            location: "https://example.com/ui.git".to_string(),
            name: "ui".to_string(),
            branch: "main".to_string(),
            team: Some("web".to_string()),
            repo_type: Some("library".to_string()),
        };
        let json = serde_json::to_value(&repo).unwrap();
        assert_eq!(json["type"], "library");
        assert!(json.get("repo_type").is_none());
    }

    #[test]
    fn repository_branch_defaults_to_main() {
        let repo: RepositoryConfig =
            serde_json::from_str(r#"{"location": ".", "name": "here"}"#).unwrap();
        assert_eq!(repo.branch, "main");
        assert!(repo.team.is_none());
    }

    #[test]
    fn local_repository_is_named_after_directory() {
        assert_eq!(RepositoryConfig::local("/work/design-system").name, "design-system");
        assert_eq!(RepositoryConfig::local(".").name, ".");
    }

    #[test]
    fn failed_result_records_error_and_nothing_else() {
        let result = ScanResult::failed(
            RepositoryConfig::local("/missing"),
            "2026-01-01T00:00:00Z".to_string(),
            "Repository root not found".to_string(),
        );
        assert!(result.tokens_found.is_empty());
        assert!(result.patterns.is_empty());
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.coverage_percent, 0.0);
    }

    #[test]
    fn tool_info_current() {
        let ti = ToolInfo::current();
        assert_eq!(ti.name, "dtok");
        assert!(!ti.version.is_empty());
    }

    #[test]
    fn tier_serde_roundtrip() {
        for tier in [TokenTier::Raw, TokenTier::Foundation, TokenTier::Component] {
            let json = serde_json::to_string(&tier).unwrap();
            assert_eq!(json, format!("\"{}\"", tier.as_str()));
            let back: TokenTier = serde_json::from_str(&json).unwrap();
            assert_eq!(back, tier);
        }
    }
}
