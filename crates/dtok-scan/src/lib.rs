//! # dtok-scan
//!
//! **Tier 2 (Orchestration)**
//!
//! Scans one repository: discovers files, matches every registered token
//! format, aggregates usage, detects structural UI patterns and attaches a
//! category to each token.
//!
//! ## What belongs here
//! * Usage aggregation and its deterministic ordering
//! * Structural signature detection
//! * Per-repository summaries and coverage
//!
//! ## What does NOT belong here
//! * Cloning or checking out repositories (use dtok-git)
//! * Multi-repository reports (use dtok-format)
//! * CLI parsing

mod aggregate;
mod structural;

use std::path::Path;

use anyhow::{Context, Result};
use dtok_categorize::Categorizer;
use dtok_path::relative_display;
use dtok_patterns::PatternRegistry;
use dtok_settings::ScanOptions;
use dtok_types::{RepositoryConfig, ScanResult, ScanSummary, TierCounts, TokenTier, TokenUsageResult};
use dtok_walk::discover_files;

pub use aggregate::{aggregate, usage_from_matches};
pub use structural::{StructuralDetector, StructuralSignature, builtin_signatures};

/// Denominator of the coverage percentage.
///
/// A fixed stand-in for the size of a real token catalog; coverage exceeds
/// 100 once a repository uses more unique tokens than this.
pub const TOKEN_CATALOG_SIZE: usize = 100;

/// How many token names the per-repository summary lists.
pub const SUMMARY_TOP_TOKENS: usize = 10;

/// Unique tokens as a percentage of [`TOKEN_CATALOG_SIZE`], rounded to two decimals.
pub fn coverage_percent(unique_tokens: usize) -> f64 {
    if unique_tokens == 0 {
        return 0.0;
    }
    let pct = unique_tokens as f64 / TOKEN_CATALOG_SIZE as f64 * 100.0;
    (pct * 100.0).round() / 100.0
}

/// RFC 3339 timestamp for the current instant.
pub fn now_rfc3339() -> String {
    time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "1970-01-01T00:00:00Z".to_string())
}

fn read_source(path: &Path, rel: &str) -> Result<String> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read {rel}"))?;
    String::from_utf8(bytes).with_context(|| format!("{rel} is not valid UTF-8"))
}

/// Scan the checkout at `root` for token usage.
///
/// Never fails: a root that cannot be walked yields a result with empty
/// token and pattern lists and the error recorded, and unreadable files are
/// listed in `errors` while the scan carries on. File paths in the result
/// are relative to `root`.
pub fn scan_repository(
    root: &Path,
    repository: RepositoryConfig,
    registry: &PatternRegistry,
    categorizer: &Categorizer,
    options: &ScanOptions,
) -> ScanResult {
    let scan_date = now_rfc3339();
    let files = match discover_files(root, &options.include, &options.exclude, &registry.extensions()) {
        Ok(files) => files,
        Err(err) => {
            let message = format!("{err:#}");
            tracing::warn!(repository = %repository.name, error = %message, "file discovery failed");
            return ScanResult::failed(repository, scan_date, message);
        }
    };
    let root = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());
    tracing::debug!(repository = %repository.name, files = files.len(), "scanning repository");

    let mut errors = Vec::new();
    let mut partials: Vec<TokenUsageResult> = Vec::new();
    let mut structural = StructuralDetector::new();
    let mut files_with_tokens = 0usize;

    for path in &files {
        let rel = relative_display(&root, path);
        let content = match read_source(path, &rel) {
            Ok(content) => content,
            Err(err) => {
                let message = format!("{err:#}");
                tracing::warn!(file = %rel, error = %message, "skipping unreadable file");
                errors.push(message);
                continue;
            }
        };

        let matches = registry.scan_content(&content, &rel, options.context_width);
        if !matches.is_empty() {
            files_with_tokens += 1;
        }
        partials.extend(usage_from_matches(matches));
        structural.observe(&rel, &content);
    }

    let mut tokens = aggregate(partials);
    for token in &mut tokens {
        let hint = token.files.iter().next().map(String::as_str);
        token.category = Some(categorizer.categorize(&token.token_name, hint));
    }

    let total_usage = tokens.iter().map(|t| t.total_count).sum();
    let summary = summarize(&tokens, files.len(), files_with_tokens);

    ScanResult {
        repository,
        scan_date,
        coverage_percent: coverage_percent(summary.unique_tokens),
        tokens_found: tokens,
        total_usage,
        patterns: structural.finish(),
        errors,
        summary,
    }
}

/// Counts and top tokens for an aggregated, sorted token list.
pub fn summarize(tokens: &[TokenUsageResult], files_scanned: usize, files_with_tokens: usize) -> ScanSummary {
    let mut tiers = TierCounts::default();
    for token in tokens {
        match token.category.as_ref().map(|c| c.tier) {
            Some(TokenTier::Raw) => tiers.raw += 1,
            Some(TokenTier::Foundation) => tiers.foundation += 1,
            Some(TokenTier::Component) => tiers.component += 1,
            None => tiers.uncategorized += 1,
        }
    }

    let mut top_tokens: Vec<String> = Vec::new();
    for token in tokens {
        if top_tokens.len() == SUMMARY_TOP_TOKENS {
            break;
        }
        if !top_tokens.contains(&token.token_name) {
            top_tokens.push(token.token_name.clone());
        }
    }

    ScanSummary {
        files_scanned,
        files_with_tokens,
        unique_tokens: tokens.len(),
        tokens_by_tier: tiers,
        top_tokens,
    }
}
