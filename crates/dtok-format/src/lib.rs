//! # dtok-format
//!
//! **Tier 2 (Formatting)**
//!
//! Assembles per-repository scan results into one report and renders
//! reports and commit change lists as Markdown or JSON.
//!
//! ## What belongs here
//! * Cross-repository totals and top tokens
//! * The timestamped JSON report artifact
//! * Markdown and JSON renderers
//!
//! ## What does NOT belong here
//! * Scanning (use dtok-scan)
//! * Git access (use dtok-git)
//! * Printing to stdout (the CLI decides where output goes)

mod markdown;

use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dtok_types::{
    CommitInfo, OutputFormat, ReportTotals, SCHEMA_VERSION, ScanReport, ScanResult, ToolInfo,
    TokenTotal,
};
use time::OffsetDateTime;
use time::macros::format_description;

pub use markdown::{render_changes_md, render_report_md};

/// How many tokens the cross-repository ranking keeps.
pub const REPORT_TOP_TOKENS: usize = 20;

fn rfc3339(at: OffsetDateTime) -> String {
    at.to_offset(time::UtcOffset::UTC)
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "1970-01-01T00:00:00Z".to_string())
}

/// Combine repository results into one report stamped with the current time.
pub fn assemble_report(results: Vec<ScanResult>) -> ScanReport {
    assemble_report_at(results, OffsetDateTime::now_utc())
}

/// [`assemble_report`] with an explicit generation time.
pub fn assemble_report_at(results: Vec<ScanResult>, generated_at: OffsetDateTime) -> ScanReport {
    let mut per_token: BTreeMap<&str, (usize, BTreeSet<String>)> = BTreeMap::new();
    for result in &results {
        for token in &result.tokens_found {
            let entry = per_token.entry(token.token_name.as_str()).or_default();
            entry.0 += token.total_count;
            entry.1.insert(result.repository.name.clone());
        }
    }

    let totals = ReportTotals {
        repositories: results.len(),
        failed_repositories: results.iter().filter(|r| is_failed(r)).count(),
        unique_tokens: per_token.len(),
        total_usage: results.iter().map(|r| r.total_usage).sum(),
        errors: results.iter().map(|r| r.errors.len()).sum(),
    };

    let mut top_tokens: Vec<TokenTotal> = per_token
        .into_iter()
        .map(|(name, (total_count, repositories))| TokenTotal {
            token_name: name.to_string(),
            total_count,
            repositories,
        })
        .collect();
    top_tokens.sort_by(|a, b| {
        b.total_count
            .cmp(&a.total_count)
            .then_with(|| a.token_name.cmp(&b.token_name))
    });
    top_tokens.truncate(REPORT_TOP_TOKENS);

    ScanReport {
        schema_version: SCHEMA_VERSION,
        generated_at: rfc3339(generated_at),
        tool: ToolInfo::current(),
        repositories: results,
        totals,
        top_tokens,
    }
}

/// A repository whose scan never got to read files.
pub fn is_failed(result: &ScanResult) -> bool {
    !result.errors.is_empty() && result.summary.files_scanned == 0 && result.tokens_found.is_empty()
}

/// `token-report-YYYYMMDDTHHMMSSZ.json` for the given instant (UTC).
pub fn report_file_name(at: OffsetDateTime) -> String {
    let format = format_description!("[year][month][day]T[hour][minute][second]Z");
    let stamp = at
        .to_offset(time::UtcOffset::UTC)
        .format(&format)
        .unwrap_or_else(|_| "19700101T000000Z".to_string());
    format!("token-report-{stamp}.json")
}

/// `YYYYMMDDTHHMMSSZ` from a UTC RFC 3339 stamp such as `report.generated_at`.
fn compact_stamp(rfc3339: &str) -> Option<String> {
    let (date, rest) = rfc3339.split_once('T')?;
    let clock = rest.split(['.', 'Z', '+', '-']).next()?;
    let date: String = date.chars().filter(|c| *c != '-').collect();
    let clock: String = clock.chars().filter(|c| *c != ':').collect();
    let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if date.len() != 8 || clock.len() != 6 || !all_digits(&date) || !all_digits(&clock) {
        return None;
    }
    Some(format!("{date}T{clock}Z"))
}

/// Report file name stamped with the report's own `generated_at`.
pub fn report_file_name_for(report: &ScanReport) -> String {
    match compact_stamp(&report.generated_at) {
        Some(stamp) => format!("token-report-{stamp}.json"),
        None => report_file_name(OffsetDateTime::now_utc()),
    }
}

/// Write `report` as pretty JSON into `dir` under a name stamped with
/// `report.generated_at`.
///
/// Creates `dir` when missing and returns the written path.
pub fn write_report_json(dir: &Path, report: &ScanReport) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    let path = dir.join(report_file_name_for(report));
    write_report_json_to(&path, report)?;
    Ok(path)
}

/// Write `report` as pretty JSON to exactly `path`.
pub fn write_report_json_to(path: &Path, report: &ScanReport) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut out = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut out, report)?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}

pub fn render_report(report: &ScanReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Md => Ok(render_report_md(report)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)? + "\n"),
    }
}

pub fn render_changes(repository: &str, commits: &[CommitInfo], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Md => Ok(render_changes_md(repository, commits)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(commits)? + "\n"),
    }
}
