//! Markdown renderers.

use std::fmt::Write as _;

use dtok_types::{ChangeKind, CommitInfo, ScanReport, ScanResult, TokenChange};

/// Tokens listed per repository section.
const SECTION_TOKENS: usize = 15;

fn cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

fn short_hash(hash: &str) -> &str {
    hash.get(..8).unwrap_or(hash)
}

fn kind_label(kind: ChangeKind) -> &'static str {
    match kind {
        ChangeKind::Added => "added",
        ChangeKind::Modified => "modified",
        ChangeKind::Deleted => "deleted",
    }
}

pub fn render_report_md(report: &ScanReport) -> String {
    let mut s = String::new();
    let _ = writeln!(s, "# Design token report\n");
    let _ = writeln!(
        s,
        "Generated {} by {} {}\n",
        report.generated_at, report.tool.name, report.tool.version
    );

    s.push_str("|Repository|Files|Unique|Usage|Coverage|Errors|\n");
    s.push_str("|---|---:|---:|---:|---:|---:|\n");
    for r in &report.repositories {
        let _ = writeln!(
            s,
            "|{}|{}|{}|{}|{:.1}%|{}|",
            cell(&r.repository.name),
            r.summary.files_scanned,
            r.summary.unique_tokens,
            r.total_usage,
            r.coverage_percent,
            r.errors.len()
        );
    }
    let _ = writeln!(
        s,
        "|**Total**|{}|{}|{}||{}|",
        report.repositories.iter().map(|r| r.summary.files_scanned).sum::<usize>(),
        report.totals.unique_tokens,
        report.totals.total_usage,
        report.totals.errors
    );

    if !report.top_tokens.is_empty() {
        s.push_str("\n## Top tokens\n\n");
        s.push_str("|Token|Uses|Repositories|\n");
        s.push_str("|---|---:|---|\n");
        for t in &report.top_tokens {
            let repos: Vec<&str> = t.repositories.iter().map(String::as_str).collect();
            let _ = writeln!(s, "|`{}`|{}|{}|", cell(&t.token_name), t.total_count, cell(&repos.join(", ")));
        }
    }

    for r in &report.repositories {
        render_repository(&mut s, r);
    }
    s
}

fn render_repository(s: &mut String, r: &ScanResult) {
    let _ = writeln!(s, "\n## {}\n", r.repository.name);

    if r.tokens_found.is_empty() && r.patterns.is_empty() {
        s.push_str("No tokens found.\n");
    }

    if !r.tokens_found.is_empty() {
        let tiers = &r.summary.tokens_by_tier;
        let _ = writeln!(
            s,
            "Tiers: {} raw, {} foundation, {} component, {} uncategorized\n",
            tiers.raw, tiers.foundation, tiers.component, tiers.uncategorized
        );
        s.push_str("|Token|Format|Tier|Category|Uses|Files|\n");
        s.push_str("|---|---|---|---|---:|---:|\n");
        for t in r.tokens_found.iter().take(SECTION_TOKENS) {
            let (tier, category) = t
                .category
                .as_ref()
                .map(|c| (c.tier.as_str(), c.category.as_str()))
                .unwrap_or(("-", "-"));
            let _ = writeln!(
                s,
                "|`{}`|{}|{}|{}|{}|{}|",
                cell(&t.token_name),
                t.token_type,
                tier,
                cell(category),
                t.total_count,
                t.files.len()
            );
        }
        if r.tokens_found.len() > SECTION_TOKENS {
            let _ = writeln!(s, "\n_{} more tokens in the JSON report._", r.tokens_found.len() - SECTION_TOKENS);
        }
    }

    if !r.patterns.is_empty() {
        s.push_str("\n|Pattern|Uses|Files|Complexity|\n");
        s.push_str("|---|---:|---:|---|\n");
        for p in &r.patterns {
            let _ = writeln!(
                s,
                "|{}|{}|{}|{:?}|",
                p.pattern_name,
                p.usage_count,
                p.locations.len(),
                p.complexity
            );
        }
    }

    if !r.errors.is_empty() {
        s.push_str("\n**Errors**\n\n");
        for e in &r.errors {
            let _ = writeln!(s, "- {}", e.replace('\n', " "));
        }
    }
}

pub fn render_changes_md(repository: &str, commits: &[CommitInfo]) -> String {
    let mut s = String::new();
    let _ = writeln!(s, "# Token changes: {repository}\n");
    if commits.is_empty() {
        s.push_str("No new commits.\n");
        return s;
    }

    for c in commits {
        let subject = c.message.lines().next().unwrap_or_default();
        let _ = writeln!(s, "## `{}` {}\n", short_hash(&c.hash), subject);
        let _ = writeln!(s, "{} on {}\n", c.author, c.date);
        if c.changes.is_empty() {
            s.push_str("No token files changed.\n\n");
            continue;
        }
        for change in &c.changes {
            let _ = writeln!(s, "- `{}` ({})", change.file, kind_label(change.kind));
        }
        for change in &c.changes {
            if let Some(tokens) = change.token_changes.as_deref()
                && !tokens.is_empty()
            {
                let _ = writeln!(s, "\n`{}`\n", change.file);
                render_token_changes(&mut s, tokens);
            }
        }
        s.push('\n');
    }
    s
}

fn render_token_changes(s: &mut String, tokens: &[TokenChange]) {
    s.push_str("|Token|Change|Old|New|Line|\n");
    s.push_str("|---|---|---|---|---:|\n");
    for t in tokens {
        let kind = match t.kind() {
            dtok_types::TokenChangeKind::Added => "added",
            dtok_types::TokenChangeKind::Modified => "modified",
            dtok_types::TokenChangeKind::Removed => "removed",
        };
        let _ = writeln!(
            s,
            "|`{}`|{}|{}|{}|{}|",
            cell(&t.token_name),
            kind,
            cell(t.old_value.as_deref().unwrap_or("")),
            cell(t.new_value.as_deref().unwrap_or("")),
            t.line_number
        );
    }
}
