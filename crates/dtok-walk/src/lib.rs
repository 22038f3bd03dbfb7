//! # dtok-walk
//!
//! **Tier 2 (Utilities)**
//!
//! File discovery for repository scans: resolves include/exclude globs into
//! the deduplicated set of files worth reading.
//!
//! ## What belongs here
//! * Filesystem traversal of a repository root
//! * Include/exclude glob resolution
//! * Exclude-pattern normalization and dedupe
//! * Extension filtering
//!
//! ## What does NOT belong here
//! * Content matching (use dtok-patterns)
//! * Git history (use dtok-git)
//! * File modification

mod exclude;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use dtok_path::{extension_lower, relative_display};
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;

pub use exclude::{add_exclude_pattern, has_exclude_pattern, normalize_exclude_pattern, normalize_exclude_patterns};

fn build_glob_set(patterns: &[String], kind: &str) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).with_context(|| format!("Invalid {kind} pattern '{pattern}'"))?;
        builder.add(glob);
    }
    builder
        .build()
        .with_context(|| format!("Failed to compile {kind} patterns"))
}

/// Resolve `include`/`exclude` globs under `root` into the files to scan.
///
/// Globs are matched against root-relative paths with `/` separators. Every
/// include match is kept unless any exclude glob matches it, and only files
/// whose lowercase extension is in `extensions` survive. The result holds
/// absolute paths, sorted and deduplicated.
///
/// Fails when `root` does not exist or is not a directory, or when a glob
/// does not parse.
pub fn discover_files(
    root: &Path,
    include: &[String],
    exclude: &[String],
    extensions: &BTreeSet<String>,
) -> Result<Vec<PathBuf>> {
    if !root.exists() {
        bail!("Repository root not found: {}", root.display());
    }
    if !root.is_dir() {
        bail!("Repository root is not a directory: {}", root.display());
    }
    let root = root
        .canonicalize()
        .with_context(|| format!("Failed to resolve repository root {}", root.display()))?;

    let include_set = build_glob_set(include, "include")?;
    let exclude_set = build_glob_set(&normalize_exclude_patterns(&root, exclude), "exclude")?;

    let mut files: BTreeSet<PathBuf> = BTreeSet::new();
    let mut builder = WalkBuilder::new(&root);
    builder.standard_filters(false);
    builder.follow_links(false);
    builder.filter_entry(|entry| entry.file_name() != ".git");

    for entry in builder.build() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!(error = %err, "skipping unreadable entry during discovery");
                continue;
            }
        };
        if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            continue;
        }
        let path = entry.path();
        let keep_ext = extension_lower(path)
            .map(|ext| extensions.contains(&ext))
            .unwrap_or(false);
        if !keep_ext {
            continue;
        }
        let rel = relative_display(&root, path);
        if include_set.is_match(&rel) && !exclude_set.is_match(&rel) {
            files.insert(path.to_path_buf());
        }
    }

    tracing::debug!(root = %root.display(), files = files.len(), "discovered files");
    Ok(files.into_iter().collect())
}
