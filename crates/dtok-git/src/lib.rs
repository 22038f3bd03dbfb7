//! # dtok-git
//!
//! **Tier 2 (Utilities)**
//!
//! Git plumbing for design-token change detection. Walks the commits since
//! the last processed one, keeps the token files they touch and extracts
//! token-level changes from their diffs.
//!
//! ## What belongs here
//! * Git subprocess invocation (rev-parse, log, diff-tree, show, clone)
//! * Token-file filtering and unified-diff parsing
//! * The last-processed-commit pointer and its stores
//!
//! ## What does NOT belong here
//! * Scanning file content for usage (use dtok-scan)
//! * Report rendering (use dtok-format)
//! * Git history modification

mod checkout;
mod detector;
mod diff;
mod error;
mod pointer;

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::LazyLock;

use dtok_types::{ChangeKind, CommitInfo};
use regex::Regex;

pub use checkout::{is_remote_location, prepare_repository};
pub use detector::{ChangeDetector, PointerState};
pub use diff::{ExtractedToken, extract_token, parse_token_changes};
pub use error::GitError;
pub use pointer::{FilePointerStore, MemoryPointerStore, PointerStore};

/// Create a `Command` for git with process-environment isolation.
///
/// Strips `GIT_DIR` and `GIT_WORK_TREE` so that inherited environment
/// variables cannot override the explicit `-C` path used by all
/// functions in this crate.
fn git_cmd() -> Command {
    let mut cmd = Command::new("git");
    cmd.env_remove("GIT_DIR").env_remove("GIT_WORK_TREE");
    cmd
}

pub fn git_available() -> bool {
    git_cmd()
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

pub fn repo_root(path: &Path) -> Option<PathBuf> {
    let output = git_cmd()
        .arg("-C")
        .arg(path)
        .args(["rev-parse", "--show-toplevel"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let root = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if root.is_empty() {
        None
    } else {
        Some(PathBuf::from(root))
    }
}

/// Run `git -C repo <args>` and return its stdout.
fn run_git(repo: &Path, args: &[&str]) -> Result<String, GitError> {
    let command = args.first().copied().unwrap_or_default().to_string();
    let output = git_cmd()
        .arg("-C")
        .arg(repo)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .map_err(|source| GitError::Spawn {
            command: command.clone(),
            source,
        })?;
    if !output.status.success() {
        return Err(GitError::CommandFailed {
            command,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Hash of the commit `HEAD` points at.
pub fn rev_parse_head(repo: &Path) -> Result<String, GitError> {
    let out = run_git(repo, &["rev-parse", "--verify", "HEAD"])?;
    let hash = out.trim();
    if hash.is_empty() {
        return Err(GitError::EmptyOutput {
            command: "rev-parse".to_string(),
        });
    }
    Ok(hash.to_string())
}

/// Which commits a log walk covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogRange {
    /// Commits reachable from HEAD newer than a git date expression, e.g. `24 hours ago`.
    Since(String),
    /// Commits in `(base, HEAD]`.
    After(String),
}

const LOG_FORMAT: &str = "--format=%H%x1f%an%x1f%aI%x1f%B%x1e";

/// Commits in `range`, newest first, with empty change lists.
pub fn log_commits(repo: &Path, range: &LogRange) -> Result<Vec<CommitInfo>, GitError> {
    let out = match range {
        LogRange::Since(since) => {
            let since = format!("--since={since}");
            run_git(repo, &["log", LOG_FORMAT, &since, "HEAD"])?
        }
        LogRange::After(base) => {
            let range = format!("{base}..HEAD");
            run_git(repo, &["log", LOG_FORMAT, &range])?
        }
    };
    Ok(parse_log(&out))
}

/// Parse `log` output written with the unit/record separator format.
pub fn parse_log(out: &str) -> Vec<CommitInfo> {
    out.split('\x1e')
        .filter_map(|record| {
            let record = record.trim_start_matches(['\n', '\r']);
            if record.trim().is_empty() {
                return None;
            }
            let mut fields = record.splitn(4, '\x1f');
            let hash = fields.next()?.trim().to_string();
            if hash.is_empty() {
                return None;
            }
            Some(CommitInfo {
                hash,
                author: fields.next().unwrap_or_default().to_string(),
                date: fields.next().unwrap_or_default().to_string(),
                message: fields.next().unwrap_or_default().trim().to_string(),
                changes: Vec::new(),
            })
        })
        .collect()
}

/// Map a name-status code to a change kind. Renames and copies count as modified.
pub fn change_kind(status: &str) -> ChangeKind {
    match status.chars().next() {
        Some('A') => ChangeKind::Added,
        Some('D') => ChangeKind::Deleted,
        _ => ChangeKind::Modified,
    }
}

/// Files touched by one commit, with their change kind.
pub fn diff_tree_name_status(repo: &Path, hash: &str) -> Result<Vec<(ChangeKind, String)>, GitError> {
    let out = run_git(
        repo,
        &["diff-tree", "--no-commit-id", "--name-status", "-r", "--root", hash],
    )?;
    Ok(parse_name_status(&out))
}

/// Parse `--name-status` lines. For renames and copies the destination path is kept.
pub fn parse_name_status(out: &str) -> Vec<(ChangeKind, String)> {
    out.lines()
        .filter_map(|line| {
            let mut fields = line.split('\t');
            let status = fields.next()?.trim();
            let path = fields.last()?.trim();
            if status.is_empty() || path.is_empty() {
                return None;
            }
            Some((change_kind(status), path.to_string()))
        })
        .collect()
}

/// Unified diff of one file as changed by one commit.
pub fn show_file_diff(repo: &Path, hash: &str, file: &str) -> Result<String, GitError> {
    run_git(repo, &["show", "--format=", hash, "--", file])
}

static TOKEN_FILE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:^|/)[^/]*(?:tokens?|variables|vars|theme|foundations?|colou?rs?|typography|spacing|sizes?|sizing)[^/]*\.(?:scss|sass|less|css|js|jsx|ts|tsx|json)$",
    )
    .expect("valid regex literal")
});

/// Whether a changed path looks like a design-token source file.
pub fn is_token_file(path: &str) -> bool {
    TOKEN_FILE.is_match(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_file_allowlist() {
        for path in [
            "src/styles/_variables.scss",
            "tokens.json",
            "design/colors.css",
            "theme/Theme.ts",
            "styles/_typography.sass",
            "src/foundation-spacing.less",
            "sizes.js",
        ] {
            assert!(is_token_file(path), "{path} should be a token file");
        }
        for path in ["src/App.tsx", "README.md", "tokens/readme.md", "variables.scss.bak", "colors/Button.tsx"] {
            assert!(!is_token_file(path), "{path} should not be a token file");
        }
    }

    #[test]
    fn name_status_keeps_destination_of_renames() {
        let out = "M\tsrc/_vars.scss\nA\ttokens.json\nD\told/colors.css\nR087\tsrc/a.scss\tsrc/_theme.scss\n\n";
        assert_eq!(
            parse_name_status(out),
            vec![
                (ChangeKind::Modified, "src/_vars.scss".to_string()),
                (ChangeKind::Added, "tokens.json".to_string()),
                (ChangeKind::Deleted, "old/colors.css".to_string()),
                (ChangeKind::Modified, "src/_theme.scss".to_string()),
            ]
        );
    }

    #[test]
    fn unknown_status_codes_are_modified() {
        assert_eq!(change_kind("T"), ChangeKind::Modified);
        assert_eq!(change_kind("C100"), ChangeKind::Modified);
        assert_eq!(change_kind(""), ChangeKind::Modified);
    }

    #[test]
    fn log_records_parse() {
        let out = "abc123\x1fAda\x1f2026-01-02T03:04:05+00:00\x1fUpdate tokens\n\nBody line\n\x1e\n\
                   def456\x1fGrace\x1f2026-01-01T00:00:00+00:00\x1fInitial\n\x1e\n";
        let commits = parse_log(out);
        assert_eq!(commits.len(), 2);
        assert_eq!(commits[0].hash, "abc123");
        assert_eq!(commits[0].author, "Ada");
        assert_eq!(commits[0].message, "Update tokens\n\nBody line");
        assert_eq!(commits[1].hash, "def456");
        assert!(commits[1].changes.is_empty());
    }

    #[test]
    fn empty_log_has_no_commits() {
        assert!(parse_log("").is_empty());
        assert!(parse_log("\n").is_empty());
    }

    #[test]
    fn missing_repository_is_an_error() {
        if !git_available() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(rev_parse_head(&missing).is_err());
    }
}
