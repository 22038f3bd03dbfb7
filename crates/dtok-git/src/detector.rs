//! Incremental change detection over one repository's history.

use std::path::{Path, PathBuf};

use dtok_settings::ChangeOptions;
use dtok_types::{ChangeKind, CommitInfo, GitChange};

use crate::{
    LogRange, PointerStore, diff_tree_name_status, is_token_file, log_commits,
    parse_token_changes, rev_parse_head, show_file_diff,
};

/// Where the detector stands before a pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointerState {
    NoPriorPointer,
    HasPointer(String),
}

/// Walks commits added since the last pass and extracts token changes.
///
/// The pointer is read from the store once, at construction. After a pass
/// that found at least one commit it moves to the HEAD seen by that pass.
/// Public operations never fail; git errors are logged and produce empty
/// results.
#[derive(Debug)]
pub struct ChangeDetector<S: PointerStore> {
    repo: PathBuf,
    store: S,
    state: PointerState,
    options: ChangeOptions,
}

impl<S: PointerStore> ChangeDetector<S> {
    pub fn new(repo: impl Into<PathBuf>, store: S, options: ChangeOptions) -> Self {
        let repo = repo.into();
        let state = match store.load() {
            Ok(Some(hash)) => PointerState::HasPointer(hash),
            Ok(None) => PointerState::NoPriorPointer,
            Err(err) => {
                let message = format!("{err:#}");
                tracing::warn!(repo = %repo.display(), error = %message, "could not read commit pointer");
                PointerState::NoPriorPointer
            }
        };
        Self {
            repo,
            store,
            state,
            options,
        }
    }

    pub fn repo(&self) -> &Path {
        &self.repo
    }

    pub fn state(&self) -> &PointerState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Commits since the last pass, newest first, each with its token-file changes.
    pub fn changes_since_last_scan(&mut self) -> Vec<CommitInfo> {
        let head = match rev_parse_head(&self.repo) {
            Ok(head) => head,
            Err(err) => {
                tracing::warn!(repo = %self.repo.display(), error = %err, "could not resolve HEAD");
                return Vec::new();
            }
        };

        let range = match &self.state {
            PointerState::HasPointer(pointer) if *pointer == head => {
                tracing::debug!(repo = %self.repo.display(), head = %head, "no new commits");
                return Vec::new();
            }
            PointerState::HasPointer(pointer) => LogRange::After(pointer.clone()),
            PointerState::NoPriorPointer => LogRange::Since(self.options.since_arg()),
        };

        let mut commits = match log_commits(&self.repo, &range) {
            Ok(commits) => commits,
            Err(err) => {
                tracing::warn!(repo = %self.repo.display(), error = %err, "could not list commits");
                return Vec::new();
            }
        };
        tracing::debug!(repo = %self.repo.display(), commits = commits.len(), "walking commits");

        for commit in &mut commits {
            commit.changes = self.token_file_changes(&commit.hash);
        }

        if !commits.is_empty() {
            self.advance(head);
        }
        commits
    }

    fn advance(&mut self, head: String) {
        if let Err(err) = self.store.save(&head) {
            let message = format!("{err:#}");
            tracing::warn!(repo = %self.repo.display(), error = %message, "could not save commit pointer");
        }
        self.state = PointerState::HasPointer(head);
    }

    fn token_file_changes(&self, hash: &str) -> Vec<GitChange> {
        let files = match diff_tree_name_status(&self.repo, hash) {
            Ok(files) => files,
            Err(err) => {
                tracing::warn!(commit = %hash, error = %err, "could not list changed files");
                return Vec::new();
            }
        };

        files
            .into_iter()
            .filter(|(_, file)| is_token_file(file))
            .map(|(kind, file)| {
                if kind != ChangeKind::Modified {
                    return GitChange {
                        kind,
                        file,
                        diff: None,
                        token_changes: None,
                    };
                }
                match show_file_diff(&self.repo, hash, &file) {
                    Ok(diff) => {
                        let token_changes = parse_token_changes(&diff, self.options.lookahead);
                        GitChange {
                            kind,
                            file,
                            diff: Some(diff),
                            token_changes: Some(token_changes),
                        }
                    }
                    Err(err) => {
                        tracing::warn!(commit = %hash, file = %file, error = %err, "could not read file diff");
                        GitChange {
                            kind,
                            file,
                            diff: None,
                            token_changes: None,
                        }
                    }
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryPointerStore;

    #[test]
    fn stored_pointer_is_read_at_construction() {
        let detector = ChangeDetector::new("/nowhere", MemoryPointerStore::with_hash("abc"), ChangeOptions::default());
        assert_eq!(detector.state(), &PointerState::HasPointer("abc".to_string()));
    }

    #[test]
    fn unreachable_repository_yields_nothing_and_keeps_state() {
        let dir = tempfile::tempdir().unwrap();
        let mut detector = ChangeDetector::new(
            dir.path().join("missing"),
            MemoryPointerStore::new(),
            ChangeOptions::default(),
        );
        assert!(detector.changes_since_last_scan().is_empty());
        assert_eq!(detector.state(), &PointerState::NoPriorPointer);
        assert_eq!(detector.store().saves(), 0);
    }
}
