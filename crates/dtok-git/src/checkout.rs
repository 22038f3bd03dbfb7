//! Resolving a configured repository to a local checkout.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use dtok_types::RepositoryConfig;

use crate::run_git;

const REMOTE_PREFIXES: &[&str] = &["https://", "http://", "ssh://", "git://", "file://", "git@"];

/// Whether `location` is a clone URL rather than a local path.
pub fn is_remote_location(location: &str) -> bool {
    REMOTE_PREFIXES.iter().any(|p| location.starts_with(p))
}

fn checkout_dir(workdir: &Path, name: &str) -> Result<PathBuf> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\']);
    if invalid {
        bail!("Repository name '{name}' cannot be used as a checkout directory");
    }
    Ok(workdir.join(name))
}

/// Local directory holding `config`'s sources, ready to scan.
///
/// Local locations must exist and are returned as given (canonicalized).
/// Remote locations are cloned into `workdir/<name>` on first use; later
/// calls fetch, check out the configured branch and fast-forward it.
pub fn prepare_repository(config: &RepositoryConfig, workdir: &Path) -> Result<PathBuf> {
    if !is_remote_location(&config.location) {
        let path = PathBuf::from(&config.location);
        if !path.is_dir() {
            bail!("Repository path not found: {}", path.display());
        }
        return path
            .canonicalize()
            .with_context(|| format!("Failed to resolve {}", path.display()));
    }

    let dest = checkout_dir(workdir, &config.name)?;
    let dest_str = dest.to_string_lossy().to_string();

    if dest.join(".git").exists() {
        tracing::debug!(repository = %config.name, "updating existing checkout");
        run_git(&dest, &["fetch", "origin"])
            .with_context(|| format!("Failed to fetch {}", config.location))?;
        run_git(&dest, &["checkout", &config.branch])
            .with_context(|| format!("Failed to check out branch '{}'", config.branch))?;
        run_git(&dest, &["pull", "--ff-only", "origin", &config.branch])
            .with_context(|| format!("Failed to pull branch '{}'", config.branch))?;
    } else {
        tracing::debug!(repository = %config.name, location = %config.location, "cloning");
        std::fs::create_dir_all(workdir)
            .with_context(|| format!("Failed to create {}", workdir.display()))?;
        run_git(
            workdir,
            &["clone", "--branch", &config.branch, &config.location, &dest_str],
        )
        .with_context(|| format!("Failed to clone {}", config.location))?;
    }

    Ok(dest)
}
