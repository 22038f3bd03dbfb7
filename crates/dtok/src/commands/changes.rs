use anyhow::{Result, bail};
use dtok_config as cli;
use dtok_git::{ChangeDetector, FilePointerStore, PointerState};

use crate::config::{ResolvedConfig, resolve_change_options};

pub(crate) fn handle(args: cli::ChangesArgs, resolved: &ResolvedConfig) -> Result<()> {
    if !dtok_git::git_available() {
        bail!("git is not available on PATH");
    }
    if !args.repo.is_dir() {
        bail!("Repository path not found: {}", args.repo.display());
    }
    let Some(root) = dtok_git::repo_root(&args.repo) else {
        bail!("{} is not inside a git repository", args.repo.display());
    };

    let options = resolve_change_options(&args, &resolved.toml);
    let state_file = resolved.state_file(args.state_file.as_deref(), &root);
    let store = FilePointerStore::new(state_file);

    let mut detector = ChangeDetector::new(&root, store, options);
    if let PointerState::NoPriorPointer = detector.state() {
        tracing::info!(
            lookback_hours = options.lookback_hours,
            "no recorded commit, using lookback window"
        );
    }
    let commits = detector.changes_since_last_scan();

    let name = root
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| root.display().to_string());
    let format = resolved.format(args.format);
    print!("{}", dtok_format::render_changes(&name, &commits, format)?);
    Ok(())
}
