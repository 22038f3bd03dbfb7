use std::path::Path;

use anyhow::Result;
use dtok_categorize::Categorizer;
use dtok_config as cli;
use dtok_patterns::PatternRegistry;
use dtok_settings::ScanOptions;
use dtok_types::{RepositoryConfig, ScanResult};

use crate::config::{ResolvedConfig, resolve_scan_options};

pub(crate) fn handle(args: cli::ScanArgs, resolved: &ResolvedConfig) -> Result<()> {
    let registry = resolved.registry()?;
    let categorizer = resolved.categorizer()?;
    let options = resolve_scan_options(&args, &resolved.toml);
    let workdir = resolved.workdir(args.workdir.as_deref());

    let repositories = repositories(&args, resolved);
    let results: Vec<ScanResult> = repositories
        .into_iter()
        .map(|repo| scan_one(repo, &workdir, &registry, &categorizer, &options))
        .collect();

    let report = dtok_format::assemble_report(results);
    if !args.no_write {
        let dir = resolved.report_dir(args.out.as_deref());
        let path = dtok_format::write_report_json(&dir, &report)?;
        eprintln!("Wrote {}", path.display());
    }

    let format = resolved.format(args.format);
    print!("{}", dtok_format::render_report(&report, format)?);
    Ok(())
}

/// `--repo` paths when given, else `[[repositories]]`, else the working directory.
fn repositories(args: &cli::ScanArgs, resolved: &ResolvedConfig) -> Vec<RepositoryConfig> {
    if !args.repos.is_empty() {
        return args.repos.iter().map(|p| local_repository(p)).collect();
    }
    if !resolved.toml.repositories.is_empty() {
        return resolved
            .toml
            .repositories
            .iter()
            .cloned()
            .map(|mut repo| {
                if !dtok_git::is_remote_location(&repo.location) {
                    repo.location = resolved.resolve_path(&repo.location).to_string_lossy().to_string();
                }
                repo
            })
            .collect();
    }
    vec![local_repository(Path::new("."))]
}

fn local_repository(path: &Path) -> RepositoryConfig {
    let location = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    RepositoryConfig::local(&location.to_string_lossy())
}

fn scan_one(
    repo: RepositoryConfig,
    workdir: &Path,
    registry: &PatternRegistry,
    categorizer: &Categorizer,
    options: &ScanOptions,
) -> ScanResult {
    tracing::info!(repository = %repo.name, location = %repo.location, "scanning");
    match dtok_git::prepare_repository(&repo, workdir) {
        Ok(root) => {
            let result = dtok_scan::scan_repository(&root, repo, registry, categorizer, options);
            tracing::info!(
                repository = %result.repository.name,
                unique_tokens = result.summary.unique_tokens,
                total_usage = result.total_usage,
                "scan finished"
            );
            result
        }
        Err(err) => {
            let message = format!("{err:#}");
            tracing::warn!(repository = %repo.name, error = %message, "repository skipped");
            ScanResult::failed(repo, dtok_scan::now_rfc3339(), message)
        }
    }
}
