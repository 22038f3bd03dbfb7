//! `dtok.toml` discovery and CLI > TOML > default resolution.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use dtok_categorize::{Categorizer, TokenDictionary};
use dtok_config::{CONFIG_FILE_NAME, ChangesArgs, GlobalArgs, ScanArgs, TomlConfig};
use dtok_patterns::PatternRegistry;
use dtok_settings::{ChangeOptions, ScanOptions};
use dtok_types::OutputFormat;

const DEFAULT_REPORT_DIR: &str = "reports";
const DEFAULT_WORKDIR: &str = ".dtok/repos";

/// Loaded configuration plus the directory its relative paths resolve from.
#[derive(Debug, Clone, Default)]
pub struct ResolvedConfig {
    pub toml: TomlConfig,
    /// The config file that was read, if any.
    pub source: Option<PathBuf>,
    base_dir: PathBuf,
}

/// Read `--config`, or `./dtok.toml` when it exists.
///
/// An explicit `--config` that does not exist is an error; a missing
/// implicit file just means defaults.
pub(crate) fn load(global: &GlobalArgs) -> Result<ResolvedConfig> {
    let path = match &global.config {
        Some(path) => {
            if !path.is_file() {
                bail!("Config file not found: {}", path.display());
            }
            path.clone()
        }
        None => {
            let implicit = PathBuf::from(CONFIG_FILE_NAME);
            if !implicit.is_file() {
                tracing::debug!("no dtok.toml in working directory, using defaults");
                return Ok(ResolvedConfig::default());
            }
            implicit
        }
    };

    let toml = TomlConfig::from_file(&path)?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(ResolvedConfig::from_toml(toml, Some(path)))
}

impl ResolvedConfig {
    pub fn from_toml(toml: TomlConfig, source: Option<PathBuf>) -> Self {
        let base_dir = source
            .as_deref()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Self {
            toml,
            source,
            base_dir,
        }
    }

    /// `path` as written in the config file, anchored at the file's directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    /// Built-in formats plus any `[[formats]]` entries.
    pub fn registry(&self) -> Result<PatternRegistry> {
        let mut registry = PatternRegistry::builtin();
        registry
            .extend(self.toml.formats.iter().cloned())
            .context("Invalid token format in config")?;
        Ok(registry)
    }

    /// Built-in dictionary plus the `[dictionary]` file, if configured.
    pub fn categorizer(&self) -> Result<Categorizer> {
        let mut categorizer = Categorizer::builtin();
        if let Some(path) = &self.toml.dictionary.path {
            let path = self.resolve_path(path);
            let definitions = TokenDictionary::definitions_from_file(&path)?;
            let added = categorizer.extend_dictionary(definitions);
            tracing::info!(path = %path.display(), added, "loaded token dictionary");
        }
        Ok(categorizer)
    }

    pub fn format(&self, cli: Option<OutputFormat>) -> OutputFormat {
        cli.or(self.toml.output.format).unwrap_or_default()
    }

    pub fn report_dir(&self, cli: Option<&Path>) -> PathBuf {
        match cli {
            Some(dir) => dir.to_path_buf(),
            None => self.resolve_path(self.toml.output.dir.as_deref().unwrap_or(DEFAULT_REPORT_DIR)),
        }
    }

    pub fn workdir(&self, cli: Option<&Path>) -> PathBuf {
        match cli {
            Some(dir) => dir.to_path_buf(),
            None => self.resolve_path(self.toml.output.workdir.as_deref().unwrap_or(DEFAULT_WORKDIR)),
        }
    }

    /// Pointer file for the repository rooted at `repo_root`.
    ///
    /// `--state-file` wins, then `[changes] state_dir/<name>.last-commit`,
    /// then `<repo>/.git/dtok-last-commit`.
    pub fn state_file(&self, cli: Option<&Path>, repo_root: &Path) -> PathBuf {
        if let Some(path) = cli {
            return path.to_path_buf();
        }
        match &self.toml.changes.state_dir {
            Some(dir) => {
                let name = repo_root
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| "repo".to_string());
                self.resolve_path(dir).join(format!("{name}.last-commit"))
            }
            None => repo_root.join(".git").join("dtok-last-commit"),
        }
    }
}

/// `[scan]` settings with `--exclude` patterns appended.
pub fn resolve_scan_options(args: &ScanArgs, toml: &TomlConfig) -> ScanOptions {
    let mut options = ScanOptions::from(&toml.scan);
    options.exclude.extend(args.exclude.iter().cloned());
    options
}

pub fn resolve_change_options(args: &ChangesArgs, toml: &TomlConfig) -> ChangeOptions {
    let base = ChangeOptions::from(&toml.changes);
    ChangeOptions {
        lookback_hours: args.lookback_hours.unwrap_or(base.lookback_hours),
        lookahead: args.lookahead.unwrap_or(base.lookahead),
    }
}
