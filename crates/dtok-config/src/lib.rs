//! # dtok-config
//!
//! **Tier 4 (Configuration)**
//!
//! This crate defines the CLI arguments and the `dtok.toml` file schema.
//!
//! ## What belongs here
//! * Clap `Parser`, `Args`, `Subcommand` structs
//! * Configuration file struct definitions (Serde)
//! * Conversions into the clap-free `dtok-settings` types
//!
//! ## What does NOT belong here
//! * Business logic
//! * I/O operations (except config file parsing)
//! * Higher-tier crate dependencies

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};

use dtok_settings::{ChangeOptions, ScanOptions};
pub use dtok_types::{OutputFormat, RepositoryConfig, TokenFormat};

/// File name looked up in the working directory when `--config` is absent.
pub const CONFIG_FILE_NAME: &str = "dtok.toml";

/// `dtok`: measure design-token adoption and track token changes in git history.
#[derive(Parser, Debug)]
#[command(name = "dtok", version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Verbose output (repeat for more detail). `RUST_LOG` overrides this.
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to a `dtok.toml`. Defaults to `./dtok.toml` when present.
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Scan repositories for token usage and write a JSON report.
    Scan(ScanArgs),

    /// List token changes in commits since the last recorded pass.
    Changes(ChangesArgs),

    /// Show how a token name is categorized.
    Categorize(CategorizeArgs),

    /// List the registered token formats.
    Formats,

    /// Write a `dtok.toml` template to the target directory.
    Init(InitArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct ScanArgs {
    /// Local repository to scan. Repeatable. Replaces `[[repositories]]` from config.
    #[arg(long = "repo", value_name = "PATH")]
    pub repos: Vec<PathBuf>,

    /// Exclude glob(s), added to the configured excludes. Repeatable.
    #[arg(long = "exclude", value_name = "PATTERN")]
    pub exclude: Vec<String>,

    /// Directory for the timestamped JSON report.
    #[arg(long, value_name = "DIR")]
    pub out: Option<PathBuf>,

    /// Skip writing the JSON report file.
    #[arg(long)]
    pub no_write: bool,

    /// Checkout directory for remote repositories.
    #[arg(long, value_name = "DIR")]
    pub workdir: Option<PathBuf>,

    /// Output format for stdout.
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ChangesArgs {
    /// Repository to inspect.
    #[arg(long, value_name = "PATH", default_value = ".")]
    pub repo: PathBuf,

    /// File holding the last processed commit.
    /// Defaults to `<repo>/.git/dtok-last-commit`.
    #[arg(long, value_name = "PATH")]
    pub state_file: Option<PathBuf>,

    /// History window used when no commit has been recorded yet.
    #[arg(long, value_name = "HOURS")]
    pub lookback_hours: Option<u32>,

    /// Lines searched after a removed token for its replacement.
    #[arg(long, value_name = "N")]
    pub lookahead: Option<usize>,

    /// Output format.
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct CategorizeArgs {
    /// Token name as it appears in source (e.g. `$color-primary`, `--space-2`).
    pub name: String,

    /// File the token was found in, used by path-based rules.
    #[arg(long, value_name = "FILE")]
    pub path: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct InitArgs {
    /// Target directory.
    #[arg(default_value = ".")]
    pub dir: PathBuf,

    /// Overwrite an existing `dtok.toml`.
    #[arg(long)]
    pub force: bool,

    /// Print the template to stdout instead of writing a file.
    #[arg(long)]
    pub print: bool,
}

// ============================================================
// dtok.toml
// ============================================================

/// Root of `dtok.toml`. Every section is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TomlConfig {
    pub scan: ScanConfig,
    pub changes: ChangesConfig,
    pub output: OutputConfig,
    pub dictionary: DictionaryConfig,

    /// Extra token formats registered after the built-in ones.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub formats: Vec<TokenFormat>,

    /// Repositories scanned when `--repo` is not given.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub repositories: Vec<RepositoryConfig>,
}

/// `[scan]`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ScanConfig {
    pub include: Option<Vec<String>>,
    pub exclude: Option<Vec<String>>,
    pub context_width: Option<usize>,
}

/// `[changes]`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ChangesConfig {
    pub lookback_hours: Option<u32>,
    pub lookahead: Option<usize>,
    pub state_dir: Option<String>,
}

/// `[output]`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory for JSON reports (default: `reports`).
    pub dir: Option<String>,
    pub format: Option<OutputFormat>,
    /// Checkout directory for remote repositories (default: `.dtok/repos`).
    pub workdir: Option<String>,
}

/// `[dictionary]`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DictionaryConfig {
    /// JSON file with extra token definitions.
    pub path: Option<String>,
}

impl TomlConfig {
    /// Load configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Load configuration from a file path.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config =
            Self::parse(&content).with_context(|| format!("Invalid TOML in {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config {}", path.display()))?;
        Ok(config)
    }

    /// Checks that serde cannot express.
    ///
    /// Repository names key the checkout directory and the report, so they
    /// must be unique.
    pub fn validate(&self) -> Result<()> {
        let mut seen = BTreeSet::new();
        for repo in &self.repositories {
            if !seen.insert(repo.name.as_str()) {
                bail!("Duplicate repository name '{}' in [[repositories]]", repo.name);
            }
        }
        Ok(())
    }
}

// ============================================================
// Conversions into Tier-0 settings
// ============================================================

impl From<&ScanConfig> for ScanOptions {
    fn from(c: &ScanConfig) -> Self {
        let defaults = ScanOptions::default();
        Self {
            include: c.include.clone().unwrap_or(defaults.include),
            exclude: c.exclude.clone().unwrap_or(defaults.exclude),
            context_width: c.context_width.unwrap_or(defaults.context_width),
        }
    }
}

impl From<&ChangesConfig> for ChangeOptions {
    fn from(c: &ChangesConfig) -> Self {
        let defaults = ChangeOptions::default();
        Self {
            lookback_hours: c.lookback_hours.unwrap_or(defaults.lookback_hours),
            lookahead: c.lookahead.unwrap_or(defaults.lookahead),
        }
    }
}

/// Template written by `dtok init`.
pub const CONFIG_TEMPLATE: &str = r#"# dtok configuration. Every section is optional.

[scan]
# include = ["**/*"]
# exclude = ["**/node_modules/**", "**/dist/**", "**/*.min.css"]
# context_width = 50

[changes]
# lookback_hours = 24
# lookahead = 4
# state_dir = ".dtok/state"

[output]
# dir = "reports"
# format = "md"
# workdir = ".dtok/repos"

[dictionary]
# path = "tokens.json"

# [[formats]]
# name = "less-variable"
# pattern = '@[a-zA-Z][\w-]*'
# file_extensions = ["less"]
# description = "Less variables"

# [[repositories]]
# name = "web"
# location = "https://github.com/acme/web.git"
# branch = "main"
# team = "design-systems"
# type = "frontend"
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_all_defaults() {
        let config = TomlConfig::parse("").unwrap();
        assert_eq!(config, TomlConfig::default());
        assert_eq!(ScanOptions::from(&config.scan), ScanOptions::default());
        assert_eq!(ChangeOptions::from(&config.changes), ChangeOptions::default());
    }

    #[test]
    fn template_parses() {
        let config = TomlConfig::parse(CONFIG_TEMPLATE).unwrap();
        assert!(config.repositories.is_empty());
        assert!(config.formats.is_empty());
    }

    #[test]
    fn sections_override_defaults() {
        let config = TomlConfig::parse(
            r#"
[scan]
exclude = ["legacy/**"]
context_width = 10

[changes]
lookahead = 2

[output]
format = "json"
"#,
        )
        .unwrap();

        let scan = ScanOptions::from(&config.scan);
        assert_eq!(scan.exclude, vec!["legacy/**".to_string()]);
        assert_eq!(scan.include, ScanOptions::default().include);
        assert_eq!(scan.context_width, 10);

        let changes = ChangeOptions::from(&config.changes);
        assert_eq!(changes.lookahead, 2);
        assert_eq!(changes.lookback_hours, dtok_settings::DEFAULT_LOOKBACK_HOURS);
        assert_eq!(config.output.format, Some(OutputFormat::Json));
    }

    #[test]
    fn repositories_and_formats_are_read() {
        let config = TomlConfig::parse(
            r#"
[[repositories]]
name = "web"
location = "https://example.com/web.git"
type = "frontend"

[[formats]]
name = "less-variable"
pattern = '@[a-zA-Z][\w-]*'
file_extensions = ["less"]
"#,
        )
        .unwrap();

        let repo = &config.repositories[0];
        assert_eq!(repo.branch, "main");
        assert_eq!(repo.repo_type.as_deref(), Some("frontend"));
        assert_eq!(config.formats[0].name, "less-variable");
        assert!(config.formats[0].file_extensions.contains("less"));
    }

    #[test]
    fn duplicate_repository_names_are_rejected() {
        let config = TomlConfig::parse(
            r#"
[[repositories]]
name = "web"
location = "https://example.com/web.git"

[[repositories]]
name = "web"
location = "https://example.com/other-web.git"
"#,
        )
        .unwrap();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("Duplicate repository name 'web'"));
    }

    #[test]
    fn distinct_repository_names_validate() {
        let config = TomlConfig::parse(
            "[[repositories]]\nname = \"web\"\nlocation = \"web\"\n\n[[repositories]]\nname = \"app\"\nlocation = \"app\"\n",
        )
        .unwrap();
        assert!(config.validate().is_ok());
        assert!(TomlConfig::default().validate().is_ok());
    }

    #[test]
    fn unknown_output_format_is_rejected() {
        assert!(TomlConfig::parse("[output]\nformat = \"xml\"\n").is_err());
    }

    #[test]
    fn cli_parses_scan_flags() {
        let cli = Cli::parse_from(["dtok", "-vv", "scan", "--repo", "a", "--repo", "b", "--format", "json"]);
        assert_eq!(cli.global.verbose, 2);
        match cli.command {
            Commands::Scan(args) => {
                assert_eq!(args.repos, vec![PathBuf::from("a"), PathBuf::from("b")]);
                assert_eq!(args.format, Some(OutputFormat::Json));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn cli_changes_defaults_to_current_dir() {
        let cli = Cli::parse_from(["dtok", "changes"]);
        match cli.command {
            Commands::Changes(args) => {
                assert_eq!(args.repo, PathBuf::from("."));
                assert!(args.lookahead.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn cli_schema_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
