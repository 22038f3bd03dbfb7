pub(crate) mod categorize;
pub(crate) mod changes;
pub(crate) mod formats;
pub(crate) mod init;
pub(crate) mod scan;

use anyhow::Result;
use dtok_config as cli;

use crate::config::ResolvedConfig;

pub(crate) fn dispatch(cli: cli::Cli, resolved: &ResolvedConfig) -> Result<()> {
    match cli.command {
        cli::Commands::Scan(args) => scan::handle(args, resolved),
        cli::Commands::Changes(args) => changes::handle(args, resolved),
        cli::Commands::Categorize(args) => categorize::handle(args, resolved),
        cli::Commands::Formats => formats::handle(resolved),
        cli::Commands::Init(args) => init::handle(args),
    }
}
