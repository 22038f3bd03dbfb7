use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use dtok_config::{self as cli, CONFIG_FILE_NAME, CONFIG_TEMPLATE};

pub(crate) fn handle(args: cli::InitArgs) -> Result<()> {
    if let Some(path) = write_template(&args)? {
        eprintln!("Created {}", path.display());
    }
    Ok(())
}

/// Write the `dtok.toml` template. Returns `None` when only printing.
pub(crate) fn write_template(args: &cli::InitArgs) -> Result<Option<PathBuf>> {
    if args.print {
        print!("{CONFIG_TEMPLATE}");
        return Ok(None);
    }

    if !args.dir.is_dir() {
        bail!("Directory not found: {}", args.dir.display());
    }

    let path = args.dir.join(CONFIG_FILE_NAME);
    if path.exists() && !args.force {
        bail!(
            "{} already exists. Use --force to overwrite, or --print to just view the template.",
            path.display()
        );
    }

    std::fs::write(&path, CONFIG_TEMPLATE)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(Some(path))
}
