use std::fmt::Write as _;

use anyhow::Result;
use dtok_patterns::PatternRegistry;

use crate::config::ResolvedConfig;

pub(crate) fn handle(resolved: &ResolvedConfig) -> Result<()> {
    let registry = resolved.registry()?;
    print!("{}", render(&registry));
    Ok(())
}

pub(crate) fn render(registry: &PatternRegistry) -> String {
    let mut s = String::new();
    s.push_str("|Format|Extensions|Pattern|Description|\n");
    s.push_str("|---|---|---|---|\n");
    for format in registry.formats() {
        let f = format.format();
        let extensions: Vec<&str> = f.file_extensions.iter().map(String::as_str).collect();
        let _ = writeln!(
            s,
            "|{}|{}|`{}`|{}|",
            f.name,
            extensions.join(", "),
            f.pattern.replace('|', "\\|"),
            f.description.replace('|', "\\|")
        );
    }
    s
}
