use std::fmt::Write as _;

use anyhow::Result;
use dtok_categorize::Categorizer;
use dtok_config as cli;
use dtok_types::CategorySource;

use crate::config::ResolvedConfig;

pub(crate) fn handle(args: cli::CategorizeArgs, resolved: &ResolvedConfig) -> Result<()> {
    let categorizer = resolved.categorizer()?;
    print!("{}", render(&categorizer, &args.name, args.path.as_deref()));
    Ok(())
}

pub(crate) fn render(categorizer: &Categorizer, name: &str, path: Option<&str>) -> String {
    let category = categorizer.categorize(name, path);
    let mut s = String::new();
    let _ = writeln!(s, "token:       {name}");
    let _ = writeln!(s, "tier:        {}", category.tier.as_str());
    let _ = writeln!(s, "category:    {}", category.category);
    if let Some(sub) = &category.subcategory {
        let _ = writeln!(s, "subcategory: {sub}");
    }
    let _ = writeln!(s, "purpose:     {}", category.purpose);
    match category.source {
        CategorySource::Dictionary => s.push_str("source:      dictionary\n"),
        CategorySource::Heuristic => {
            let rule = categorizer.matched_rule(name, path).unwrap_or("-");
            let _ = writeln!(s, "source:      heuristic ({rule})");
        }
    }
    s
}
