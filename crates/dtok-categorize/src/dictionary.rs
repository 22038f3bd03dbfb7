//! Reference dictionary of known tokens.
//!
//! Lookups try the exact name, then sigil variants (`$x`, `--x`, `@x`, bare
//! `x`), then alias lists. The dictionary only grows: extending it never
//! replaces an existing entry or alias.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use dtok_types::{TokenDefinition, TokenTier};

#[derive(Debug, Clone, Default)]
pub struct TokenDictionary {
    entries: Vec<TokenDefinition>,
    by_name: HashMap<String, usize>,
    by_alias: HashMap<String, usize>,
}

impl TokenDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dictionary seeded with the built-in reference entries.
    pub fn builtin() -> Self {
        let mut dict = Self::new();
        dict.extend(builtin_definitions());
        dict
    }

    /// Parse a JSON array of definitions.
    pub fn definitions_from_json(text: &str) -> Result<Vec<TokenDefinition>> {
        serde_json::from_str(text).context("Failed to parse token dictionary JSON")
    }

    /// Read a JSON array of definitions from disk.
    pub fn definitions_from_file(path: &Path) -> Result<Vec<TokenDefinition>> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read token dictionary {}", path.display()))?;
        Self::definitions_from_json(&text)
            .with_context(|| format!("Invalid token dictionary {}", path.display()))
    }

    /// Add definitions whose names are not already present.
    ///
    /// Returns how many entries were added.
    pub fn extend(&mut self, definitions: impl IntoIterator<Item = TokenDefinition>) -> usize {
        let mut added = 0;
        for def in definitions {
            if self.by_name.contains_key(&def.name) {
                continue;
            }
            let idx = self.entries.len();
            self.by_name.insert(def.name.clone(), idx);
            for alias in &def.aliases {
                self.by_alias.entry(alias.clone()).or_insert(idx);
            }
            self.entries.push(def);
            added += 1;
        }
        added
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[TokenDefinition] {
        &self.entries
    }

    pub fn lookup(&self, name: &str) -> Option<&TokenDefinition> {
        let name = name.trim();
        if let Some(&idx) = self.by_name.get(name) {
            return Some(&self.entries[idx]);
        }
        let variants = sigil_variants(name);
        for variant in &variants {
            if let Some(&idx) = self.by_name.get(variant) {
                return Some(&self.entries[idx]);
            }
        }
        std::iter::once(name)
            .chain(variants.iter().map(|v| v.as_str()))
            .find_map(|candidate| self.by_alias.get(candidate))
            .map(|&idx| &self.entries[idx])
    }
}

/// Spellings of `name` with its leading sigil swapped or removed.
fn sigil_variants(name: &str) -> Vec<String> {
    if let Some(bare) = name.strip_prefix('$') {
        vec![bare.to_string(), format!("--{bare}")]
    } else if let Some(bare) = name.strip_prefix("--") {
        vec![bare.to_string(), format!("${bare}")]
    } else if let Some(bare) = name.strip_prefix('@') {
        vec![bare.to_string(), format!("${bare}")]
    } else {
        vec![format!("${name}"), format!("--{name}")]
    }
}

fn def(
    name: &str,
    tier: TokenTier,
    token_type: &str,
    subcategory: &str,
    description: &str,
    aliases: &[&str],
) -> TokenDefinition {
    TokenDefinition {
        name: name.to_string(),
        tier,
        token_type: token_type.to_string(),
        subcategory: Some(subcategory.to_string()),
        description: Some(description.to_string()),
        aliases: aliases.iter().map(|a| a.to_string()).collect(),
    }
}

/// Reference entries every dictionary starts from.
pub fn builtin_definitions() -> Vec<TokenDefinition> {
    use TokenTier::{Component, Foundation, Raw};
    vec![
        def("$white", Raw, "color", "base-palette", "Pure white", &["--white", "colors.white"]),
        def("$black", Raw, "color", "base-palette", "Pure black", &["--black", "colors.black"]),
        def("$color-primary", Foundation, "color", "brand", "Primary brand color", &["colors.primary", "tokens.color.primary"]),
        def("$color-secondary", Foundation, "color", "brand", "Secondary brand color", &["colors.secondary", "tokens.color.secondary"]),
        def("$color-text", Foundation, "color", "text", "Default text color", &["$text-color", "tokens.color.text"]),
        def("$color-background", Foundation, "color", "surface", "Default page background", &["$bg-color", "$body-bg", "tokens.color.background"]),
        def("$color-border", Foundation, "color", "border", "Default border color", &["$border-color"]),
        def("$color-success", Foundation, "color", "feedback", "Positive feedback color", &["tokens.color.success"]),
        def("$color-warning", Foundation, "color", "feedback", "Warning feedback color", &["tokens.color.warning"]),
        def("$color-error", Foundation, "color", "feedback", "Error feedback color", &["$color-danger", "tokens.color.error"]),
        def("$font-family-base", Foundation, "typography", "font-family", "Base font stack", &["$font-family", "$font-family-sans-serif"]),
        def("$font-size-base", Foundation, "typography", "font-size", "Body text size", &["$font-size", "tokens.font.size.base"]),
        def("$line-height-base", Foundation, "typography", "line-height", "Body line height", &["$line-height"]),
        def("$spacing-unit", Foundation, "spacing", "base-unit", "Base spacing unit the scale derives from", &["$space-unit", "$grid-unit", "$spacer"]),
        def("$border-radius-base", Foundation, "border", "radius", "Default corner radius", &["$border-radius", "$radius-base"]),
        def("$shadow-sm", Foundation, "elevation", "shadow", "Low elevation shadow", &["$box-shadow-sm"]),
        def("$shadow-md", Foundation, "elevation", "shadow", "Medium elevation shadow", &["$box-shadow"]),
        def("$shadow-lg", Foundation, "elevation", "shadow", "High elevation shadow", &["$box-shadow-lg"]),
        def("$transition-base", Foundation, "motion", "transition", "Default transition timing", &["$transition"]),
        def("$breakpoint-md", Foundation, "breakpoint", "viewport", "Medium viewport breakpoint", &["$grid-breakpoint-md"]),
        def("$z-index-dropdown", Component, "layer", "overlay", "Stacking order for dropdown menus", &["$zindex-dropdown"]),
        def("$z-index-modal", Component, "layer", "overlay", "Stacking order for modal dialogs", &["$zindex-modal"]),
        def("$button-padding", Component, "spacing", "button", "Inner padding of buttons", &["$btn-padding"]),
        def("$card-border-radius", Component, "border", "card", "Corner radius of cards", &["$card-radius"]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_lookup() {
        let dict = TokenDictionary::builtin();
        assert_eq!(dict.lookup("$color-primary").unwrap().name, "$color-primary");
    }

    #[test]
    fn sigil_normalization_finds_entry() {
        let dict = TokenDictionary::builtin();
        assert_eq!(dict.lookup("--color-primary").unwrap().name, "$color-primary");
        assert_eq!(dict.lookup("color-primary").unwrap().name, "$color-primary");
        assert_eq!(dict.lookup("@color-primary").unwrap().name, "$color-primary");
    }

    #[test]
    fn alias_lookup_finds_entry() {
        let dict = TokenDictionary::builtin();
        assert_eq!(dict.lookup("$btn-padding").unwrap().name, "$button-padding");
        assert_eq!(dict.lookup("tokens.color.text").unwrap().name, "$color-text");
        // Alias reached through a sigil variant.
        assert_eq!(dict.lookup("--btn-padding").unwrap().name, "$button-padding");
    }

    #[test]
    fn unknown_names_miss() {
        assert!(TokenDictionary::builtin().lookup("$totally-unknown").is_none());
    }

    #[test]
    fn extend_is_additive_only() {
        let mut dict = TokenDictionary::builtin();
        let before = dict.len();
        let added = dict.extend([
            def("$color-primary", TokenTier::Raw, "color", "x", "override attempt", &[]),
            def("$brand-accent", TokenTier::Foundation, "color", "brand", "Accent", &["$accent"]),
        ]);
        assert_eq!(added, 1);
        assert_eq!(dict.len(), before + 1);
        assert_eq!(dict.lookup("$color-primary").unwrap().tier, TokenTier::Foundation);
        assert_eq!(dict.lookup("$accent").unwrap().name, "$brand-accent");
    }

    #[test]
    fn definitions_parse_from_json() {
        let defs = TokenDictionary::definitions_from_json(
            r#"[{"name": "--ds-gap", "tier": "foundation", "type": "spacing", "aliases": ["$ds-gap"]}]"#,
        )
        .unwrap();
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].token_type, "spacing");
        assert!(defs[0].description.is_none());
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(TokenDictionary::definitions_from_json("{not json").is_err());
    }
}
