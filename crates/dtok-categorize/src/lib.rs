//! # dtok-categorize
//!
//! **Tier 1 (Classification)**
//!
//! Assigns every token a tier (raw, foundation, component) and a category
//! label. The reference dictionary is consulted first; ordered heuristic
//! rules decide everything else.
//!
//! ## What belongs here
//! * The token dictionary and its lookup normalization
//! * Heuristic tier rules and category inference
//!
//! ## What does NOT belong here
//! * Matching tokens in files (use dtok-patterns)
//! * Aggregation (use dtok-scan)

mod dictionary;
mod rules;

use dtok_types::{CategorySource, TokenCategory, TokenDefinition};

pub use dictionary::{TokenDictionary, builtin_definitions};
pub use rules::{HeuristicRule, TokenContext, bare_name, builtin_rules, infer_category};

/// Dictionary-then-heuristics categorizer.
///
/// Holds no mutable state once built, so the same input always yields the
/// same category.
#[derive(Debug)]
pub struct Categorizer {
    dictionary: TokenDictionary,
    rules: Vec<HeuristicRule>,
}

impl Categorizer {
    pub fn new(dictionary: TokenDictionary) -> Self {
        Self {
            dictionary,
            rules: builtin_rules(),
        }
    }

    pub fn builtin() -> Self {
        Self::new(TokenDictionary::builtin())
    }

    pub fn dictionary(&self) -> &TokenDictionary {
        &self.dictionary
    }

    /// Add dictionary entries; names already known are left alone.
    pub fn extend_dictionary(&mut self, definitions: impl IntoIterator<Item = TokenDefinition>) -> usize {
        self.dictionary.extend(definitions)
    }

    /// Exactly one category for `name`. `file_path` feeds the path hints.
    pub fn categorize(&self, name: &str, file_path: Option<&str>) -> TokenCategory {
        if let Some(def) = self.dictionary.lookup(name) {
            return TokenCategory {
                tier: def.tier,
                category: def.token_type.clone(),
                subcategory: def.subcategory.clone(),
                purpose: def
                    .description
                    .clone()
                    .unwrap_or_else(|| format!("{} token", def.token_type)),
                source: CategorySource::Dictionary,
            };
        }

        let ctx = TokenContext::new(name, file_path);
        match self.rules.iter().find(|rule| (rule.matches)(&ctx)) {
            Some(rule) => (rule.classify)(&ctx),
            // builtin_rules ends with a catch-all, so this is unreachable in practice.
            None => TokenCategory {
                tier: dtok_types::TokenTier::Component,
                category: ctx.category().to_string(),
                subcategory: None,
                purpose: "Component-specific token".to_string(),
                source: CategorySource::Heuristic,
            },
        }
    }

    /// Name of the heuristic rule that would classify `name`, or `None` on a
    /// dictionary hit.
    pub fn matched_rule(&self, name: &str, file_path: Option<&str>) -> Option<&'static str> {
        if self.dictionary.lookup(name).is_some() {
            return None;
        }
        let ctx = TokenContext::new(name, file_path);
        self.rules
            .iter()
            .find(|rule| (rule.matches)(&ctx))
            .map(|rule| rule.name)
    }
}

impl Default for Categorizer {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dtok_types::TokenTier;

    #[test]
    fn dictionary_hit_uses_stored_fields() {
        let cat = Categorizer::builtin().categorize("--color-primary", None);
        assert_eq!(cat.tier, TokenTier::Foundation);
        assert_eq!(cat.category, "color");
        assert_eq!(cat.subcategory.as_deref(), Some("brand"));
        assert_eq!(cat.purpose, "Primary brand color");
        assert_eq!(cat.source, CategorySource::Dictionary);
    }

    #[test]
    fn dictionary_wins_over_heuristics() {
        // `$white` would also satisfy the raw palette rule; the stored entry decides.
        let categorizer = Categorizer::builtin();
        assert_eq!(categorizer.categorize("$white", None).source, CategorySource::Dictionary);
        assert_eq!(categorizer.matched_rule("$white", None), None);
    }

    #[test]
    fn heuristic_fallback_is_component() {
        let cat = Categorizer::builtin().categorize("$hero-gap", Some("pages/home.scss"));
        assert_eq!(cat.tier, TokenTier::Component);
        assert_eq!(cat.category, "spacing");
        assert_eq!(cat.purpose, "Component-specific token");
        assert_eq!(cat.source, CategorySource::Heuristic);
    }

    #[test]
    fn extended_entries_are_found() {
        let mut categorizer = Categorizer::builtin();
        let added = categorizer.extend_dictionary([TokenDefinition {
            name: "--acme-surface".to_string(),
            tier: TokenTier::Foundation,
            token_type: "color".to_string(),
            subcategory: None,
            description: None,
            aliases: vec![],
        }]);
        assert_eq!(added, 1);
        let cat = categorizer.categorize("$acme-surface", None);
        assert_eq!(cat.source, CategorySource::Dictionary);
        assert_eq!(cat.purpose, "color token");
    }
}
