//! Heuristic tier rules, tried in order. The first rule whose predicate
//! holds classifies the token.

use std::sync::LazyLock;

use dtok_path::normalize_rel_path;
use dtok_types::{CategorySource, TokenCategory, TokenTier};
use regex::Regex;

/// A token name prepared for rule matching.
#[derive(Debug, Clone)]
pub struct TokenContext<'a> {
    pub name: &'a str,
    /// Lowercase, sigil stripped, `.` and `_` folded to `-`.
    pub bare: String,
    /// Lowercase, `/`-separated, always starting with `/`.
    pub path: Option<String>,
}

impl<'a> TokenContext<'a> {
    pub fn new(name: &'a str, file_path: Option<&str>) -> Self {
        Self {
            name,
            bare: bare_name(name),
            path: file_path.map(|p| format!("/{}", normalize_rel_path(p).to_ascii_lowercase())),
        }
    }

    fn path_contains(&self, needle: &str) -> bool {
        self.path.as_deref().is_some_and(|p| p.contains(needle))
    }

    /// Category label for this token's name.
    pub fn category(&self) -> &'static str {
        infer_category(&self.bare)
    }
}

/// Strip the leading sigil and fold separators so every syntax compares alike.
pub fn bare_name(name: &str) -> String {
    let trimmed = name.trim();
    let stripped = trimmed
        .strip_prefix("--")
        .or_else(|| trimmed.strip_prefix('$'))
        .or_else(|| trimmed.strip_prefix('@'))
        .unwrap_or(trimmed);
    stripped
        .to_ascii_lowercase()
        .chars()
        .map(|c| if c == '.' || c == '_' { '-' } else { c })
        .collect()
}

/// An ordered heuristic: `matches` decides, `classify` produces the category.
pub struct HeuristicRule {
    pub name: &'static str,
    pub matches: fn(&TokenContext<'_>) -> bool,
    pub classify: fn(&TokenContext<'_>) -> TokenCategory,
}

impl std::fmt::Debug for HeuristicRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeuristicRule").field("name", &self.name).finish()
    }
}

static RAW_COLOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:colou?rs?-)?(?:red|blue|green|yellow|orange|purple|pink|gray|grey|black|white|teal|cyan|indigo|violet|neutral)(?:-\d{1,3})?$",
    )
    .expect("valid regex literal")
});

static RAW_SCALE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:space|spacing|spacer|size|sizing|gap|font-size)-(?:\d+|\d*x*s|sm|md|m|lg|\d*x*l)$",
    )
    .expect("valid regex literal")
});

static RAW_FONT_WEIGHT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:font-weight|fw|weight)-(?:\d00|thin|light|regular|normal|medium|semibold|bold|extrabold|black|heavy)$",
    )
    .expect("valid regex literal")
});

static DESIGN_SYSTEM_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:ds|dt|sys|tokens?|brand)-").expect("valid regex literal"));

static THEME_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:theme|semantic|mixin)-").expect("valid regex literal"));

const FOUNDATION_PATHS: &[&str] = &["/foundation/", "/foundations/", "/theme/", "/core/", "/tokens/"];

fn heuristic(
    ctx: &TokenContext<'_>,
    tier: TokenTier,
    subcategory: Option<&str>,
    purpose: &str,
) -> TokenCategory {
    TokenCategory {
        tier,
        category: ctx.category().to_string(),
        subcategory: subcategory.map(str::to_string),
        purpose: purpose.to_string(),
        source: CategorySource::Heuristic,
    }
}

/// The built-in rule list. The last rule always matches.
pub fn builtin_rules() -> Vec<HeuristicRule> {
    vec![
        HeuristicRule {
            name: "raw-color",
            matches: |ctx| RAW_COLOR.is_match(&ctx.bare),
            classify: |ctx| heuristic(ctx, TokenTier::Raw, Some("base-palette"), "Base palette value"),
        },
        HeuristicRule {
            name: "raw-scale",
            matches: |ctx| RAW_SCALE.is_match(&ctx.bare),
            classify: |ctx| heuristic(ctx, TokenTier::Raw, Some("scale"), "Raw scale step"),
        },
        HeuristicRule {
            name: "raw-font-weight",
            matches: |ctx| RAW_FONT_WEIGHT.is_match(&ctx.bare),
            classify: |ctx| TokenCategory {
                category: "typography".to_string(),
                ..heuristic(ctx, TokenTier::Raw, Some("font-weight"), "Font weight literal")
            },
        },
        HeuristicRule {
            name: "foundation-prefix",
            matches: |ctx| DESIGN_SYSTEM_PREFIX.is_match(&ctx.bare),
            classify: |ctx| heuristic(ctx, TokenTier::Foundation, None, "Design system token"),
        },
        HeuristicRule {
            name: "foundation-theme",
            matches: |ctx| THEME_PREFIX.is_match(&ctx.bare),
            classify: |ctx| heuristic(ctx, TokenTier::Foundation, None, "Theme or semantic token"),
        },
        HeuristicRule {
            name: "foundation-path",
            matches: |ctx| FOUNDATION_PATHS.iter().any(|hint| ctx.path_contains(hint)),
            classify: |ctx| heuristic(ctx, TokenTier::Foundation, None, "Foundation-level token"),
        },
        HeuristicRule {
            name: "component-path",
            matches: |ctx| ctx.path_contains("/components/"),
            classify: |ctx| heuristic(ctx, TokenTier::Component, None, "Component styling"),
        },
        HeuristicRule {
            name: "component-utils",
            matches: |ctx| ctx.path_contains("/_utils") || ctx.path_contains("/utils/"),
            classify: |ctx| heuristic(ctx, TokenTier::Component, None, "Utility classes"),
        },
        HeuristicRule {
            name: "component-fallback",
            matches: |_| true,
            classify: |ctx| heuristic(ctx, TokenTier::Component, None, "Component-specific token"),
        },
    ]
}

const CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "color",
        &[
            "color", "colour", "colors", "bg", "background", "fill", "palette", "red", "blue", "green",
            "yellow", "orange", "purple", "pink", "gray", "grey", "black", "white", "teal", "cyan",
            "indigo", "violet", "neutral",
        ],
    ),
    (
        "typography",
        &["font", "text", "typography", "type", "line", "letter", "heading", "leading", "weight"],
    ),
    (
        "spacing",
        &["space", "spacing", "spacer", "gap", "margin", "padding", "gutter", "inset"],
    ),
    ("sizing", &["size", "sizing", "width", "height", "min", "max"]),
    ("border", &["border", "radius", "outline", "rounded", "stroke"]),
    ("elevation", &["shadow", "elevation", "depth"]),
    (
        "motion",
        &["motion", "transition", "duration", "easing", "ease", "animation", "delay"],
    ),
    ("layer", &["z", "zindex", "layer", "stack"]),
    ("breakpoint", &["breakpoint", "bp", "screen", "viewport", "media"]),
];

/// Category label from name keywords; `"other"` when nothing matches.
pub fn infer_category(bare: &str) -> &'static str {
    let segments: Vec<&str> = bare.split('-').filter(|s| !s.is_empty()).collect();
    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| segments.iter().any(|seg| keywords.contains(seg)))
        .map(|(category, _)| *category)
        .unwrap_or("other")
}
