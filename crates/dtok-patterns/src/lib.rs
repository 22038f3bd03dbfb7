//! # dtok-patterns
//!
//! **Tier 1 (Matching)**
//!
//! The token format registry and the matcher that applies a format to file
//! content.
//!
//! ## What belongs here
//! * Built-in token formats (SCSS variables, CSS custom properties, JS token references)
//! * Compiling user-defined formats
//! * Line-oriented matching with positions and context
//!
//! ## What does NOT belong here
//! * File discovery (use dtok-walk)
//! * Aggregation across files (use dtok-scan)
//! * Categorization (use dtok-categorize)

mod matcher;

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, Result, bail};
use dtok_path::{extension_lower, normalize_extension};
use dtok_types::TokenFormat;
use regex::Regex;

pub use matcher::{TokenMatch, context_window};

/// A [`TokenFormat`] with its pattern compiled.
#[derive(Debug, Clone)]
pub struct CompiledFormat {
    format: TokenFormat,
    regex: Regex,
}

impl CompiledFormat {
    /// Compile a format. Extensions are normalized to lowercase without dots.
    pub fn compile(mut format: TokenFormat) -> Result<Self> {
        if format.name.trim().is_empty() {
            bail!("Token format has an empty name");
        }
        let regex = Regex::new(&format.pattern)
            .with_context(|| format!("Invalid pattern for token format '{}'", format.name))?;
        format.file_extensions = format
            .file_extensions
            .iter()
            .map(|e| normalize_extension(e))
            .filter(|e| !e.is_empty())
            .collect();
        Ok(Self { format, regex })
    }

    pub fn name(&self) -> &str {
        &self.format.name
    }

    pub fn format(&self) -> &TokenFormat {
        &self.format
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Whether the file's extension is one this format is applied to.
    pub fn applies_to(&self, path: &Path) -> bool {
        extension_lower(path)
            .map(|ext| self.format.file_extensions.contains(&ext))
            .unwrap_or(false)
    }
}

/// The ordered set of token formats a scan applies.
#[derive(Debug, Clone)]
pub struct PatternRegistry {
    formats: Vec<CompiledFormat>,
}

fn builtin_format(name: &str, pattern: &str, extensions: &[&str], description: &str) -> TokenFormat {
    TokenFormat {
        name: name.to_string(),
        pattern: pattern.to_string(),
        file_extensions: extensions.iter().map(|e| e.to_string()).collect(),
        description: description.to_string(),
    }
}

/// The formats every registry starts from.
pub fn builtin_formats() -> Vec<TokenFormat> {
    vec![
        builtin_format(
            "scss-variable",
            r"(\$[A-Za-z_][\w-]*)",
            &["scss", "sass"],
            "SCSS/Sass variable references such as `$color-primary`",
        ),
        builtin_format(
            "css-custom-property",
            r"var\(\s*(--[A-Za-z_][\w-]*)",
            &["css", "scss", "sass", "less", "vue", "svelte"],
            "CSS custom property usage such as `var(--ds-color-text)`",
        ),
        builtin_format(
            "js-token-reference",
            r"\b(tokens\.[A-Za-z_$][\w$]*(?:\.[A-Za-z_$][\w$]*)*)",
            &["js", "jsx", "ts", "tsx", "vue", "svelte"],
            "JS/TS design token object access such as `tokens.color.primary`",
        ),
        builtin_format(
            "js-theme-reference",
            r"\b(theme\.[A-Za-z_$][\w$]*(?:\.[A-Za-z_$][\w$]*)*)",
            &["js", "jsx", "ts", "tsx"],
            "Theme object access in styled components such as `theme.spacing.md`",
        ),
    ]
}

impl PatternRegistry {
    /// Registry holding the built-in formats.
    pub fn builtin() -> Self {
        Self::with_formats(builtin_formats()).expect("built-in token formats compile")
    }

    /// Registry holding exactly `formats`, in order.
    pub fn with_formats(formats: impl IntoIterator<Item = TokenFormat>) -> Result<Self> {
        let mut registry = Self {
            formats: Vec::new(),
        };
        registry.extend(formats)?;
        Ok(registry)
    }

    /// Append formats. Names must stay unique.
    pub fn extend(&mut self, formats: impl IntoIterator<Item = TokenFormat>) -> Result<()> {
        for format in formats {
            if self.get(&format.name).is_some() {
                bail!("Duplicate token format name '{}'", format.name);
            }
            self.formats.push(CompiledFormat::compile(format)?);
        }
        Ok(())
    }

    pub fn formats(&self) -> &[CompiledFormat] {
        &self.formats
    }

    pub fn get(&self, name: &str) -> Option<&CompiledFormat> {
        self.formats.iter().find(|f| f.name() == name)
    }

    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }

    /// Union of every format's extension set.
    pub fn extensions(&self) -> BTreeSet<String> {
        self.formats
            .iter()
            .flat_map(|f| f.format.file_extensions.iter().cloned())
            .collect()
    }

    /// Formats that apply to `path`, in registry order.
    pub fn formats_for<'a>(&'a self, path: &'a Path) -> impl Iterator<Item = &'a CompiledFormat> {
        self.formats.iter().filter(move |f| f.applies_to(path))
    }

    /// Every match of every applicable format in `content`.
    ///
    /// `file_path` decides applicability and is recorded on each occurrence.
    pub fn scan_content(&self, content: &str, file_path: &str, context_width: usize) -> Vec<TokenMatch> {
        let path = Path::new(file_path);
        self.formats_for(path)
            .flat_map(|format| format.find_occurrences(content, file_path, context_width))
            .collect()
    }
}

impl Default for PatternRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
