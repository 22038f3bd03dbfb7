//! BDD-style scenario tests for repository scans.

use std::fs;
use std::path::Path;

use dtok_categorize::Categorizer;
use dtok_patterns::PatternRegistry;
use dtok_scan::scan_repository;
use dtok_settings::ScanOptions;
use dtok_types::{CategorySource, PatternComplexity, RepositoryConfig, ScanResult, TokenTier};
use tempfile::tempdir;

// ── Helpers ─────────────────────────────────────────────────────

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn scan(root: &Path) -> ScanResult {
    scan_repository(
        root,
        RepositoryConfig::local(&root.to_string_lossy()),
        &PatternRegistry::builtin(),
        &Categorizer::builtin(),
        &ScanOptions::default(),
    )
}

// ── Aggregation scenarios ───────────────────────────────────────

mod aggregation {
    use super::*;

    #[test]
    fn given_token_in_two_files_when_scanned_then_one_result_sums_usage() {
        let dir = tempdir().unwrap();
        write(dir.path(), "a.scss", ".a { color: $brand-x; border-color: $brand-x; }\n");
        write(dir.path(), "b.scss", ".b { color: $brand-x; }\n");

        let result = scan(dir.path());

        assert_eq!(result.tokens_found.len(), 1);
        let token = &result.tokens_found[0];
        assert_eq!(token.token_name, "$brand-x");
        assert_eq!(token.token_type, "scss-variable");
        assert_eq!(token.total_count, 3);
        let files: Vec<&str> = token.files.iter().map(String::as_str).collect();
        assert_eq!(files, vec!["a.scss", "b.scss"]);
        assert_eq!(result.total_usage, 3);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn given_tokens_with_different_usage_when_scanned_then_most_used_comes_first() {
        let dir = tempdir().unwrap();
        write(dir.path(), "styles/a.scss", "$one: 1;\n$two: $one;\n$three: $one + $two;\n");

        let result = scan(dir.path());

        let names: Vec<&str> = result.tokens_found.iter().map(|t| t.token_name.as_str()).collect();
        assert_eq!(names, vec!["$one", "$two", "$three"]);
        assert_eq!(result.summary.top_tokens, vec!["$one", "$two", "$three"]);
    }

    #[test]
    fn given_mixed_syntaxes_when_scanned_then_each_format_is_its_own_token_type() {
        let dir = tempdir().unwrap();
        write(dir.path(), "a.css", ".a { color: var(--ds-color-text); }\n");
        write(dir.path(), "Button.tsx", "const c = tokens.color.primary;\n");
        write(dir.path(), "README.md", "$not-scanned var(--nor-this)\n");

        let result = scan(dir.path());

        let mut types: Vec<&str> = result.tokens_found.iter().map(|t| t.token_type.as_str()).collect();
        types.sort();
        assert_eq!(types, vec!["css-custom-property", "js-token-reference"]);
        assert_eq!(result.summary.files_scanned, 2);
        assert_eq!(result.summary.files_with_tokens, 2);
    }

    #[test]
    fn given_excluded_directory_when_scanned_then_its_tokens_are_ignored() {
        let dir = tempdir().unwrap();
        write(dir.path(), "src/a.scss", "$kept: 1;\n");
        write(dir.path(), "node_modules/lib/b.scss", "$vendored: 1;\n");

        let result = scan(dir.path());

        let names: Vec<&str> = result.tokens_found.iter().map(|t| t.token_name.as_str()).collect();
        assert_eq!(names, vec!["$kept"]);
    }
}

// ── Categorization and patterns ─────────────────────────────────

mod enrichment {
    use super::*;

    #[test]
    fn given_known_token_when_scanned_then_category_comes_from_dictionary() {
        let dir = tempdir().unwrap();
        write(dir.path(), "a.scss", "p { font-size: $font-size-base; }\n");

        let result = scan(dir.path());

        let category = result.tokens_found[0].category.as_ref().unwrap();
        assert_eq!(category.source, CategorySource::Dictionary);
        assert_eq!(result.summary.tokens_by_tier.foundation, 1);
    }

    #[test]
    fn given_component_folder_when_scanned_then_path_hint_reaches_categorizer() {
        let dir = tempdir().unwrap();
        write(dir.path(), "src/components/Hero.scss", ".hero { padding: $hero-inset; }\n");

        let result = scan(dir.path());

        let category = result.tokens_found[0].category.as_ref().unwrap();
        assert_eq!(category.tier, TokenTier::Component);
        assert_eq!(category.purpose, "Component styling");
    }

    #[test]
    fn given_class_names_when_scanned_then_structural_patterns_are_reported() {
        let dir = tempdir().unwrap();
        write(dir.path(), "a.scss", ".modal { } .modal__body { }\n");
        write(dir.path(), "b.scss", ".modal-footer { }\n");

        let result = scan(dir.path());

        let modal = result.patterns.iter().find(|p| p.pattern_name == "modal").unwrap();
        assert_eq!(modal.usage_count, 3);
        assert_eq!(modal.locations.len(), 2);
        assert_eq!(modal.complexity, PatternComplexity::Complex);
    }
}

// ── Failure handling ────────────────────────────────────────────

mod failures {
    use super::*;

    #[test]
    fn given_missing_root_when_scanned_then_error_is_recorded_not_raised() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("gone");

        let result = scan(&missing);

        assert!(result.tokens_found.is_empty());
        assert!(result.patterns.is_empty());
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].contains("not found"));
        assert_eq!(result.coverage_percent, 0.0);
    }

    #[test]
    fn given_non_utf8_file_when_scanned_then_other_files_still_count() {
        let dir = tempdir().unwrap();
        write(dir.path(), "good.scss", "$ok: 1;\n");
        fs::write(dir.path().join("bad.scss"), [0xff, 0xfe, 0x24, 0x78]).unwrap();

        let result = scan(dir.path());

        assert_eq!(result.tokens_found.len(), 1);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].contains("bad.scss"));
    }

    #[test]
    fn given_no_tokens_when_scanned_then_coverage_is_zero() {
        let dir = tempdir().unwrap();
        write(dir.path(), "a.css", "body { margin: 0; }\n");

        let result = scan(dir.path());

        assert_eq!(result.summary.unique_tokens, 0);
        assert_eq!(result.coverage_percent, 0.0);
    }
}
