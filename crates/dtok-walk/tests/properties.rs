use std::collections::BTreeSet;
use std::path::Path;

use dtok_walk::{discover_files, normalize_exclude_patterns};
use proptest::prelude::*;

// ── Strategies ──────────────────────────────────────────────────────

fn pattern() -> impl Strategy<Value = String> {
    ("(\\./){0,2}", "[a-z]{1,6}", "(/\\*\\*)?").prop_map(|(dots, name, tail)| format!("{dots}{name}{tail}"))
}

fn rel_file() -> impl Strategy<Value = String> {
    ("[a-z]{1,4}(/[a-z]{1,4})?", prop::sample::select(vec!["scss", "css", "md", "js"]))
        .prop_map(|(stem, ext)| format!("{stem}.{ext}"))
}

// ── Properties ──────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn exclude_normalization_is_idempotent(patterns in prop::collection::vec(pattern(), 0..8)) {
        let root = Path::new("/repo");
        let once = normalize_exclude_patterns(root, &patterns);
        let twice = normalize_exclude_patterns(root, &once);
        prop_assert_eq!(&once, &twice);

        let unique: BTreeSet<&String> = once.iter().collect();
        prop_assert_eq!(unique.len(), once.len());
        prop_assert!(once.iter().all(|p| !p.starts_with("./")));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn discovered_files_respect_extensions(files in prop::collection::btree_set(rel_file(), 1..10)) {
        let dir = tempfile::tempdir().unwrap();
        for rel in &files {
            let path = dir.path().join(rel);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(&path, "x").unwrap();
        }
        let extensions: BTreeSet<String> = ["scss".to_string(), "css".to_string()].into();

        let found = discover_files(dir.path(), &["**/*".to_string()], &[], &extensions).unwrap();

        for path in &found {
            let ext = path.extension().unwrap().to_string_lossy().to_string();
            prop_assert!(extensions.contains(&ext), "{}", path.display());
        }
        let mut sorted = found.clone();
        sorted.sort();
        sorted.dedup();
        prop_assert_eq!(sorted, found);
    }
}
