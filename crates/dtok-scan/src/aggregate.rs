//! Grouping token matches into per-token usage results.

use std::collections::BTreeMap;

use dtok_patterns::TokenMatch;
use dtok_types::TokenUsageResult;

/// Usage results for one file's matches, grouped by (token name, format name).
pub fn usage_from_matches(matches: impl IntoIterator<Item = TokenMatch>) -> Vec<TokenUsageResult> {
    let mut by_key: BTreeMap<(String, String), TokenUsageResult> = BTreeMap::new();
    for m in matches {
        let key = (m.token_name, m.occurrence.format_name.clone());
        by_key
            .entry(key.clone())
            .or_insert_with(|| TokenUsageResult::new(key.0, key.1))
            .record(m.occurrence);
    }
    by_key.into_values().collect()
}

/// Merge partial results that share a (token name, token type) key.
///
/// Counts are summed, occurrences concatenated and file sets unioned. The
/// output is sorted by `total_count` descending, then token name, then token
/// type; occurrences are ordered by file, line and column. Both orders are
/// independent of the order the partials arrive in.
pub fn aggregate(partials: impl IntoIterator<Item = TokenUsageResult>) -> Vec<TokenUsageResult> {
    let mut by_key: BTreeMap<(String, String), TokenUsageResult> = BTreeMap::new();

    for partial in partials {
        let key = (partial.token_name.clone(), partial.token_type.clone());
        match by_key.get_mut(&key) {
            Some(existing) => {
                existing.total_count += partial.total_count;
                existing.occurrences.extend(partial.occurrences);
                existing.files.extend(partial.files);
                if existing.category.is_none() {
                    existing.category = partial.category;
                }
            }
            None => {
                by_key.insert(key, partial);
            }
        }
    }

    let mut rows: Vec<TokenUsageResult> = by_key.into_values().collect();
    for row in &mut rows {
        row.occurrences.sort_by(|a, b| {
            a.file_path
                .cmp(&b.file_path)
                .then(a.line.cmp(&b.line))
                .then(a.column.cmp(&b.column))
        });
    }

    // Sort descending by count, then by key for determinism.
    rows.sort_by(|a, b| {
        b.total_count
            .cmp(&a.total_count)
            .then_with(|| a.token_name.cmp(&b.token_name))
            .then_with(|| a.token_type.cmp(&b.token_type))
    });
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use dtok_types::TokenOccurrence;

    fn m(name: &str, format: &str, file: &str, line: usize) -> TokenMatch {
        TokenMatch {
            token_name: name.to_string(),
            occurrence: TokenOccurrence {
                file_path: file.to_string(),
                line,
                column: 1,
                context_snippet: name.to_string(),
                matched_text: name.to_string(),
                format_name: format.to_string(),
            },
        }
    }

    #[test]
    fn groups_by_name_and_type() {
        let rows = usage_from_matches([
            m("$a", "scss-variable", "x.scss", 1),
            m("$a", "scss-variable", "x.scss", 2),
            m("$a", "other", "x.scss", 3),
        ]);
        assert_eq!(rows.len(), 2);
        let scss = rows.iter().find(|r| r.token_type == "scss-variable").unwrap();
        assert_eq!(scss.total_count, 2);
    }

    #[test]
    fn merges_counts_occurrences_and_files() {
        let a = usage_from_matches([m("$x", "scss-variable", "a.scss", 1), m("$x", "scss-variable", "a.scss", 5)]);
        let b = usage_from_matches([m("$x", "scss-variable", "b.scss", 2)]);
        let rows = aggregate(a.into_iter().chain(b));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].total_count, 3);
        assert_eq!(rows[0].occurrences.len(), 3);
        let files: Vec<&str> = rows[0].files.iter().map(String::as_str).collect();
        assert_eq!(files, vec!["a.scss", "b.scss"]);
    }

    #[test]
    fn ties_break_on_name_then_type() {
        let rows = aggregate(usage_from_matches([
            m("$b", "scss-variable", "a.scss", 1),
            m("$a", "t2", "a.scss", 1),
            m("$a", "t1", "a.scss", 1),
            m("$c", "scss-variable", "a.scss", 1),
            m("$c", "scss-variable", "a.scss", 2),
        ]));
        let keys: Vec<(&str, &str)> = rows
            .iter()
            .map(|r| (r.token_name.as_str(), r.token_type.as_str()))
            .collect();
        assert_eq!(
            keys,
            vec![("$c", "scss-variable"), ("$a", "t1"), ("$a", "t2"), ("$b", "scss-variable")]
        );
    }

    #[test]
    fn empty_input_gives_empty_output() {
        assert!(aggregate(Vec::new()).is_empty());
    }
}
