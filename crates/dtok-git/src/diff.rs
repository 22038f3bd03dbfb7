//! Token-level changes from unified diff text.
//!
//! A removed token line is paired with an added line for the same name when
//! one follows within the lookahead window, which yields a modification.
//! Unpaired removals are deletions and unconsumed additions are additions.
//! Lines that no grammar recognizes are skipped.

use std::collections::HashSet;
use std::sync::LazyLock;

use dtok_types::TokenChange;
use regex::Regex;

/// A token name and value pulled out of one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedToken {
    pub name: String,
    pub value: String,
}

/// `$name: value;` (also `@name` for Less).
static VARIABLE_ASSIGNMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([$@][A-Za-z_][\w-]*)\s*:\s*([^;]*?)\s*;").expect("valid regex literal")
});

/// `--name: value;`
static CUSTOM_PROPERTY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(--[A-Za-z_][\w-]*)\s*:\s*([^;]*?)\s*;").expect("valid regex literal")
});

/// `"key": "value"`
static QUOTED_KEY_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*"([^"]+)"\s*:\s*"([^"]*)""#).expect("valid regex literal")
});

/// Try each grammar in order; the first that matches wins.
pub fn extract_token(line: &str) -> Option<ExtractedToken> {
    [&*VARIABLE_ASSIGNMENT, &*CUSTOM_PROPERTY, &*QUOTED_KEY_VALUE]
        .into_iter()
        .find_map(|grammar| {
            let caps = grammar.captures(line)?;
            Some(ExtractedToken {
                name: caps.get(1)?.as_str().to_string(),
                value: caps.get(2)?.as_str().to_string(),
            })
        })
}

/// File header lines are `--- a/path`, `+++ b/path` or `/dev/null`. A removed
/// custom property (`---name: v;`) has no space after the marker.
fn is_file_header(line: &str, marker: &str) -> bool {
    line == marker || line.strip_prefix(marker).is_some_and(|rest| rest.starts_with(' '))
}

fn is_removal(line: &str) -> bool {
    line.starts_with('-') && !is_file_header(line, "---")
}

fn is_addition(line: &str) -> bool {
    line.starts_with('+') && !is_file_header(line, "+++")
}

/// New-file start line from a hunk header `@@ -a,b +c,d @@`.
fn hunk_start(line: &str) -> Option<usize> {
    let new_range = line.split_whitespace().find(|part| part.starts_with('+'))?;
    new_range
        .trim_start_matches('+')
        .split(',')
        .next()?
        .parse()
        .ok()
}

/// Extract token changes from one file's unified diff.
///
/// `lookahead` is how many lines after a removal are searched for its
/// replacement. Line numbers follow the post-change file: the counter starts
/// at 1, a hunk header resets it to the hunk's new start, and every line
/// except a removal advances it.
pub fn parse_token_changes(diff: &str, lookahead: usize) -> Vec<TokenChange> {
    let lines: Vec<&str> = diff.lines().collect();
    let mut consumed: HashSet<usize> = HashSet::new();
    let mut changes = Vec::new();
    let mut line_number = 1usize;

    for (idx, line) in lines.iter().enumerate() {
        if line.starts_with("@@") {
            if let Some(start) = hunk_start(line) {
                line_number = start;
            }
            continue;
        }

        if is_removal(line) {
            if let Some(old) = extract_token(&line[1..]) {
                let paired = lines
                    .iter()
                    .enumerate()
                    .skip(idx + 1)
                    .take(lookahead)
                    .filter(|(j, candidate)| is_addition(candidate) && !consumed.contains(j))
                    .find_map(|(j, candidate)| {
                        extract_token(&candidate[1..])
                            .filter(|new| new.name == old.name)
                            .map(|new| (j, new))
                    });

                match paired {
                    Some((j, new)) => {
                        consumed.insert(j);
                        changes.push(TokenChange {
                            token_name: old.name,
                            old_value: Some(old.value),
                            new_value: Some(new.value),
                            line_number,
                        });
                    }
                    None => changes.push(TokenChange {
                        token_name: old.name,
                        old_value: Some(old.value),
                        new_value: None,
                        line_number,
                    }),
                }
            }
            continue;
        }

        if is_addition(line)
            && !consumed.contains(&idx)
            && let Some(new) = extract_token(&line[1..])
        {
            changes.push(TokenChange {
                token_name: new.name,
                old_value: None,
                new_value: Some(new.value),
                line_number,
            });
        }
        line_number += 1;
    }

    changes
}
