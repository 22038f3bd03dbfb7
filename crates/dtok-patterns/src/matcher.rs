//! Line-oriented matching of one compiled format against file content.
//!
//! Each line gets its own `captures_iter` cursor, so no match state leaks
//! from one line to the next and every non-overlapping match on a line is
//! reported.

use dtok_types::TokenOccurrence;

use crate::CompiledFormat;

/// A matched token name together with where it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenMatch {
    pub token_name: String,
    pub occurrence: TokenOccurrence,
}

impl CompiledFormat {
    /// All occurrences of this format in `content`.
    ///
    /// Lines and columns are 1-based; columns count characters, not bytes.
    pub fn find_occurrences(&self, content: &str, file_path: &str, context_width: usize) -> Vec<TokenMatch> {
        let mut out = Vec::new();

        for (idx, line) in content.lines().enumerate() {
            for caps in self.regex.captures_iter(line) {
                let Some(whole) = caps.get(0) else {
                    continue;
                };
                if whole.as_str().is_empty() {
                    continue;
                }
                let token_name = caps
                    .get(1)
                    .map(|g| g.as_str())
                    .unwrap_or_else(|| whole.as_str())
                    .to_string();

                out.push(TokenMatch {
                    token_name,
                    occurrence: TokenOccurrence {
                        file_path: file_path.to_string(),
                        line: idx + 1,
                        column: line[..whole.start()].chars().count() + 1,
                        context_snippet: context_window(line, whole.start(), context_width),
                        matched_text: whole.as_str().to_string(),
                        format_name: self.format.name.clone(),
                    },
                });
            }
        }

        out
    }
}

/// Up to `width` characters on each side of the byte offset `match_start`,
/// clipped to the line and trimmed.
pub fn context_window(line: &str, match_start: usize, width: usize) -> String {
    let start_char = line[..match_start].chars().count();
    let from = start_char.saturating_sub(width);
    let len = (start_char - from).saturating_add(width);
    line.chars()
        .skip(from)
        .take(len)
        .collect::<String>()
        .trim()
        .to_string()
}
