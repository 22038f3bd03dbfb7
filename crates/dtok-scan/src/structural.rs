//! Fixed-signature detection of UI structures (buttons, cards, modals, ...)
//! by class-name style matches.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use dtok_types::{PatternComplexity, PatternUsageResult};
use regex::Regex;

/// One named structure with a static complexity tier.
#[derive(Debug)]
pub struct StructuralSignature {
    pub name: &'static str,
    pub complexity: PatternComplexity,
    regex: Regex,
}

impl StructuralSignature {
    /// Number of matches in `content`.
    pub fn count(&self, content: &str) -> usize {
        self.regex.find_iter(content).count()
    }
}

/// Class-name modifier tail: `-primary`, `__body`, `--lg`.
const MODIFIERS: &str = r"(?:(?:--?|__?)[a-z0-9]+)*\b";

fn signature(name: &'static str, stems: &str, complexity: PatternComplexity) -> StructuralSignature {
    StructuralSignature {
        name,
        complexity,
        regex: Regex::new(&format!(r"(?i)\b(?:{stems}){MODIFIERS}")).expect("valid regex literal"),
    }
}

static SIGNATURES: LazyLock<Vec<StructuralSignature>> = LazyLock::new(|| {
    use PatternComplexity::{Complex, Moderate, Simple};
    vec![
        signature("button", "btn|button", Simple),
        signature("card", "card", Simple),
        signature("modal", "modal|dialog", Complex),
        signature("form", "form|form-group|form-control|input-group", Moderate),
        signature("navigation", "nav|navbar|navigation|breadcrumb", Moderate),
        signature("table", "table|data-table", Moderate),
        signature("grid", r"grid|col-(?:\d+|xs|sm|md|lg|xl)", Moderate),
    ]
});

/// The built-in signatures, in detection order.
pub fn builtin_signatures() -> &'static [StructuralSignature] {
    &SIGNATURES
}

/// Accumulates signature usage across the files of one scan.
#[derive(Debug, Default)]
pub struct StructuralDetector {
    tallies: BTreeMap<&'static str, Tally>,
}

#[derive(Debug)]
struct Tally {
    complexity: PatternComplexity,
    count: usize,
    locations: BTreeSet<String>,
}

impl StructuralDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count every signature in one file's content.
    pub fn observe(&mut self, file_path: &str, content: &str) {
        for sig in builtin_signatures() {
            let hits = sig.count(content);
            if hits == 0 {
                continue;
            }
            let tally = self.tallies.entry(sig.name).or_insert_with(|| Tally {
                complexity: sig.complexity,
                count: 0,
                locations: BTreeSet::new(),
            });
            tally.count += hits;
            tally.locations.insert(file_path.to_string());
        }
    }

    /// Signatures with at least one use, most used first.
    pub fn finish(self) -> Vec<PatternUsageResult> {
        let mut rows: Vec<PatternUsageResult> = self
            .tallies
            .into_iter()
            .filter(|(_, tally)| tally.count > 0)
            .map(|(name, tally)| PatternUsageResult {
                pattern_name: name.to_string(),
                usage_count: tally.count,
                locations: tally.locations,
                complexity: tally.complexity,
            })
            .collect();
        rows.sort_by(|a, b| {
            b.usage_count
                .cmp(&a.usage_count)
                .then_with(|| a.pattern_name.cmp(&b.pattern_name))
        });
        rows
    }
}
