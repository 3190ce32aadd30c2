//! Publication-year extraction from noisy bibliographic info strings.
//!
//! A heuristic, not a grammar: adversarial strings can produce false
//! positives or negatives and that is tolerated. Nothing here fails; an
//! unextractable year is simply absent.

use std::sync::LazyLock;

use chrono::Datelike;
use regex::Regex;

/// Years before the printing press are never publication years
const MIN_YEAR: i32 = 1500;

/// Full date token `D.M.YYYY`, the fast path
static FULL_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{1,2}\.\d{1,2}\.(\d{4})\b").expect("valid regex"));

/// Runs of digits; only standalone 4-digit runs are year candidates
static DIGIT_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("valid regex"));

/// Context directly before a 4-digit token marking it as an issue or page
/// number: `№`, a dash with optional digits (page/year ranges), a page
/// marker (`С.`/`p.`/`pp.`) with optional space, or a digit followed by a
/// period.
static NON_YEAR_CONTEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:№\s*|[-–—]\d*|(?:с|p{1,2})\.\s?|\d\.)$").expect("valid regex")
});

/// How many characters of preceding context are inspected
const CONTEXT_CHARS: usize = 5;

/// Extract a publication year from an info string.
///
/// Tries the `D.M.YYYY` full-date form first, then scans standalone 4-digit
/// tokens left to right, skipping tokens whose immediate context marks them
/// as issue or page numbers. Valid years lie in `[1500, current year]`.
pub fn extract_year(info: &str) -> Option<String> {
    extract_year_up_to(info, chrono::Local::now().year())
}

/// [`extract_year`] with an explicit upper bound on valid years
pub fn extract_year_up_to(info: &str, max_year: i32) -> Option<String> {
    if let Some(caps) = FULL_DATE.captures(info) {
        let year = &caps[1];
        if in_range(year, max_year) {
            return Some(year.to_string());
        }
    }

    for token in DIGIT_RUN.find_iter(info) {
        if token.as_str().len() != 4 || !in_range(token.as_str(), max_year) {
            continue;
        }
        if NON_YEAR_CONTEXT.is_match(&preceding_context(info, token.start())) {
            continue;
        }
        return Some(token.as_str().to_string());
    }
    None
}

fn in_range(token: &str, max_year: i32) -> bool {
    token
        .parse::<i32>()
        .map(|year| (MIN_YEAR..=max_year).contains(&year))
        .unwrap_or(false)
}

/// Up to [`CONTEXT_CHARS`] characters directly before a byte offset
fn preceding_context(info: &str, start: usize) -> String {
    let before: Vec<char> = info[..start].chars().collect();
    before[before.len().saturating_sub(CONTEXT_CHARS)..]
        .iter()
        .collect()
}
