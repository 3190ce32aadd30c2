//! Initials and gender compatibility filter.
//!
//! Applied only to pairs that already passed the similarity threshold.
//! Rejecting a pair here is not an error: heuristics that disagree simply
//! leave the pair out of the thesaurus.

use serde::{Deserialize, Serialize};

use crate::models::AuthorName;

/// Tunables for the pair filter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompatibilityFilter {
    /// Maximum surname length difference (in characters) for a merge
    #[serde(default = "default_surname_length_tolerance")]
    pub surname_length_tolerance: usize,
}

fn default_surname_length_tolerance() -> usize {
    3
}

impl Default for CompatibilityFilter {
    fn default() -> Self {
        Self {
            surname_length_tolerance: default_surname_length_tolerance(),
        }
    }
}

impl CompatibilityFilter {
    /// Whether two similar names may denote the same person.
    ///
    /// Symmetric in its arguments. All checks run on the normalized fields:
    /// - initials of equal count must match exactly; otherwise the shorter
    ///   list must be a prefix of the longer (a less detailed citation is
    ///   compatible with a fuller one);
    /// - surname lengths may differ by at most the configured tolerance,
    ///   which guards against the score matching unrelated long/short tokens;
    /// - exactly one surname carrying the feminine suffix rejects the pair,
    ///   so orthographically close male/female forms stay separate people.
    pub fn compatible(&self, a: &AuthorName, b: &AuthorName) -> bool {
        if !initials_compatible(&a.initials_list(), &b.initials_list()) {
            return false;
        }

        if a.surname_len().abs_diff(b.surname_len()) > self.surname_length_tolerance {
            return false;
        }

        // Explicit XOR, not a morphological analysis
        if ends_in_feminine_pattern(&a.surname) != ends_in_feminine_pattern(&b.surname) {
            return false;
        }

        true
    }
}

fn initials_compatible(a: &[&str], b: &[&str]) -> bool {
    if a.len() == b.len() {
        return a == b;
    }
    let (shorter, longer) = if a.len() < b.len() { (a, b) } else { (b, a) };
    longer.starts_with(shorter)
}

/// Feminine surname suffix in either script
fn ends_in_feminine_pattern(surname: &str) -> bool {
    surname.ends_with('а') || surname.ends_with('a')
}
