//! Author name model produced by the normalizer.

use serde::{Deserialize, Serialize};

/// One observed spelling of an author name.
///
/// The `normalized` field is a pure function of `raw`: lowercased, stripped
/// of punctuation outside the name alphabet, and transliterated into the
/// configured canonical script. Running the normalizer over `normalized`
/// again yields the same string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorName {
    /// Original text as scraped (mixed case, punctuation, either script)
    pub raw: String,

    /// Canonical form: `<surname> <initials-block>`
    pub normalized: String,

    /// First whitespace-delimited token of `normalized`
    pub surname: String,

    /// Text after the surname, e.g. `i.i` (may be empty)
    pub initials: String,
}

impl AuthorName {
    /// Returns the initials as an ordered list of letters.
    ///
    /// Splits the initials block on `.` and discards empty fragments, so
    /// both `i.i` and `i.i.` yield `["i", "i"]`.
    pub fn initials_list(&self) -> Vec<&str> {
        self.initials.split('.').filter(|s| !s.is_empty()).collect()
    }

    /// Number of characters in the surname (not bytes; surnames may be Cyrillic)
    pub fn surname_len(&self) -> usize {
        self.surname.chars().count()
    }
}

impl std::fmt::Display for AuthorName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.normalized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(normalized: &str) -> AuthorName {
        let (surname, initials) = match normalized.split_once(' ') {
            Some((s, i)) => (s.to_string(), i.to_string()),
            None => (normalized.to_string(), String::new()),
        };
        AuthorName {
            raw: normalized.to_string(),
            normalized: normalized.to_string(),
            surname,
            initials,
        }
    }

    #[test]
    fn test_initials_list() {
        assert_eq!(name("ivanov i.i").initials_list(), vec!["i", "i"]);
        assert_eq!(name("ivanov i.i.").initials_list(), vec!["i", "i"]);
        assert_eq!(name("ivanov i").initials_list(), vec!["i"]);
    }

    #[test]
    fn test_initials_list_empty() {
        assert!(name("ivanov").initials_list().is_empty());
    }

    #[test]
    fn test_surname_len_counts_chars() {
        assert_eq!(name("иванов и.и").surname_len(), 6);
        assert_eq!(name("ivanov i.i").surname_len(), 6);
    }
}
