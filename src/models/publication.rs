//! Publication model representing one bibliographic record.

use serde::{Deserialize, Serialize};

use crate::utils::extract_year;

/// Marker string used wherever a field could not be extracted.
///
/// The extractor upstream emits this for any missing field. It is never the
/// empty string, so identity-key equality and hashing stay well-defined.
pub const MISSING_VALUE: &str = "-";

/// A publication record as extracted from one HTML result cell.
///
/// `year` is not supplied by the extractor; it is derived from `info` by
/// [`Publication::annotate_year`]. All fields fall back to
/// [`MISSING_VALUE`] rather than an empty string or an absent value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publication {
    /// Authors, semicolon-separated
    pub authors: String,

    /// Publication title
    pub title: String,

    /// Free-text venue/issue/page string ("Source title" column)
    pub info: String,

    /// Citation count as formatted by the source
    pub cited_by: String,

    /// Link to the publication page
    pub link: String,

    /// Publication year derived from `info`, or the missing-value sentinel
    pub year: String,

    /// Link to the source (journal issue) page, when present
    pub source_id: String,
}

/// Structural identity of a publication.
///
/// Two records with equal keys are duplicates regardless of scrape order.
/// Equality and hashing are derived over all six fields, so changing any
/// one of them changes the hash with high probability.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentityKey {
    title: String,
    authors: String,
    info: String,
    link: String,
    year: String,
    cited_by: String,
}

impl Publication {
    /// Create a publication with every optional field set to the sentinel
    pub fn new(title: impl Into<String>, authors: impl Into<String>) -> Self {
        Self {
            authors: authors.into(),
            title: title.into(),
            info: MISSING_VALUE.to_string(),
            cited_by: MISSING_VALUE.to_string(),
            link: MISSING_VALUE.to_string(),
            year: MISSING_VALUE.to_string(),
            source_id: MISSING_VALUE.to_string(),
        }
    }

    /// Populate `year` from the info string.
    ///
    /// A record is considered complete once this has run; when no valid year
    /// token is found the field holds the missing-value sentinel.
    pub fn annotate_year(&mut self) {
        self.year = extract_year(&self.info).unwrap_or_else(|| MISSING_VALUE.to_string());
    }

    /// Whether the record carries any author information
    pub fn has_authors(&self) -> bool {
        self.authors != MISSING_VALUE && !self.authors.trim().is_empty()
    }

    /// Returns the author names as a vector
    pub fn author_list(&self) -> Vec<&str> {
        self.authors
            .split(';')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Returns the 6-tuple identity key used for deduplication
    pub fn identity_key(&self) -> IdentityKey {
        IdentityKey {
            title: self.title.clone(),
            authors: self.authors.clone(),
            info: self.info.clone(),
            link: self.link.clone(),
            year: self.year.clone(),
            cited_by: self.cited_by.clone(),
        }
    }
}

/// Builder for constructing [`Publication`] records
#[derive(Debug, Clone)]
pub struct PublicationBuilder {
    publication: Publication,
}

impl PublicationBuilder {
    /// Create a new builder with the required fields
    pub fn new(title: impl Into<String>, authors: impl Into<String>) -> Self {
        Self {
            publication: Publication::new(title, authors),
        }
    }

    /// Set the venue/issue/page info string
    pub fn info(mut self, info: impl Into<String>) -> Self {
        self.publication.info = info.into();
        self
    }

    /// Set the citation count string
    pub fn cited_by(mut self, cited_by: impl Into<String>) -> Self {
        self.publication.cited_by = cited_by.into();
        self
    }

    /// Set the publication link
    pub fn link(mut self, link: impl Into<String>) -> Self {
        self.publication.link = link.into();
        self
    }

    /// Set the source (journal issue) link
    pub fn source_id(mut self, source_id: impl Into<String>) -> Self {
        self.publication.source_id = source_id.into();
        self
    }

    /// Build the publication, deriving its year from the info string
    pub fn build(mut self) -> Publication {
        self.publication.annotate_year();
        self.publication
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_fills_sentinels() {
        let publication = PublicationBuilder::new("Test Paper", "иванов и.и.").build();
        assert_eq!(publication.info, MISSING_VALUE);
        assert_eq!(publication.link, MISSING_VALUE);
        assert_eq!(publication.cited_by, MISSING_VALUE);
        assert_eq!(publication.source_id, MISSING_VALUE);
        assert_eq!(publication.year, MISSING_VALUE);
    }

    #[test]
    fn test_builder_derives_year() {
        let publication = PublicationBuilder::new("Test Paper", "иванов и.и.")
            .info("Вестник науки. 2019. № 4. С. 12-19.")
            .build();
        assert_eq!(publication.year, "2019");
    }

    #[test]
    fn test_author_list() {
        let publication = Publication::new("Test", "иванов и.и.; петров п.п.;");
        assert_eq!(publication.author_list(), vec!["иванов и.и.", "петров п.п."]);
    }

    #[test]
    fn test_has_authors() {
        assert!(Publication::new("Test", "иванов и.и.").has_authors());
        assert!(!Publication::new("Test", MISSING_VALUE).has_authors());
        assert!(!Publication::new("Test", "  ").has_authors());
    }

    #[test]
    fn test_identity_key_equality() {
        let a = PublicationBuilder::new("Test", "иванов и.и.")
            .info("Журнал. 2020.")
            .cited_by("3")
            .link("https://example.org/1")
            .build();
        let mut b = a.clone();
        assert_eq!(a.identity_key(), b.identity_key());

        b.cited_by = "4".to_string();
        assert_ne!(a.identity_key(), b.identity_key());
    }

    #[test]
    fn test_identity_key_ignores_source_id() {
        let a = PublicationBuilder::new("Test", "иванов и.и.")
            .source_id("https://example.org/contents?id=1")
            .build();
        let b = PublicationBuilder::new("Test", "иванов и.и.")
            .source_id("https://example.org/contents?id=2")
            .build();
        assert_eq!(a.identity_key(), b.identity_key());
    }

    #[test]
    fn test_identity_key_hash_consistent_with_eq() {
        use std::collections::HashSet;

        let a = PublicationBuilder::new("Test", "иванов и.и.").build();
        let b = a.clone();

        let mut seen = HashSet::new();
        assert!(seen.insert(a.identity_key()));
        assert!(!seen.insert(b.identity_key()));
    }
}
