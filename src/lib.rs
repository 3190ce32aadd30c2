//! # bibmerge
//!
//! Author-identity resolution and publication deduplication for raw
//! bibliographic records scraped from an academic-profile site.
//!
//! The pipeline normalizes free-text author names (transliterating between
//! Cyrillic and Latin), scores pairwise surname similarity, prunes false
//! merges with initials and gender heuristics, and resolves the surviving
//! pairs into a canonical-name thesaurus. Independently, it derives a
//! validated publication year from noisy info strings and collapses
//! duplicate records over a structural identity key.
//!
//! ## Architecture
//!
//! - [`models`]: Core data structures (Publication, AuthorName, sentinel)
//! - [`resolver`]: Normalization, similarity, compatibility filter, thesaurus
//! - [`utils`]: Year extraction and deduplication
//! - [`io`]: CSV/TSV artifacts (input schema, thesaurus table)
//! - [`config`]: Configuration management

pub mod config;
pub mod io;
pub mod models;
pub mod resolver;
pub mod utils;

// Re-export commonly used types
pub use models::{AuthorName, Publication, PublicationBuilder, MISSING_VALUE};
pub use resolver::{build_thesaurus, Thesaurus};
pub use utils::{dedup_publications, dedup_publications_with, extract_year};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
