//! Utility stages of the pipeline.
//!
//! - [`extract_year`]: derive a validated publication year from a noisy
//!   bibliographic info string
//! - [`dedup_publications`]: drop duplicate records by structural identity,
//!   order-preserving
//! - [`dedup_publications_with`]: same, after canonicalizing author labels
//!   through a thesaurus
//!
//! # Deduplication
//!
//! ```rust
//! use bibmerge::models::PublicationBuilder;
//! use bibmerge::utils::dedup_publications;
//!
//! let record = PublicationBuilder::new("Title", "иванов и.и.")
//!     .info("Журнал. 2020. С. 1-10.")
//!     .build();
//!
//! let unique = dedup_publications(vec![record.clone(), record]);
//! assert_eq!(unique.len(), 1);
//! ```

mod dedup;
mod year;

pub use dedup::{dedup_publications, dedup_publications_with};
pub use year::{extract_year, extract_year_up_to};
