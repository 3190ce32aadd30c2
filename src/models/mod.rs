//! Core data models for author names and publication records.

mod author;
mod publication;

pub use author::AuthorName;
pub use publication::{IdentityKey, Publication, PublicationBuilder, MISSING_VALUE};
