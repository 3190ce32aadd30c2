//! Publication deduplication over structural identity keys.

use std::collections::HashSet;

use tracing::debug;

use crate::models::{IdentityKey, Publication};
use crate::resolver::Thesaurus;

/// Remove duplicate publications, first occurrence wins.
///
/// Records whose author field is the missing-value sentinel carry no
/// identity signal and are dropped before deduplication. Duplicates arise
/// from overlapping pagination or from "include references" toggles that
/// resurface the same citation; two records are the same publication when
/// their 6-tuple identity keys are equal. Order is preserved, and running
/// the function over its own output is a no-op.
pub fn dedup_publications(records: Vec<Publication>) -> Vec<Publication> {
    let total = records.len();
    let mut seen: HashSet<IdentityKey> = HashSet::new();

    let unique: Vec<Publication> = records
        .into_iter()
        .filter(|record| record.has_authors())
        .filter(|record| seen.insert(record.identity_key()))
        .collect();

    debug!(
        input = total,
        kept = unique.len(),
        dropped = total - unique.len(),
        "deduplicated publications"
    );
    unique
}

/// Deduplicate after rewriting author labels through a thesaurus.
///
/// Canonicalizing names first lets records that differ only in author
/// spelling collapse to one identity.
pub fn dedup_publications_with(
    records: Vec<Publication>,
    thesaurus: &Thesaurus,
) -> Vec<Publication> {
    let rewritten = records
        .into_iter()
        .map(|mut record| {
            if record.has_authors() {
                record.authors = thesaurus.rewrite_authors(&record.authors);
            }
            record
        })
        .collect();
    dedup_publications(rewritten)
}
