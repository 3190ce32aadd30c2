//! Canonical-name mapping and its resolution from admissible pairs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::AuthorName;
use crate::resolver::similarity::SimilarityEdge;

/// Mapping from a non-canonical label to its canonical replacement.
///
/// A label appears as a key at most once and never maps to itself. Labels
/// absent from the mapping are their own canonical form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Thesaurus {
    entries: BTreeMap<String, String>,
}

impl Thesaurus {
    /// Build a thesaurus from `(label, replace_by)` rows.
    ///
    /// Self-mappings are dropped and the first row for a label wins, so the
    /// key-at-most-once invariant holds for any input.
    pub fn from_entries<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut entries = BTreeMap::new();
        for (label, replace_by) in rows {
            if label == replace_by {
                continue;
            }
            entries.entry(label).or_insert(replace_by);
        }
        Self { entries }
    }

    /// Canonical form of a label; the label itself when unmapped
    pub fn canonical<'a>(&'a self, label: &'a str) -> &'a str {
        self.entries.get(label).map(String::as_str).unwrap_or(label)
    }

    /// Rewrite a semicolon-joined author string through the mapping.
    ///
    /// Each name is trimmed, replaced by its canonical form when present and
    /// lowercased, then the list is re-joined with `"; "`.
    pub fn rewrite_authors(&self, authors: &str) -> String {
        authors
            .split(';')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(|name| self.canonical(name).to_lowercase())
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Iterate `(label, replace_by)` rows in deterministic order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Resolve admissible pairs into a thesaurus, first-assignment-wins.
///
/// Pairs must arrive in the canonical order established by the similarity
/// stage. For a pair over first-seen indices `(i, j)` with `i < j`, the
/// earlier label becomes canonical and `j → i` is recorded, unless either
/// label is already a key, in which case the pair is skipped outright.
///
/// The result is deliberately non-transitive: once `B → A` is recorded, a
/// later `C ~ B` match is stored as `C → B`, and the chain is not flattened
/// to `C → A`. Use [`resolve_transitive`] when one representative per
/// equivalence class is wanted instead.
pub fn resolve(names: &[AuthorName], edges: &[SimilarityEdge]) -> Thesaurus {
    let mut entries: BTreeMap<String, String> = BTreeMap::new();

    for edge in edges {
        let (i, j) = (edge.a.min(edge.b), edge.a.max(edge.b));
        let canonical = &names[i].raw;
        let variant = &names[j].raw;

        if canonical == variant {
            continue;
        }
        if entries.contains_key(canonical.as_str()) || entries.contains_key(variant.as_str()) {
            continue;
        }
        entries.insert(variant.clone(), canonical.clone());
    }

    debug!(entries = entries.len(), "thesaurus resolved");
    Thesaurus { entries }
}

/// Resolve admissible pairs with transitive closure.
///
/// Union-find over the edge set; the member with the smallest first-seen
/// index becomes the representative of its class, and every other member
/// maps directly to it. Opt-in alternative to the default [`resolve`]
/// semantics.
pub fn resolve_transitive(names: &[AuthorName], edges: &[SimilarityEdge]) -> Thesaurus {
    let mut parent: Vec<usize> = (0..names.len()).collect();

    fn find(parent: &mut Vec<usize>, x: usize) -> usize {
        let mut root = x;
        while parent[root] != root {
            root = parent[root];
        }
        let mut cur = x;
        while parent[cur] != root {
            let next = parent[cur];
            parent[cur] = root;
            cur = next;
        }
        root
    }

    for edge in edges {
        let ra = find(&mut parent, edge.a);
        let rb = find(&mut parent, edge.b);
        if ra != rb {
            // Smaller first-seen index stays the representative
            let (keep, merge) = if ra < rb { (ra, rb) } else { (rb, ra) };
            parent[merge] = keep;
        }
    }

    let mut entries: BTreeMap<String, String> = BTreeMap::new();
    for idx in 0..names.len() {
        let root = find(&mut parent, idx);
        if root != idx && names[idx].raw != names[root].raw {
            entries.insert(names[idx].raw.clone(), names[root].raw.clone());
        }
    }

    debug!(entries = entries.len(), "thesaurus resolved (transitive)");
    Thesaurus { entries }
}
