//! Author-identity resolution pipeline.
//!
//! Leaves first: raw labels are normalized and transliterated, surname
//! similarity proposes candidate pairs, the compatibility filter prunes
//! them, and the resolver folds the admissible pairs into a thesaurus
//! mapping each variant spelling to one canonical label.

pub mod compat;
pub mod normalize;
pub mod similarity;
pub mod thesaurus;

use std::collections::HashSet;

use tracing::info;

use crate::config::Config;
use crate::models::{AuthorName, Publication, MISSING_VALUE};

pub use compat::CompatibilityFilter;
pub use normalize::{normalize, transliterate, Direction};
pub use similarity::{
    build_strategy, score_pairs, EditDistance, SimilarityEdge, SimilarityStrategy, TfIdfCosine,
};
pub use thesaurus::{resolve, resolve_transitive, Thesaurus};

/// Collect the distinct author labels of a record set, first-seen order.
///
/// Labels are split out of the semicolon-joined author strings and trimmed;
/// empty fragments and the missing-value sentinel are dropped.
pub fn collect_author_labels(publications: &[Publication]) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut labels = Vec::new();

    for publication in publications {
        if !publication.has_authors() {
            continue;
        }
        for label in publication.author_list() {
            if label == MISSING_VALUE {
                continue;
            }
            if seen.insert(label.to_string()) {
                labels.push(label.to_string());
            }
        }
    }
    labels
}

/// Run the full resolution pipeline over a set of distinct labels.
///
/// Pure in-memory batch computation; noisy input degrades match quality
/// rather than failing. The similarity stage is quadratic in the number of
/// distinct labels (see [`similarity::score_pairs`]).
pub fn build_thesaurus<S: AsRef<str>>(labels: &[S], config: &Config) -> Thesaurus {
    let names: Vec<AuthorName> = labels
        .iter()
        .map(|label| normalize(label.as_ref(), config.normalizer.direction))
        .filter(|name| !name.surname.is_empty())
        .collect();

    let strategy = build_strategy(config.similarity.strategy, &names);
    let threshold = config
        .similarity
        .threshold
        .unwrap_or_else(|| strategy.default_threshold());

    let candidates = score_pairs(&names, strategy.as_ref(), threshold);

    let filter = &config.compat;
    let admissible: Vec<SimilarityEdge> = candidates
        .into_iter()
        .filter(|edge| filter.compatible(&names[edge.a], &names[edge.b]))
        .collect();

    info!(
        labels = names.len(),
        admissible = admissible.len(),
        threshold,
        transitive = config.resolver.transitive,
        "resolving author identities"
    );

    if config.resolver.transitive {
        resolve_transitive(&names, &admissible)
    } else {
        resolve(&names, &admissible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, StrategyKind};
    use crate::models::PublicationBuilder;

    #[test]
    fn test_collect_author_labels_distinct_first_seen() {
        let records = vec![
            PublicationBuilder::new("P1", "иванов и.и.; петров п.п.").build(),
            PublicationBuilder::new("P2", "петров п.п.; сидоров с.с.").build(),
            PublicationBuilder::new("P3", MISSING_VALUE).build(),
        ];

        let labels = collect_author_labels(&records);
        assert_eq!(labels, vec!["иванов и.и.", "петров п.п.", "сидоров с.с."]);
    }

    #[test]
    fn test_build_thesaurus_merges_scripts() {
        let labels = ["Иванов И.И.", "ivanov i.i.", "Петров П.П."];
        let thesaurus = build_thesaurus(&labels, &Config::default());

        assert_eq!(thesaurus.len(), 1);
        assert_eq!(thesaurus.canonical("ivanov i.i."), "Иванов И.И.");
        assert_eq!(thesaurus.canonical("Петров П.П."), "Петров П.П.");
    }

    #[test]
    fn test_build_thesaurus_gender_guard() {
        let mut config = Config::default();
        config.similarity.strategy = StrategyKind::TfIdfCosine;
        // Force the pair past the similarity stage; the filter must still
        // keep the male/female forms separate
        config.similarity.threshold = Some(0.5);

        let labels = ["Петров П.П.", "Петрова П.П."];
        let thesaurus = build_thesaurus(&labels, &config);
        assert!(thesaurus.is_empty());
    }

    #[test]
    fn test_build_thesaurus_empty_input() {
        let labels: [&str; 0] = [];
        assert!(build_thesaurus(&labels, &Config::default()).is_empty());
    }
}
