//! Surname similarity scoring.
//!
//! Two interchangeable strategies behind one trait: a character n-gram
//! TF-IDF vector space with cosine similarity, and a lighter normalized
//! edit-distance ratio. The resolver and the compatibility filter are
//! strategy-agnostic.

use std::collections::HashMap;

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::config::StrategyKind;
use crate::models::AuthorName;

/// Distinct-surname corpora past this size make the all-pairs stage costly
const QUADRATIC_WARN_THRESHOLD: usize = 5_000;

/// Symmetric similarity over a pair of surnames, scored in `[0, 1]`
pub trait SimilarityStrategy: Send + Sync {
    /// Score a pair of surnames. Must be symmetric: `score(a, b) == score(b, a)`.
    fn score(&self, a: &str, b: &str) -> f64;

    /// Threshold below which a pair is not a merge candidate
    fn default_threshold(&self) -> f64;
}

/// An undirected candidate pair of name indices.
///
/// Exists only while `score >= threshold`; indices refer to the first-seen
/// order of distinct labels, with `a < b`.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityEdge {
    pub a: usize,
    pub b: usize,
    pub score: f64,
}

/// Normalized Levenshtein ratio, the lighter-weight strategy.
///
/// Follows the ratio-based variant that cut candidate pairs around 92.
/// That variant kept pairs strictly above its cutoff; candidate selection
/// here is inclusive at the threshold, so a score of exactly 0.92
/// qualifies.
#[derive(Debug, Clone, Copy, Default)]
pub struct EditDistance;

impl SimilarityStrategy for EditDistance {
    fn score(&self, a: &str, b: &str) -> f64 {
        strsim::normalized_levenshtein(a, b)
    }

    fn default_threshold(&self) -> f64 {
        0.92
    }
}

/// Character n-gram (n ∈ {1, 2}) TF-IDF vectors compared by cosine.
///
/// IDF weights are fitted over the distinct-surname corpus; surnames not
/// seen at fit time are scored with the out-of-corpus default weight.
#[derive(Debug, Clone)]
pub struct TfIdfCosine {
    idf: HashMap<String, f64>,
    default_idf: f64,
}

impl TfIdfCosine {
    /// Fit IDF weights on the distinct surnames of the corpus
    pub fn fit<S: AsRef<str>>(surnames: &[S]) -> Self {
        let n = surnames.len();
        let mut document_frequency: HashMap<String, usize> = HashMap::new();

        for surname in surnames {
            let mut grams = ngrams(surname.as_ref());
            grams.sort_unstable();
            grams.dedup();
            for gram in grams {
                *document_frequency.entry(gram).or_insert(0) += 1;
            }
        }

        let smooth = |df: usize| 1.0 + ((1 + n) as f64 / (1 + df) as f64).ln();
        let idf = document_frequency
            .into_iter()
            .map(|(gram, df)| (gram, smooth(df)))
            .collect();

        Self {
            idf,
            default_idf: smooth(0),
        }
    }

    fn vector(&self, surname: &str) -> HashMap<String, f64> {
        let mut term_frequency: HashMap<String, f64> = HashMap::new();
        for gram in ngrams(surname) {
            *term_frequency.entry(gram).or_insert(0.0) += 1.0;
        }

        let mut norm = 0.0;
        for (gram, weight) in term_frequency.iter_mut() {
            *weight *= self.idf.get(gram).copied().unwrap_or(self.default_idf);
            norm += *weight * *weight;
        }

        if norm > 0.0 {
            let norm = norm.sqrt();
            for weight in term_frequency.values_mut() {
                *weight /= norm;
            }
        }
        term_frequency
    }
}

impl SimilarityStrategy for TfIdfCosine {
    fn score(&self, a: &str, b: &str) -> f64 {
        let va = self.vector(a);
        let vb = self.vector(b);

        // Iterate over the smaller vector
        let (small, large) = if va.len() <= vb.len() { (&va, &vb) } else { (&vb, &va) };
        let dot: f64 = small
            .iter()
            .filter_map(|(gram, w)| large.get(gram).map(|v| w * v))
            .sum();
        dot.clamp(0.0, 1.0)
    }

    fn default_threshold(&self) -> f64 {
        0.8
    }
}

/// Character unigrams and bigrams of a surname
fn ngrams(surname: &str) -> Vec<String> {
    let chars: Vec<char> = surname.chars().collect();
    let mut grams: Vec<String> = chars.iter().map(|c| c.to_string()).collect();
    grams.extend(chars.windows(2).map(|w| w.iter().collect::<String>()));
    grams
}

/// Build the configured strategy, fitting corpus state where needed
pub fn build_strategy(kind: StrategyKind, names: &[AuthorName]) -> Box<dyn SimilarityStrategy> {
    match kind {
        StrategyKind::TfIdfCosine => {
            let surnames: Vec<&str> = names.iter().map(|n| n.surname.as_str()).collect();
            Box::new(TfIdfCosine::fit(&surnames))
        }
        StrategyKind::EditDistance => Box::new(EditDistance),
    }
}

/// Score every pair of distinct names and keep those at or above the threshold.
///
/// The pair count is quadratic in the number of distinct names; this is the
/// dominant cost of the pipeline and is acceptable up to a few thousand
/// names. Scoring is sharded across rayon workers over read-only inputs,
/// then re-sorted into a canonical total order (score descending, index
/// pair ascending) so the resolver's first-assignment-wins policy stays
/// deterministic regardless of worker scheduling.
pub fn score_pairs(
    names: &[AuthorName],
    strategy: &dyn SimilarityStrategy,
    threshold: f64,
) -> Vec<SimilarityEdge> {
    if names.len() > QUADRATIC_WARN_THRESHOLD {
        warn!(
            distinct_names = names.len(),
            "all-pairs similarity is quadratic; expect a long similarity stage"
        );
    }

    let mut edges: Vec<SimilarityEdge> = (0..names.len())
        .into_par_iter()
        .flat_map_iter(|i| {
            ((i + 1)..names.len()).filter_map(move |j| {
                let score = strategy.score(&names[i].surname, &names[j].surname);
                (score >= threshold).then_some(SimilarityEdge { a: i, b: j, score })
            })
        })
        .collect();

    edges.sort_by(|x, y| {
        y.score
            .partial_cmp(&x.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| (x.a, x.b).cmp(&(y.a, y.b)))
    });

    debug!(
        candidates = edges.len(),
        threshold, "similarity stage complete"
    );
    edges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::normalize::{normalize, Direction};

    fn corpus(raws: &[&str]) -> Vec<AuthorName> {
        raws.iter()
            .map(|r| normalize(r, Direction::CyrillicToLatin))
            .collect()
    }

    #[test]
    fn test_edit_distance_identical() {
        assert_eq!(EditDistance.score("ivanov", "ivanov"), 1.0);
    }

    #[test]
    fn test_edit_distance_symmetric() {
        let a = EditDistance.score("ivanov", "ivanova");
        let b = EditDistance.score("ivanova", "ivanov");
        assert_eq!(a, b);
        assert!(a > 0.8 && a < 1.0);
    }

    #[test]
    fn test_tfidf_identical_surnames_score_one() {
        let model = TfIdfCosine::fit(&["ivanov", "petrov", "sidorov"]);
        let score = model.score("ivanov", "ivanov");
        assert!((score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_tfidf_symmetric() {
        let model = TfIdfCosine::fit(&["ivanov", "ivanova", "petrov"]);
        let ab = model.score("ivanov", "ivanova");
        let ba = model.score("ivanova", "ivanov");
        assert!((ab - ba).abs() < 1e-12);
    }

    #[test]
    fn test_tfidf_close_spellings_score_high() {
        let model = TfIdfCosine::fit(&["ivanov", "ivanova", "petrov", "kuznetsov"]);
        assert!(model.score("ivanov", "ivanova") > 0.8);
        assert!(model.score("ivanov", "petrov") < 0.8);
    }

    #[test]
    fn test_tfidf_unseen_surname_scores() {
        let model = TfIdfCosine::fit(&["ivanov", "petrov"]);
        // Out-of-corpus surnames still score via the default IDF weight
        assert!((model.score("smirnov", "smirnov") - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_tfidf_empty_surname_scores_zero() {
        let model = TfIdfCosine::fit(&["ivanov"]);
        assert_eq!(model.score("", "ivanov"), 0.0);
    }

    #[test]
    fn test_ngrams() {
        let grams = ngrams("ab");
        assert_eq!(grams, vec!["a", "b", "ab"]);
    }

    #[test]
    fn test_score_pairs_threshold_and_order() {
        let names = corpus(&["Иванов И.И.", "ivanov i.i.", "Петров П.П."]);
        let edges = score_pairs(&names, &EditDistance, 0.92);

        // Only the transliteration-equal pair survives
        assert_eq!(edges.len(), 1);
        assert_eq!((edges[0].a, edges[0].b), (0, 1));
        assert_eq!(edges[0].score, 1.0);
    }

    #[test]
    fn test_score_pairs_inclusive_at_threshold() {
        // A score sitting exactly on the threshold is still a candidate
        let names = corpus(&["Иванов И.И.", "иванов и. и."]);
        let edges = score_pairs(&names, &EditDistance, 1.0);

        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].score, 1.0);
    }

    #[test]
    fn test_score_pairs_deterministic_order() {
        let names = corpus(&["Иванов И.И.", "Иванова А.А.", "Иванов А.И.", "Петров П.П."]);
        let strategy = build_strategy(StrategyKind::TfIdfCosine, &names);
        let first = score_pairs(&names, strategy.as_ref(), 0.5);
        let second = score_pairs(&names, strategy.as_ref(), 0.5);
        assert_eq!(first, second);

        // Ties and ranking resolve to (score desc, index pair asc)
        for pair in first.windows(2) {
            assert!(
                pair[0].score > pair[1].score
                    || ((pair[0].a, pair[0].b) < (pair[1].a, pair[1].b))
            );
        }
    }

    #[test]
    fn test_score_pairs_empty_corpus() {
        let edges = score_pairs(&[], &EditDistance, 0.9);
        assert!(edges.is_empty());
    }
}
