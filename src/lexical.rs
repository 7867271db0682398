//! Tokenization, heuristic part-of-speech filters and overlap metrics.
//!
//! This module provides:
//! - a tokenizer (lowercase, split on non-word characters, tokens of
//!   length ≤ 2 discarded),
//! - a closed-list + suffix-rule part-of-speech classifier,
//! - token-set Jaccard overlap with an explicit both-empty → 0 rule,
//! - distinct-vocabulary counting for the per-task bar comparison.
//!
//! The classifier is deliberately heuristic: a fixed adverb list plus the
//! "-ly" suffix rule, and a fixed auxiliary/common verb list. Anything
//! neither adverb nor verb counts as noun-like. The lists are versioned
//! constants so metric output is comparable across runs.

use std::collections::HashSet;

use log::debug;

/// Bump when the closed lists below change.
pub const POS_LEXICON_VERSION: u32 = 1;

/// Tokens shorter than this are discarded.
pub const MIN_TOKEN_LEN: usize = 3;

/// Closed list of common adverbs that the suffix rule misses.
pub const COMMON_ADVERBS: &[&str] = &[
    "very", "really", "quite", "too", "almost", "always", "never", "often",
    "sometimes", "usually", "here", "there", "now", "then", "today", "tomorrow",
    "yesterday", "well", "badly", "quickly", "slowly",
];

/// Closed list of auxiliaries and high-frequency verbs excluded from the
/// noun-like set.
pub const COMMON_VERBS: &[&str] = &[
    "is", "are", "was", "were", "be", "been", "being", "have", "has", "had",
    "do", "does", "did", "will", "would", "could", "should", "may", "might",
    "can", "get", "got", "make", "made", "go", "went", "come", "came", "see",
    "saw",
];

/// Heuristic word class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PosClass {
    Adverb,
    Verb,
    NounLike,
}

/// Classify one lowercased token: the adverb rule (suffix or closed list)
/// wins, then the verb list, everything else is noun-like.
pub fn classify(token: &str) -> PosClass {
    if token.ends_with("ly") || COMMON_ADVERBS.contains(&token) {
        PosClass::Adverb
    } else if COMMON_VERBS.contains(&token) {
        PosClass::Verb
    } else {
        PosClass::NounLike
    }
}

#[inline]
pub fn is_adverb(token: &str) -> bool {
    classify(token) == PosClass::Adverb
}

#[inline]
pub fn is_noun_like(token: &str) -> bool {
    classify(token) == PosClass::NounLike
}

/// Lowercase, split on non-word characters, drop tokens of length ≤ 2.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|w| w.len() >= MIN_TOKEN_LEN)
        .map(str::to_string)
        .collect()
}

/// Distinct qualifying tokens of a text.
pub fn token_set(text: &str) -> HashSet<String> {
    tokenize(text).into_iter().collect()
}

/// Count of distinct qualifying tokens.
pub fn vocabulary_size(text: &str) -> usize {
    token_set(text).len()
}

/// |intersection| / |union| of two token sets; 0 when both are empty.
pub fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    intersection as f64 / union as f64
}

/// Overlap metric selector for the matrix and heatmap panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlapMetric {
    /// Token-set Jaccard over all qualifying tokens.
    #[default]
    Jaccard,
    /// Jaccard restricted to heuristic adverbs.
    AdverbJaccard,
    /// Jaccard restricted to noun-like tokens.
    NounJaccard,
    /// Distinct-vocabulary count; a per-task scalar, not a pairwise
    /// metric. In pairwise position it falls back to plain Jaccard.
    VocabularyCount,
}

impl OverlapMetric {
    /// Parse a selector key. Unknown keys fall back to the default metric.
    pub fn from_key(key: &str) -> Self {
        match key {
            "jaccard" => Self::Jaccard,
            "jaccard_adverbs" => Self::AdverbJaccard,
            "jaccard_nouns" => Self::NounJaccard,
            "unique_vocab" => Self::VocabularyCount,
            other => {
                debug!("unknown metric key {other:?}, using default");
                Self::default()
            }
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Self::Jaccard => "jaccard",
            Self::AdverbJaccard => "jaccard_adverbs",
            Self::NounJaccard => "jaccard_nouns",
            Self::VocabularyCount => "unique_vocab",
        }
    }
}

/// Token set of a text restricted by the metric's word-class filter.
fn metric_token_set(text: &str, metric: OverlapMetric) -> HashSet<String> {
    let tokens = tokenize(text);
    match metric {
        OverlapMetric::Jaccard | OverlapMetric::VocabularyCount => {
            tokens.into_iter().collect()
        }
        OverlapMetric::AdverbJaccard => {
            tokens.into_iter().filter(|t| is_adverb(t)).collect()
        }
        OverlapMetric::NounJaccard => {
            tokens.into_iter().filter(|t| is_noun_like(t)).collect()
        }
    }
}

/// Pairwise overlap between two texts under the selected metric.
///
/// Returns 0 when either text is empty; otherwise a Jaccard score in
/// [0,1] over the (possibly word-class-filtered) token sets.
pub fn bias_metric(text1: &str, text2: &str, metric: OverlapMetric) -> f64 {
    if text1.is_empty() || text2.is_empty() {
        return 0.0;
    }
    let a = metric_token_set(text1, metric);
    let b = metric_token_set(text2, metric);
    jaccard(&a, &b)
}
