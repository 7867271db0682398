use approx::assert_relative_eq;

use crate::lexical::{
    bias_metric, classify, is_adverb, is_noun_like, jaccard, token_set, tokenize,
    vocabulary_size, OverlapMetric, PosClass, COMMON_ADVERBS, COMMON_VERBS,
};

#[test]
fn test_vocabulary_size_counts_distinct_tokens() {
    // Four distinct qualifying tokens, case-insensitive.
    assert_eq!(vocabulary_size("run runs running quickly"), 4);
    assert_eq!(vocabulary_size("Run RUN run"), 1);
    assert_eq!(vocabulary_size(""), 0);
    // Tokens of length <= 2 are discarded.
    assert_eq!(vocabulary_size("go to it"), 0);
}

#[test]
fn test_default_jaccard_scenario() {
    // {quick, fox} vs {slow, fox}: one shared token of three distinct.
    let score = bias_metric("quick fox", "slow fox", OverlapMetric::Jaccard);
    assert_relative_eq!(score, 1.0 / 3.0, epsilon = 1e-12);
}

#[test]
fn test_short_function_words_still_count() {
    // "the" is three characters and survives the length filter, shifting
    // the score for otherwise-identical texts.
    let score = bias_metric("the quick fox", "the slow fox", OverlapMetric::Jaccard);
    assert_relative_eq!(score, 0.5, epsilon = 1e-12);
}

#[test]
fn test_identical_nonempty_text_scores_one() {
    let text = "classify the review sentiment carefully";
    for metric in [
        OverlapMetric::Jaccard,
        OverlapMetric::AdverbJaccard,
        OverlapMetric::NounJaccard,
        OverlapMetric::VocabularyCount,
    ] {
        let score = bias_metric(text, text, metric);
        assert_eq!(score, 1.0, "identical text under {:?} should score 1", metric);
    }
}

#[test]
fn test_empty_text_scores_zero() {
    for metric in [
        OverlapMetric::Jaccard,
        OverlapMetric::AdverbJaccard,
        OverlapMetric::NounJaccard,
        OverlapMetric::VocabularyCount,
    ] {
        assert_eq!(bias_metric("", "anything at all", metric), 0.0);
        assert_eq!(bias_metric("anything at all", "", metric), 0.0);
        assert_eq!(bias_metric("", "", metric), 0.0);
    }
}

#[test]
fn test_adverb_filter_uses_suffix_and_closed_list() {
    assert!(is_adverb("quickly"));
    assert!(is_adverb("slowly"));
    assert!(is_adverb("very"), "closed-list adverb without the suffix");
    assert!(!is_adverb("fox"));

    // Both texts share only their adverbs.
    let a = "move quickly toward the exit";
    let b = "speak quickly about the plan";
    let score = bias_metric(a, b, OverlapMetric::AdverbJaccard);
    assert_eq!(score, 1.0, "the adverb sets are both exactly {{quickly}}");
}

#[test]
fn test_adverbless_texts_score_zero_under_adverb_filter() {
    // Non-empty texts whose adverb sets are both empty.
    let score = bias_metric("label the comment", "tag the review", OverlapMetric::AdverbJaccard);
    assert_eq!(score, 0.0);
}

#[test]
fn test_noun_filter_excludes_verbs_and_adverbs() {
    assert!(is_noun_like("fox"));
    assert!(!is_noun_like("went"));
    assert!(!is_noun_like("quickly"));

    // "see" and "saw" are common verbs, so the noun sets coincide.
    let score = bias_metric("see the fox", "saw the fox", OverlapMetric::NounJaccard);
    assert_eq!(score, 1.0);
}

#[test]
fn test_classify_precedence() {
    // The adverb rule wins before the verb list is consulted.
    assert_eq!(classify("quickly"), PosClass::Adverb);
    assert_eq!(classify("was"), PosClass::Verb);
    assert_eq!(classify("review"), PosClass::NounLike);
    // Suffix rule applies to anything ending in "ly".
    assert_eq!(classify("assembly"), PosClass::Adverb);
}

#[test]
fn test_closed_lists_are_lowercase_and_qualifying() {
    for list in [COMMON_ADVERBS, COMMON_VERBS] {
        for word in list {
            assert_eq!(*word, word.to_lowercase());
        }
    }
}

#[test]
fn test_vocabulary_metric_falls_back_pairwise() {
    // In pairwise position the per-task scalar metric degrades to plain
    // Jaccard rather than failing.
    let a = "quick fox";
    let b = "slow fox";
    let vocab = bias_metric(a, b, OverlapMetric::VocabularyCount);
    let plain = bias_metric(a, b, OverlapMetric::Jaccard);
    assert_eq!(vocab, plain);
}

#[test]
fn test_metric_key_roundtrip_and_fallback() {
    assert_eq!(OverlapMetric::from_key("jaccard"), OverlapMetric::Jaccard);
    assert_eq!(OverlapMetric::from_key("jaccard_adverbs"), OverlapMetric::AdverbJaccard);
    assert_eq!(OverlapMetric::from_key("jaccard_nouns"), OverlapMetric::NounJaccard);
    assert_eq!(OverlapMetric::from_key("unique_vocab"), OverlapMetric::VocabularyCount);
    // Unknown keys fall back to the default metric instead of failing.
    assert_eq!(OverlapMetric::from_key("tfidf"), OverlapMetric::Jaccard);

    for metric in [
        OverlapMetric::Jaccard,
        OverlapMetric::AdverbJaccard,
        OverlapMetric::NounJaccard,
        OverlapMetric::VocabularyCount,
    ] {
        assert_eq!(OverlapMetric::from_key(metric.key()), metric);
    }
}

#[test]
fn test_tokenizer_splits_on_non_word_characters() {
    let tokens = tokenize("Re-rank the top-9 results; then re_rank again!");
    assert!(tokens.contains(&"rank".to_string()));
    assert!(tokens.contains(&"results".to_string()));
    // Underscore is a word character.
    assert!(tokens.contains(&"re_rank".to_string()));
    // "Re" and "top" split apart; the two-letter piece is dropped.
    assert!(!tokens.iter().any(|t| t == "re"));
}

#[test]
fn test_jaccard_on_disjoint_and_equal_sets() {
    let a = token_set("alpha beta gamma");
    let b = token_set("delta epsilon");
    assert_eq!(jaccard(&a, &b), 0.0);
    assert_eq!(jaccard(&a, &a), 1.0);
}
