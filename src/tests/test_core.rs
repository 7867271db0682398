use crate::core::{
    DuplicateRootPolicy, NeighborSet, SimilarityMap, Task, NEIGHBOR_CAP,
};
use crate::tests::test_helpers::{sample_similarities, sample_tasks, similarity_ladder};

#[test]
fn test_similarity_lookup_is_bidirectional() {
    let sims = sample_similarities();

    // Stored forward.
    assert_eq!(sims.score("task001", "task002"), 0.95);
    // Queried against the storage direction.
    assert_eq!(sims.score("task002", "task001"), 0.95);
    // Stored reverse only.
    assert_eq!(sims.score("task001", "task005"), 0.60);
}

#[test]
fn test_similarity_absent_reads_zero() {
    let sims = sample_similarities();
    assert_eq!(sims.score("task004", "task006"), 0.0);
    assert_eq!(sims.score("task001", "no_such_task"), 0.0);
}

#[test]
fn test_similarity_ingestion_validates() {
    let mut sims = SimilarityMap::new();
    sims.insert("a", "b", 1.7);
    sims.insert("a", "c", -0.3);
    sims.insert("a", "d", f64::NAN);

    assert_eq!(sims.score("a", "b"), 1.0, "above-range score should clamp to 1");
    assert_eq!(sims.score("a", "c"), 0.0, "below-range score should clamp to 0");
    assert_eq!(sims.score("a", "d"), 0.0, "non-finite score should be discarded");
    assert!(!sims.contains("a", "d"));
}

#[test]
fn test_partners_include_both_directions() {
    let sims = sample_similarities();
    let partners = sims.partners_of("task001");

    assert!(partners.iter().any(|p| p == "task002"));
    assert!(partners.iter().any(|p| p == "task005"), "reverse-only entry missing");
    assert!(!partners.iter().any(|p| p == "task001"));
}

#[test]
fn test_neighbors_ranked_descending() {
    let tasks = sample_tasks();
    let sims = sample_similarities();
    let set =
        NeighborSet::resolve(0, &tasks, &sims, NEIGHBOR_CAP, DuplicateRootPolicy::Skip);

    assert_eq!(set.len(), 5);
    let sims_in_order: Vec<f64> = set.iter().map(|n| n.similarity).collect();
    assert_eq!(sims_in_order, vec![0.95, 0.85, 0.72, 0.60, 0.55]);

    // Rank is positional.
    for (i, n) in set.iter().enumerate() {
        assert_eq!(n.rank, i);
    }
}

#[test]
fn test_neighbor_cap_is_honored() {
    let sims: Vec<f64> = (0..12).map(|i| 0.9 - 0.05 * i as f64).collect();
    let (tasks, map) = similarity_ladder(&sims);
    let set = NeighborSet::resolve(0, &tasks, &map, NEIGHBOR_CAP, DuplicateRootPolicy::Skip);

    assert_eq!(set.len(), NEIGHBOR_CAP);
    assert_eq!(set.max_similarity(), 0.9);
}

#[test]
fn test_neighbor_ties_break_by_table_order() {
    let (tasks, map) = similarity_ladder(&[0.8, 0.8, 0.8]);
    let set = NeighborSet::resolve(0, &tasks, &map, 9, DuplicateRootPolicy::Skip);

    let indices: Vec<usize> = set.iter().map(|n| n.index).collect();
    assert_eq!(indices, vec![1, 2, 3]);
}

#[test]
fn test_duplicate_root_policy() {
    let (tasks, mut map) = similarity_ladder(&[0.9, 0.7]);
    // Stale row listing the root as its own neighbor.
    map.insert("root", "root", 0.99);

    let skipped = NeighborSet::resolve(0, &tasks, &map, 9, DuplicateRootPolicy::Skip);
    assert!(skipped.rank_of(0).is_none(), "Skip policy should drop the self-entry");
    assert_eq!(skipped.len(), 2);

    let kept = NeighborSet::resolve(0, &tasks, &map, 9, DuplicateRootPolicy::Keep);
    assert_eq!(kept.rank_of(0), Some(0), "Keep policy should retain it at rank 0");
    assert_eq!(kept.len(), 3);
}

#[test]
fn test_empty_similarity_row_yields_empty_set() {
    let tasks = sample_tasks();
    let sims = SimilarityMap::new();
    let set = NeighborSet::resolve(0, &tasks, &sims, 9, DuplicateRootPolicy::Skip);
    assert!(set.is_empty());
    assert_eq!(set.max_similarity(), 0.0);
}

#[test]
fn test_task_deserializes_with_defaults() {
    let raw = r#"{
        "id": "task123",
        "task_name": "antonym generation",
        "definition": "Produce the antonym of the given word.",
        "category": "Word Semantics",
        "source_dataset": "wordnet",
        "positive_examples": [
            {"input": "hot", "output": "cold"}
        ]
    }"#;

    let task: Task = serde_json::from_str(raw).expect("fixture should parse");
    assert_eq!(task.id, "task123");
    assert_eq!(task.positive_examples.len(), 1);
    // Explanation absent in the wire format defaults to empty.
    assert_eq!(task.positive_examples[0].explanation, "");
    assert!(task.negative_examples.is_empty());
    assert!(task.coords.is_none());
}
