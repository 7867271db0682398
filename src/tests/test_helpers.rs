//! Shared fixtures: a small task table with coordinates, examples and a
//! sparse (deliberately asymmetric) similarity map.

use crate::core::{SimilarityMap, Task, TaskExample};

pub fn example(input: &str, output: &str, explanation: &str) -> TaskExample {
    TaskExample {
        input: input.to_string(),
        output: output.to_string(),
        explanation: explanation.to_string(),
    }
}

/// Six tasks: four with usable coordinates, one with none, one degenerate.
pub fn sample_tasks() -> Vec<Task> {
    let mut t1 = Task::new(
        "task001",
        "sentiment polarity classification",
        "Given a product review, decide whether the sentiment is positive or negative.",
        "Sentiment Analysis",
        "amazon_reviews",
    );
    t1.coords = Some([0.5, 0.3, -0.2]);
    t1.positive_examples = vec![
        example(
            "The blender works quickly and quietly.",
            "positive",
            "The review praises the product.",
        ),
        example("Broke after two days.", "negative", "The review reports a defect."),
    ];
    t1.negative_examples = vec![example(
        "The blender works quickly and quietly.",
        "negative",
        "The sentiment is clearly positive.",
    )];

    let mut t2 = Task::new(
        "task002",
        "review rating prediction",
        "Given a product review, predict the star rating the reviewer assigned.",
        "Sentiment Analysis",
        "amazon_reviews",
    );
    t2.coords = Some([-0.4, 0.1, 0.8]);
    t2.positive_examples = vec![example(
        "The blender works quickly and quietly.",
        "five",
        "Strong praise maps to the top rating.",
    )];

    // No coordinates at all: exercises the sphere fallback.
    let t3 = Task::new(
        "task003",
        "toxicity detection",
        "Label the comment as toxic or harmless.",
        "Toxic Language Detection",
        "civil_comments",
    );

    // Degenerate coordinates: same fallback path.
    let mut t4 = Task::new(
        "task004",
        "question answering",
        "Answer the question using the passage.",
        "Question Answering",
        "squad",
    );
    t4.coords = Some([0.0, 0.0, 0.0]);

    let mut t5 = Task::new(
        "task005",
        "title generation",
        "Write a short title summarizing the article.",
        "Title Generation",
        "gigaword",
    );
    t5.coords = Some([1.0, 0.0, 0.0]);

    let mut t6 = Task::new(
        "task006",
        "keyword tagging",
        "Extract the salient keywords from the abstract.",
        "Keyword Tagging",
        "kp20k",
    );
    t6.coords = Some([0.0, 1.0, 0.0]);

    vec![t1, t2, t3, t4, t5, t6]
}

/// Scores stored from task001's side only, except one reverse-only entry
/// (task005 -> task001) to exercise the bidirectional lookup.
pub fn sample_similarities() -> SimilarityMap {
    let mut sims = SimilarityMap::new();
    sims.insert("task001", "task002", 0.95);
    sims.insert("task001", "task003", 0.85);
    sims.insert("task001", "task004", 0.72);
    sims.insert("task005", "task001", 0.60);
    sims.insert("task001", "task006", 0.55);
    // Unrelated pair, one direction.
    sims.insert("task002", "task003", 0.40);
    sims
}

/// A root plus `sims.len()` neighbors with the given similarities, in
/// task-table order after the root.
pub fn similarity_ladder(sims: &[f64]) -> (Vec<Task>, SimilarityMap) {
    let mut tasks = vec![Task::new(
        "root",
        "root task",
        "Rewrite the sentence in the passive voice.",
        "Text Rewriting",
        "synthetic",
    )];
    let mut map = SimilarityMap::new();

    for (i, &s) in sims.iter().enumerate() {
        let id = format!("n{:02}", i + 1);
        tasks.push(Task::new(
            id.clone(),
            format!("neighbor {}", i + 1),
            format!("Rewrite the sentence using pattern {}.", i + 1),
            "Text Rewriting",
            "synthetic",
        ));
        map.insert("root", id, s);
    }

    (tasks, map)
}
