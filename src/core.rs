//! Task records, similarity lookups and neighbor ranking.
//!
//! This module provides the data contract between the external data layer
//! and the analytics engine:
//!
//! - `Task`: an immutable task record (definition, category, examples,
//!   optional raw 3D coordinates) loaded once and referenced everywhere.
//! - `SimilarityMap`: a sparse task-to-task score table. Storage is not
//!   guaranteed symmetric, so lookups check both directions and clamp to
//!   [0,1]; absent entries read as 0.
//! - `NeighborSet`: the ranked, capped list of tasks most similar to the
//!   currently selected root. Rank is positional and survives later
//!   threshold filtering.
//! - `TaskSource`: the read-only trait the data/caching collaborator
//!   implements; `InMemorySource` is the trivial owner of loaded data.
//!
//! Scores are validated at ingestion (non-finite rejected, out-of-range
//! clamped) so downstream layout math can assume well-formed values.

use std::collections::HashMap;

use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};

/// Task identifier as found in the loaded data.
pub type TaskId = String;

/// Default cap on the number of ranked neighbors kept per selection.
pub const NEIGHBOR_CAP: usize = 9;

/// One worked example attached to a task: an input, the expected output,
/// and an optional explanation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TaskExample {
    pub input: String,
    pub output: String,
    #[serde(default)]
    pub explanation: String,
}

/// An immutable task record. Owned by the data layer; the engine only
/// ever borrows it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub task_name: String,
    pub definition: String,
    pub category: String,
    pub source_dataset: String,
    #[serde(default)]
    pub positive_examples: Vec<TaskExample>,
    #[serde(default)]
    pub negative_examples: Vec<TaskExample>,
    /// Raw 3D coordinates from the embedding projection, if any.
    #[serde(default)]
    pub coords: Option<[f64; 3]>,
}

impl Task {
    /// Creates a task with no examples and no coordinates.
    pub fn new(
        id: impl Into<TaskId>,
        task_name: impl Into<String>,
        definition: impl Into<String>,
        category: impl Into<String>,
        source_dataset: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            task_name: task_name.into(),
            definition: definition.into(),
            category: category.into(),
            source_dataset: source_dataset.into(),
            positive_examples: Vec::new(),
            negative_examples: Vec::new(),
            coords: None,
        }
    }
}

/// Sparse pairwise similarity scores keyed by task id.
///
/// Absent entries imply unknown similarity and read as 0. Storage is one
/// directional map per task as delivered by the data layer; `score` looks
/// up both directions so callers never have to care which side was stored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimilarityMap {
    scores: HashMap<TaskId, HashMap<TaskId, f64>>,
}

impl SimilarityMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ingest one directed score. Non-finite values are rejected,
    /// out-of-range values clamped to [0,1].
    pub fn insert(&mut self, from: impl Into<TaskId>, to: impl Into<TaskId>, score: f64) {
        let (from, to) = (from.into(), to.into());
        if !score.is_finite() {
            warn!("discarding non-finite similarity {from} -> {to}");
            return;
        }
        let clamped = score.clamp(0.0, 1.0);
        if clamped != score {
            debug!("clamped similarity {from} -> {to}: {score} -> {clamped}");
        }
        self.scores.entry(from).or_default().insert(to, clamped);
    }

    /// Defensive bidirectional lookup, clamped to [0,1]. Absent → 0.
    pub fn score(&self, a: &str, b: &str) -> f64 {
        let forward = self.scores.get(a).and_then(|row| row.get(b));
        let stored = match forward {
            Some(&s) => s,
            None => match self.scores.get(b).and_then(|row| row.get(a)) {
                Some(&s) => s,
                None => return 0.0,
            },
        };
        stored.clamp(0.0, 1.0)
    }

    /// True if an entry exists in either direction.
    pub fn contains(&self, a: &str, b: &str) -> bool {
        self.scores.get(a).map(|row| row.contains_key(b)).unwrap_or(false)
            || self.scores.get(b).map(|row| row.contains_key(a)).unwrap_or(false)
    }

    /// All task ids with a known score against `id`, from either storage
    /// direction. Order is unspecified.
    pub fn partners_of(&self, id: &str) -> Vec<TaskId> {
        let mut partners: Vec<TaskId> = self
            .scores
            .get(id)
            .map(|row| row.keys().cloned().collect())
            .unwrap_or_default();
        for (from, row) in &self.scores {
            if from != id && row.contains_key(id) && !partners.iter().any(|p| p == from) {
                partners.push(from.clone());
            }
        }
        partners
    }

    /// Number of tasks with at least one outgoing entry.
    #[inline]
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

/// How to treat a stale similarity row that lists the root task as its
/// own neighbor.
///
/// `Skip` resolves fresh and drops the self-entry; `Keep` retains it at
/// its rank for callers that want the legacy presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicateRootPolicy {
    #[default]
    Skip,
    Keep,
}

/// One ranked neighbor of the selected root task.
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbor {
    /// Position in the task table.
    pub index: usize,
    /// Similarity to the root, in [0,1].
    pub similarity: f64,
    /// 0-based rank by descending similarity; stable under later
    /// threshold filtering.
    pub rank: usize,
}

/// Ranked neighbors of the selected root, capped at resolution time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NeighborSet {
    entries: Vec<Neighbor>,
}

impl NeighborSet {
    /// Resolve the ranked neighbor set of `root` from the similarity map.
    ///
    /// Candidates are every task with a non-zero score against the root
    /// (either storage direction), sorted by descending similarity with
    /// ties broken by task-table order, then truncated to `cap`.
    pub fn resolve(
        root: usize,
        tasks: &[Task],
        sims: &SimilarityMap,
        cap: usize,
        policy: DuplicateRootPolicy,
    ) -> Self {
        assert!(root < tasks.len(), "root index {} out of bounds", root);
        let root_id = &tasks[root].id;

        let mut candidates: Vec<(usize, f64)> = Vec::new();
        for (j, task) in tasks.iter().enumerate() {
            if j == root {
                // A self-entry only survives under the Keep policy, and
                // only when the data actually carries one.
                if policy == DuplicateRootPolicy::Keep && sims.contains(root_id, root_id) {
                    candidates.push((j, sims.score(root_id, root_id)));
                }
                continue;
            }
            let s = sims.score(root_id, &task.id);
            if s > 0.0 {
                candidates.push((j, s));
            }
        }

        candidates.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        candidates.truncate(cap);

        trace!(
            "resolved {} neighbors for root {} (cap {})",
            candidates.len(),
            root_id,
            cap
        );

        Self {
            entries: candidates
                .into_iter()
                .enumerate()
                .map(|(rank, (index, similarity))| Neighbor { index, similarity, rank })
                .collect(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Neighbor> {
        self.entries.iter()
    }

    /// Rank of the task at `index` in the task table, if it is a neighbor.
    pub fn rank_of(&self, index: usize) -> Option<usize> {
        self.entries.iter().find(|n| n.index == index).map(|n| n.rank)
    }

    /// Highest similarity in the set, 0 when empty.
    pub fn max_similarity(&self) -> f64 {
        self.entries.iter().map(|n| n.similarity).fold(0.0, f64::max)
    }
}

/// Accuracy of an external model over task instances grouped into a
/// similarity bin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelResultBin {
    pub sim_range: [f64; 2],
    pub num_instances: usize,
    pub accuracy: f64,
}

/// Read-only contract the data/caching collaborator fulfills.
///
/// All retrieval, caching and awaiting happens behind this trait; by the
/// time the engine is invoked the data is plain in-memory records.
pub trait TaskSource {
    /// The loaded task table, in stable order.
    fn tasks(&self) -> &[Task];

    /// The loaded sparse similarity map.
    fn similarities(&self) -> &SimilarityMap;

    /// Model accuracy bins for one task; empty when none were computed.
    fn model_result_bins(&self, task_id: &str) -> Vec<ModelResultBin>;
}

/// Trivial `TaskSource` over data already in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    pub tasks: Vec<Task>,
    pub similarities: SimilarityMap,
    pub model_results: HashMap<TaskId, Vec<ModelResultBin>>,
}

impl TaskSource for InMemorySource {
    fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    fn similarities(&self) -> &SimilarityMap {
        &self.similarities
    }

    fn model_result_bins(&self, task_id: &str) -> Vec<ModelResultBin> {
        self.model_results.get(task_id).cloned().unwrap_or_default()
    }
}
