//! Coordination state: selection, thresholds and view invalidation.
//!
//! A single owned `ExplorerState` replaces any globally shared blob: every
//! user gesture maps to one named command method, each command mutates
//! exactly the state it owns and returns the `ViewSet` of panels that now
//! need re-rendering. Nothing outside these commands writes the state.
//!
//! States are explicit: `NoSelection` until a task is selected, then
//! `TaskSelected` with the resolved ranked neighbor set. Threshold,
//! component, metric and tab changes never change state; they only
//! invalidate the one or two views that depend on the edited parameter.
//!
//! Derived structures (projected points, graph layout, overlap matrices,
//! vocabulary bars) are recomputed on demand by pure accessors and never
//! cached; a new selection discards everything derived from the old one.
//!
//! Single-threaded by construction: commands run synchronously to
//! completion and the caller serializes selection events.

use log::{debug, info, warn};
use std::collections::BTreeSet;
use thiserror::Error;

use crate::core::{
    DuplicateRootPolicy, NeighborSet, SimilarityMap, Task, TaskId,
};
use crate::geometry::{
    ProjectedPoint, RotationState, SelectionView, SphereProjector, Viewport,
};
use crate::layout::{layout_similarity_graph, GraphLayout};
use crate::lexical::{vocabulary_size, OverlapMetric};
use crate::overlap::{component_text, OverlapMatrix, TextComponent};

/// Default similarity threshold for the radial graph.
pub const DEFAULT_GRAPH_THRESHOLD: f64 = 0.7;

/// Default overlap threshold for the chord view. Deployments have shipped
/// different values here; override via the builder rather than editing.
pub const DEFAULT_CHORD_THRESHOLD: f64 = 0.5;

/// Lookup failures surfaced to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExplorerError {
    #[error("unknown task id: {0}")]
    UnknownTask(TaskId),
}

/// The renderable panels a command may invalidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum View {
    Projection,
    SimilarityGraph,
    Chord,
    Heatmap,
    VocabularyBars,
    Comparison,
    ModelBins,
}

impl View {
    pub const ALL: [View; 7] = [
        View::Projection,
        View::SimilarityGraph,
        View::Chord,
        View::Heatmap,
        View::VocabularyBars,
        View::Comparison,
        View::ModelBins,
    ];
}

/// Ordered set of views requiring re-render after a command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewSet(BTreeSet<View>);

impl ViewSet {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn of(views: &[View]) -> Self {
        Self(views.iter().copied().collect())
    }

    pub fn all() -> Self {
        Self::of(&View::ALL)
    }

    #[inline]
    pub fn contains(&self, view: View) -> bool {
        self.0.contains(&view)
    }

    pub fn iter(&self) -> impl Iterator<Item = View> + '_ {
        self.0.iter().copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Which textual tab the comparison panel shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveTab {
    #[default]
    Definition,
    Positive,
    Negative,
}

impl ActiveTab {
    /// Parse a tab key. Unknown keys fall back to the definition tab.
    pub fn from_key(key: &str) -> Self {
        match key {
            "definition" => Self::Definition,
            "positive" => Self::Positive,
            "negative" => Self::Negative,
            other => {
                debug!("unknown tab key {other:?}, using default");
                Self::default()
            }
        }
    }
}

/// Explicit selection state.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Selection {
    #[default]
    NoSelection,
    TaskSelected { root: usize, neighbors: NeighborSet },
}

/// One bar of the per-task vocabulary comparison, root first.
#[derive(Debug, Clone, PartialEq)]
pub struct VocabularyBar {
    /// Position in the task table.
    pub task: usize,
    pub label: String,
    pub count: usize,
}

/// The owned coordination state. Construct via [`crate::ExplorerBuilder`]
/// or [`ExplorerState::new`] for defaults.
#[derive(Debug, Clone)]
pub struct ExplorerState {
    pub(crate) tasks: Vec<Task>,
    pub(crate) similarities: SimilarityMap,
    pub(crate) selection: Selection,
    pub(crate) rotation: RotationState,
    pub(crate) graph_threshold: f64,
    pub(crate) chord_threshold: f64,
    pub(crate) chord_component: TextComponent,
    pub(crate) bias_component: TextComponent,
    pub(crate) bias_metric: OverlapMetric,
    pub(crate) active_tab: ActiveTab,
    pub(crate) comparison: Option<(usize, usize)>,
    pub(crate) neighbor_cap: usize,
    pub(crate) projector: SphereProjector,
    pub(crate) duplicate_root_policy: DuplicateRootPolicy,
}

impl ExplorerState {
    /// State over loaded data with default configuration.
    pub fn new(tasks: Vec<Task>, similarities: SimilarityMap) -> Self {
        info!("explorer state over {} tasks", tasks.len());
        Self {
            tasks,
            similarities,
            selection: Selection::NoSelection,
            rotation: RotationState::default(),
            graph_threshold: DEFAULT_GRAPH_THRESHOLD,
            chord_threshold: DEFAULT_CHORD_THRESHOLD,
            chord_component: TextComponent::PositiveExamples,
            bias_component: TextComponent::PositiveExamples,
            bias_metric: OverlapMetric::AdverbJaccard,
            active_tab: ActiveTab::default(),
            comparison: None,
            neighbor_cap: crate::core::NEIGHBOR_CAP,
            projector: SphereProjector::new(),
            duplicate_root_policy: DuplicateRootPolicy::default(),
        }
    }

    // -------------------- commands --------------------

    /// Select a task as the comparison root.
    ///
    /// Resolves the ranked, capped neighbor set, seeds the default
    /// comparison pair (root plus the top neighbor clearing the graph
    /// threshold) and invalidates every view. An unknown id is reported
    /// as a lookup failure and leaves the previous state untouched.
    pub fn select_task(&mut self, id: &str) -> Result<ViewSet, ExplorerError> {
        let root = match self.tasks.iter().position(|t| t.id == id) {
            Some(idx) => idx,
            None => {
                warn!("selection failed, unknown task id {id:?}");
                return Err(ExplorerError::UnknownTask(id.to_string()));
            }
        };

        let neighbors = NeighborSet::resolve(
            root,
            &self.tasks,
            &self.similarities,
            self.neighbor_cap,
            self.duplicate_root_policy,
        );

        info!(
            "selected task {} with {} ranked neighbors",
            self.tasks[root].id,
            neighbors.len()
        );

        self.comparison = neighbors
            .iter()
            .find(|n| n.similarity >= self.graph_threshold)
            .map(|n| (root, n.index));
        self.selection = Selection::TaskSelected { root, neighbors };

        Ok(ViewSet::all())
    }

    /// Apply a drag delta to the sphere rotation.
    pub fn rotate_by(&mut self, dx: f64, dy: f64) -> ViewSet {
        self.rotation = self.rotation.drag_by(dx, dy);
        ViewSet::of(&[View::Projection])
    }

    /// Edit the similarity threshold of the radial graph.
    pub fn set_graph_threshold(&mut self, threshold: f64) -> ViewSet {
        self.graph_threshold = clamp_threshold(threshold, "graph threshold");
        ViewSet::of(&[View::SimilarityGraph])
    }

    /// Edit the overlap threshold of the chord view.
    pub fn set_chord_threshold(&mut self, threshold: f64) -> ViewSet {
        self.chord_threshold = clamp_threshold(threshold, "chord threshold");
        ViewSet::of(&[View::Chord])
    }

    /// Switch the text component feeding the chord view.
    pub fn set_chord_component(&mut self, component: TextComponent) -> ViewSet {
        self.chord_component = component;
        ViewSet::of(&[View::Chord])
    }

    /// Switch the text component feeding the bias panels.
    pub fn set_bias_component(&mut self, component: TextComponent) -> ViewSet {
        self.bias_component = component;
        ViewSet::of(&[View::Heatmap, View::VocabularyBars])
    }

    /// Switch the metric of the bias panels.
    pub fn set_bias_metric(&mut self, metric: OverlapMetric) -> ViewSet {
        self.bias_metric = metric;
        ViewSet::of(&[View::Heatmap, View::VocabularyBars])
    }

    /// Switch the textual comparison tab.
    pub fn set_active_tab(&mut self, tab: ActiveTab) -> ViewSet {
        self.active_tab = tab;
        ViewSet::of(&[View::Comparison])
    }

    /// Designate the active comparison pair (a node or edge click).
    ///
    /// # Panics
    ///
    /// Panics on out-of-bounds task indices; clicks can only originate
    /// from structures the engine produced.
    pub fn set_comparison_pair(&mut self, a: usize, b: usize) -> ViewSet {
        assert!(
            a < self.tasks.len() && b < self.tasks.len(),
            "comparison pair ({}, {}) out of bounds for {} tasks",
            a,
            b,
            self.tasks.len()
        );
        self.comparison = Some((a, b));
        ViewSet::of(&[View::Comparison])
    }

    // -------------------- derived views --------------------

    /// Depth-sorted projection of every task under the current rotation
    /// and selection.
    pub fn project(&self, viewport: Viewport) -> Vec<ProjectedPoint> {
        let selection = match &self.selection {
            Selection::NoSelection => None,
            Selection::TaskSelected { root, neighbors } => {
                Some(SelectionView { root: *root, neighbors })
            }
        };
        self.projector.project(&self.tasks, self.rotation, viewport, selection)
    }

    /// Radial similarity graph of the current selection; `Empty` when
    /// nothing is selected or no neighbor clears the threshold.
    pub fn similarity_graph(&self, viewport: Viewport) -> GraphLayout {
        match &self.selection {
            Selection::NoSelection => GraphLayout::Empty,
            Selection::TaskSelected { root, neighbors } => layout_similarity_graph(
                *root,
                &self.tasks,
                neighbors,
                self.graph_threshold,
                viewport,
            ),
        }
    }

    /// Root-first member list of the current selection (root plus every
    /// ranked neighbor, pre-filter). Empty when nothing is selected.
    pub fn members(&self) -> Vec<usize> {
        match &self.selection {
            Selection::NoSelection => Vec::new(),
            Selection::TaskSelected { root, neighbors } => {
                let mut members = Vec::with_capacity(neighbors.len() + 1);
                members.push(*root);
                members.extend(neighbors.iter().map(|n| n.index));
                members
            }
        }
    }

    /// Chord-mode overlap matrix: plain token-set Jaccard over the chord
    /// component, off-diagonal cells below the chord threshold zeroed.
    pub fn chord_matrix(&self) -> Option<OverlapMatrix> {
        let members = self.members();
        if members.is_empty() {
            return None;
        }
        let raw = OverlapMatrix::build(
            &self.tasks,
            &members,
            self.chord_component,
            OverlapMetric::Jaccard,
        );
        Some(raw.thresholded(self.chord_threshold))
    }

    /// Heatmap-mode overlap matrix: raw values under the bias component
    /// and metric.
    pub fn heatmap_matrix(&self) -> Option<OverlapMatrix> {
        let members = self.members();
        if members.is_empty() {
            return None;
        }
        Some(OverlapMatrix::build(
            &self.tasks,
            &members,
            self.bias_component,
            self.bias_metric,
        ))
    }

    /// Distinct-vocabulary bars over the bias component, root first.
    pub fn vocabulary_bars(&self) -> Vec<VocabularyBar> {
        self.members()
            .into_iter()
            .enumerate()
            .map(|(i, task)| VocabularyBar {
                task,
                label: format!("T{}", i + 1),
                count: vocabulary_size(&component_text(
                    &self.tasks[task],
                    self.bias_component,
                )),
            })
            .collect()
    }

    /// The active comparison pair, resolved to task records.
    pub fn comparison_tasks(&self) -> Option<(&Task, &Task)> {
        self.comparison.map(|(a, b)| (&self.tasks[a], &self.tasks[b]))
    }

    /// Root-first member ordering the model-results panel follows.
    pub fn model_bins_order(&self) -> Vec<usize> {
        self.members()
    }

    /// Panel label of a task under the current selection: "T1" for the
    /// root, "T{rank+2}" for a ranked neighbor, "Task" otherwise.
    pub fn label_of(&self, index: usize) -> String {
        match &self.selection {
            Selection::TaskSelected { root, .. } if *root == index => "T1".to_string(),
            Selection::TaskSelected { neighbors, .. } => match neighbors.rank_of(index) {
                Some(rank) => format!("T{}", rank + 2),
                None => "Task".to_string(),
            },
            Selection::NoSelection => "Task".to_string(),
        }
    }

    // -------------------- accessors --------------------

    #[inline]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task_by_id(&self, id: &str) -> Option<(usize, &Task)> {
        self.tasks.iter().enumerate().find(|(_, t)| t.id == id)
    }

    #[inline]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    #[inline]
    pub fn rotation(&self) -> RotationState {
        self.rotation
    }

    #[inline]
    pub fn graph_threshold(&self) -> f64 {
        self.graph_threshold
    }

    #[inline]
    pub fn chord_threshold(&self) -> f64 {
        self.chord_threshold
    }

    #[inline]
    pub fn active_tab(&self) -> ActiveTab {
        self.active_tab
    }

    #[inline]
    pub fn bias_metric(&self) -> OverlapMetric {
        self.bias_metric
    }

    #[inline]
    pub fn comparison(&self) -> Option<(usize, usize)> {
        self.comparison
    }
}

fn clamp_threshold(value: f64, what: &str) -> f64 {
    if !value.is_finite() {
        warn!("non-finite {what}, keeping 0");
        return 0.0;
    }
    let clamped = value.clamp(0.0, 1.0);
    if clamped != value {
        warn!("{what} {value} outside [0,1], clamped to {clamped}");
    }
    clamped
}
