//! Chained configuration for the explorer state.

use log::{debug, info};

use crate::core::{DuplicateRootPolicy, SimilarityMap, Task, TaskSource, NEIGHBOR_CAP};
use crate::geometry::{RotationState, SphereProjector};
use crate::lexical::OverlapMetric;
use crate::overlap::TextComponent;
use crate::state::{
    ActiveTab, ExplorerState, Selection, DEFAULT_CHORD_THRESHOLD,
    DEFAULT_GRAPH_THRESHOLD,
};

/// Builder over the explorer's configurable defaults.
///
/// Thresholds land outside [0,1] are clamped at build time. A projector
/// seed fixed via `with_seed` makes the fallback sphere placement
/// reproducible; otherwise it is process-random.
pub struct ExplorerBuilder {
    graph_threshold: f64,
    chord_threshold: f64,
    neighbor_cap: usize,
    seed: Option<u64>,
    rotation: RotationState,
    chord_component: TextComponent,
    bias_component: TextComponent,
    bias_metric: OverlapMetric,
    active_tab: ActiveTab,
    duplicate_root_policy: DuplicateRootPolicy,
}

impl Default for ExplorerBuilder {
    fn default() -> Self {
        debug!("creating ExplorerBuilder with default parameters");
        Self {
            graph_threshold: DEFAULT_GRAPH_THRESHOLD,
            chord_threshold: DEFAULT_CHORD_THRESHOLD,
            neighbor_cap: NEIGHBOR_CAP,
            seed: None,
            rotation: RotationState::default(),
            chord_component: TextComponent::PositiveExamples,
            bias_component: TextComponent::PositiveExamples,
            bias_metric: OverlapMetric::AdverbJaccard,
            active_tab: ActiveTab::default(),
            duplicate_root_policy: DuplicateRootPolicy::default(),
        }
    }
}

impl ExplorerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Similarity threshold for the radial graph.
    pub fn with_graph_threshold(mut self, threshold: f64) -> Self {
        info!("configuring graph threshold: {threshold}");
        self.graph_threshold = threshold;
        self
    }

    /// Overlap threshold for the chord view.
    pub fn with_chord_threshold(mut self, threshold: f64) -> Self {
        info!("configuring chord threshold: {threshold}");
        self.chord_threshold = threshold;
        self
    }

    /// Cap on ranked neighbors kept per selection.
    pub fn with_neighbor_cap(mut self, cap: usize) -> Self {
        info!("configuring neighbor cap: {cap}");
        self.neighbor_cap = cap;
        self
    }

    /// Fixed seed for the degenerate-coordinate sphere fallback.
    pub fn with_seed(mut self, seed: u64) -> Self {
        info!("configuring projector seed: {seed}");
        self.seed = Some(seed);
        self
    }

    /// Initial view rotation.
    pub fn with_rotation(mut self, rotation: RotationState) -> Self {
        self.rotation = rotation;
        self
    }

    /// Default text component of the chord view.
    pub fn with_chord_component(mut self, component: TextComponent) -> Self {
        self.chord_component = component;
        self
    }

    /// Default text component of the bias panels.
    pub fn with_bias_component(mut self, component: TextComponent) -> Self {
        self.bias_component = component;
        self
    }

    /// Default metric of the bias panels.
    pub fn with_bias_metric(mut self, metric: OverlapMetric) -> Self {
        self.bias_metric = metric;
        self
    }

    /// Initial comparison tab.
    pub fn with_active_tab(mut self, tab: ActiveTab) -> Self {
        self.active_tab = tab;
        self
    }

    /// How a stale self-entry in the root's similarity row is treated.
    pub fn with_duplicate_root_policy(mut self, policy: DuplicateRootPolicy) -> Self {
        info!("configuring duplicate-root policy: {policy:?}");
        self.duplicate_root_policy = policy;
        self
    }

    /// Build the explorer state over loaded data.
    pub fn build(self, tasks: Vec<Task>, similarities: SimilarityMap) -> ExplorerState {
        info!(
            "building explorer over {} tasks: graph_threshold={}, chord_threshold={}, cap={}",
            tasks.len(),
            self.graph_threshold,
            self.chord_threshold,
            self.neighbor_cap
        );

        let mut state = ExplorerState::new(tasks, similarities);
        state.rotation = self.rotation;
        state.chord_component = self.chord_component;
        state.bias_component = self.bias_component;
        state.bias_metric = self.bias_metric;
        state.active_tab = self.active_tab;
        state.neighbor_cap = self.neighbor_cap;
        state.duplicate_root_policy = self.duplicate_root_policy;
        state.selection = Selection::NoSelection;
        if let Some(seed) = self.seed {
            state.projector = SphereProjector::with_seed(seed);
        }
        // Route thresholds through the commands so clamping applies.
        state.set_graph_threshold(self.graph_threshold);
        state.set_chord_threshold(self.chord_threshold);
        state
    }

    /// Build directly from a data source.
    pub fn build_from_source<S: TaskSource>(self, source: &S) -> ExplorerState {
        self.build(source.tasks().to_vec(), source.similarities().clone())
    }
}
