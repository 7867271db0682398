//! Taskscope: geometry, layout and lexical-overlap analytics for exploring
//! semantic similarity between natural-language task descriptions.
//!
//! The crate turns raw task records plus a precomputed pairwise similarity
//! map into renderable geometric and numeric structures for a set of
//! coordinated panels:
//!
//! - `geometry`: rotatable 3D sphere projection of all tasks with
//!   depth-ordered 2D output,
//! - `layout`: radial similarity graph of a selected task's neighbors,
//! - `overlap`: square lexical-overlap matrices feeding a chord diagram
//!   and a heatmap,
//! - `lexical`: tokenization, heuristic part-of-speech filters, Jaccard
//!   overlap and vocabulary counts,
//! - `state`: the owned coordination state that keeps every panel
//!   consistent through named commands,
//! - `builder`: chained configuration for thresholds, caps and seeds.
//!
//! Design goals:
//! - Pure, synchronous operations: every derived structure is a function
//!   of the task table and the current coordination state.
//! - Deterministic output under a fixed seed, including the fallback
//!   placement of tasks without usable coordinates.
//! - No retrieval, caching or drawing: the data layer hands in loaded
//!   records via `core::TaskSource`, the presentation layer consumes
//!   plain structs.
//!
//! Similarity computation itself is out of scope; the engine consumes a
//! sparse, not-necessarily-symmetric similarity map and looks up both
//! directions defensively.

pub mod builder;
pub mod core;
pub mod geometry;
pub mod layout;
pub mod lexical;
pub mod overlap;
pub mod state;

pub use crate::builder::ExplorerBuilder;
pub use crate::core::{
    DuplicateRootPolicy, InMemorySource, ModelResultBin, Neighbor, NeighborSet,
    SimilarityMap, Task, TaskExample, TaskId, TaskSource,
};
pub use crate::geometry::{
    PointRole, ProjectedPoint, RotationState, SelectionView, SphereProjector, Viewport,
};
pub use crate::layout::{GraphLayout, LayoutEdge, LayoutNode};
pub use crate::lexical::OverlapMetric;
pub use crate::overlap::{OverlapMatrix, TextComponent};
pub use crate::state::{
    ActiveTab, ExplorerError, ExplorerState, Selection, View, ViewSet, VocabularyBar,
};

#[cfg(test)]
mod tests;
