//! Radial similarity-graph layout.
//!
//! Places the selected root task at the viewport center and its
//! above-threshold neighbors on a surrounding circle:
//!
//! - Angles are evenly spaced by position among the retained neighbors,
//!   starting at the top and proceeding clockwise in screen coordinates.
//! - Higher similarity pulls a neighbor closer to the root: the radius
//!   spans a fixed 60–100% band of the base radius, driven by the
//!   similarity normalized against the active threshold.
//! - Edges run from the root to each retained neighbor only; there are no
//!   neighbor-to-neighbor edges. Edge width follows the same normalized
//!   similarity over a fixed band.
//!
//! When no neighbor clears the threshold the layout is explicitly empty,
//! not an error, so the caller can render a "no results" state.

use std::f64::consts::{FRAC_PI_2, TAU};

use log::{debug, info};

use crate::core::{NeighborSet, Task};
use crate::geometry::Viewport;

/// Fraction of the viewport's smaller side used as the base circle radius.
pub const BASE_RADIUS_FRACTION: f64 = 0.35;

/// How far a fully-similar neighbor is pulled toward the root.
pub const RADIUS_PULL: f64 = 0.4;

/// Edge stroke-width band in screen units.
pub const MIN_EDGE_WIDTH: f64 = 1.5;
pub const MAX_EDGE_WIDTH: f64 = 5.5;

/// Node draw radii in screen units.
pub const ROOT_NODE_RADIUS: f64 = 18.0;
pub const NEIGHBOR_NODE_RADIUS: f64 = 14.0;

/// One placed node of the similarity graph.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutNode {
    /// Position in the task table.
    pub task: usize,
    /// Display label: "T1" for the root, "T{rank+2}" for neighbors,
    /// keyed to the pre-filter rank.
    pub label: String,
    pub x: f64,
    pub y: f64,
    /// Draw radius.
    pub radius: f64,
    /// `None` for the root.
    pub rank: Option<usize>,
    /// Similarity to the root; 1.0 for the root itself.
    pub similarity: f64,
}

/// One root-to-neighbor edge.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutEdge {
    /// Index into the layout's node list; always 0 (the root).
    pub source: usize,
    /// Index into the layout's node list.
    pub target: usize,
    pub similarity: f64,
    /// Stroke width, in [`MIN_EDGE_WIDTH`, `MAX_EDGE_WIDTH`].
    pub width: f64,
}

/// Result of laying out the similarity graph.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphLayout {
    /// No neighbor cleared the threshold.
    Empty,
    Radial {
        /// Root first, then retained neighbors in rank order.
        nodes: Vec<LayoutNode>,
        edges: Vec<LayoutEdge>,
    },
}

impl GraphLayout {
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, GraphLayout::Empty)
    }

    /// Node list, empty for the empty layout.
    pub fn nodes(&self) -> &[LayoutNode] {
        match self {
            GraphLayout::Empty => &[],
            GraphLayout::Radial { nodes, .. } => nodes,
        }
    }

    /// Edge list, empty for the empty layout.
    pub fn edges(&self) -> &[LayoutEdge] {
        match self {
            GraphLayout::Empty => &[],
            GraphLayout::Radial { edges, .. } => edges,
        }
    }
}

/// Similarity rescaled against the active threshold, clamped to [0,1].
///
/// A degenerate band (threshold at the maximum) counts as fully similar.
pub fn normalized_similarity(similarity: f64, threshold: f64) -> f64 {
    let band = 1.0 - threshold;
    if band <= f64::EPSILON {
        return 1.0;
    }
    ((similarity - threshold) / band).clamp(0.0, 1.0)
}

/// Lay out the root task and its above-threshold neighbors.
pub fn layout_similarity_graph(
    root: usize,
    tasks: &[Task],
    neighbors: &NeighborSet,
    threshold: f64,
    viewport: Viewport,
) -> GraphLayout {
    assert!(root < tasks.len(), "root index {} out of bounds", root);

    let retained: Vec<_> =
        neighbors.iter().filter(|n| n.similarity >= threshold).collect();

    if retained.is_empty() {
        info!(
            "no neighbors at or above threshold {:.2} (max similarity {:.3})",
            threshold,
            neighbors.max_similarity()
        );
        return GraphLayout::Empty;
    }

    let (cx, cy) = viewport.center();
    let base_radius = viewport.width.min(viewport.height) * BASE_RADIUS_FRACTION;

    debug!(
        "laying out {} of {} neighbors around root {} (threshold {:.2})",
        retained.len(),
        neighbors.len(),
        tasks[root].id,
        threshold
    );

    let mut nodes = Vec::with_capacity(retained.len() + 1);
    nodes.push(LayoutNode {
        task: root,
        label: "T1".to_string(),
        x: cx,
        y: cy,
        radius: ROOT_NODE_RADIUS,
        rank: None,
        similarity: 1.0,
    });

    let mut edges = Vec::with_capacity(retained.len());
    let n = retained.len() as f64;

    for (slot, neighbor) in retained.iter().enumerate() {
        // Even spacing by position among the retained set, top first.
        let angle = (slot as f64 / n) * TAU - FRAC_PI_2;
        let norm = normalized_similarity(neighbor.similarity, threshold);
        let radius = base_radius * (1.0 - norm * RADIUS_PULL);

        nodes.push(LayoutNode {
            task: neighbor.index,
            label: format!("T{}", neighbor.rank + 2),
            x: cx + angle.cos() * radius,
            y: cy + angle.sin() * radius,
            radius: NEIGHBOR_NODE_RADIUS,
            rank: Some(neighbor.rank),
            similarity: neighbor.similarity,
        });

        edges.push(LayoutEdge {
            source: 0,
            target: nodes.len() - 1,
            similarity: neighbor.similarity,
            width: MIN_EDGE_WIDTH + norm * (MAX_EDGE_WIDTH - MIN_EDGE_WIDTH),
        });
    }

    GraphLayout::Radial { nodes, edges }
}
