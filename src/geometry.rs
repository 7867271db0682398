//! Sphere projection: normalize, rotate, project, depth-order.
//!
//! Turns each task's raw 3D coordinates into a 2D screen position with
//! depth metadata for back-to-front painting:
//!
//! - Coordinates are normalized to the unit sphere surface; degenerate or
//!   missing coordinates fall back to a pseudo-random point drawn by
//!   inverse-cosine latitude sampling from a seeded generator, so the
//!   fallback placement is reproducible for a fixed task list.
//! - Rotation applies yaw about the vertical axis first, then pitch about
//!   the horizontal axis. The order is fixed; the two do not commute.
//! - Projection is orthographic; depth is the rotated z, remapped to
//!   [0,1] to drive size and opacity interpolation.
//!
//! Everything here is a pure function of the task table and the rotation
//! state. The rotation state itself only changes through `drag_by`, which
//! accumulates yaw unbounded and clamps pitch short of the poles.

use log::{debug, trace};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::core::{NeighborSet, Task};

/// Below this vector length, coordinates are treated as degenerate.
pub const DEGENERATE_EPS: f64 = 1e-3;

/// Degrees of rotation per pixel of drag.
pub const DRAG_SENSITIVITY: f64 = 0.4;

/// Pitch bounds keeping the projection short of flipping through a pole.
pub const MIN_PITCH_DEG: f64 = -89.0;
pub const MAX_PITCH_DEG: f64 = 89.0;

/// Margin between the projected sphere and the viewport edge.
pub const VIEWPORT_MARGIN: f64 = 40.0;

const MIN_POINT_SIZE: f64 = 2.0;
const DEPTH_SIZE_GAIN: f64 = 3.0;
const NEUTRAL_OPACITY_BASE: f64 = 0.3;
const NEUTRAL_OPACITY_GAIN: f64 = 0.5;
const UNRELATED_OPACITY_BASE: f64 = 0.15;
const UNRELATED_OPACITY_GAIN: f64 = 0.1;
const SELECTED_OPACITY: f64 = 1.0;
const NEIGHBOR_OPACITY: f64 = 0.9;

/// A point in 3D model space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    #[inline]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean norm.
    #[inline]
    pub fn norm(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Scale to unit length; `None` when the vector is degenerate
    /// (norm below `DEGENERATE_EPS`).
    pub fn normalized(&self) -> Option<Vec3> {
        let len = self.norm();
        if len > DEGENERATE_EPS {
            Some(Vec3::new(self.x / len, self.y / len, self.z / len))
        } else {
            None
        }
    }
}

/// Uniform point on the unit sphere surface via inverse-cosine latitude
/// sampling: longitude uniform in [0, 2π), latitude φ = acos(2u − 1).
pub fn random_unit_sphere<R: Rng>(rng: &mut R) -> Vec3 {
    let theta = rng.random::<f64>() * std::f64::consts::TAU;
    let phi = (2.0 * rng.random::<f64>() - 1.0).acos();
    Vec3::new(
        phi.sin() * theta.cos(),
        phi.sin() * theta.sin(),
        phi.cos(),
    )
}

/// Accumulated view rotation, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationState {
    /// Rotation about the vertical axis. Unbounded.
    pub yaw: f64,
    /// Rotation about the horizontal axis, clamped to
    /// [`MIN_PITCH_DEG`, `MAX_PITCH_DEG`].
    pub pitch: f64,
}

impl Default for RotationState {
    fn default() -> Self {
        // Slight downward tilt as the initial view.
        Self { yaw: 0.0, pitch: -20.0 }
    }
}

impl RotationState {
    pub fn new(yaw: f64, pitch: f64) -> Self {
        Self { yaw, pitch: pitch.clamp(MIN_PITCH_DEG, MAX_PITCH_DEG) }
    }

    /// Apply a drag delta in pixels. Yaw accumulates without bound;
    /// pitch is clamped short of the poles.
    pub fn drag_by(self, dx: f64, dy: f64) -> Self {
        let yaw = self.yaw + dx * DRAG_SENSITIVITY;
        let pitch =
            (self.pitch + dy * DRAG_SENSITIVITY).clamp(MIN_PITCH_DEG, MAX_PITCH_DEG);
        trace!("drag ({dx}, {dy}) -> yaw {yaw:.2}, pitch {pitch:.2}");
        Self { yaw, pitch }
    }
}

/// Rotate a point on the unit sphere: yaw about the vertical axis first,
/// then pitch about the horizontal axis. Not commutative.
pub fn rotate(v: Vec3, rotation: RotationState) -> Vec3 {
    let yaw = rotation.yaw.to_radians();
    let pitch = rotation.pitch.to_radians();

    let x1 = v.x * yaw.cos() + v.z * yaw.sin();
    let z1 = -v.x * yaw.sin() + v.z * yaw.cos();

    let y1 = v.y * pitch.cos() - z1 * pitch.sin();
    let z2 = v.y * pitch.sin() + z1 * pitch.cos();

    Vec3::new(x1, y1, z2)
}

/// Target drawing area for the projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn center(&self) -> (f64, f64) {
        (self.width / 2.0, self.height / 2.0)
    }

    /// Sphere radius in screen units.
    #[inline]
    pub fn radius(&self) -> f64 {
        self.width.min(self.height) / 2.0 - VIEWPORT_MARGIN
    }
}

/// Render role of a projected point under the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointRole {
    /// No selection active; colored by category.
    Neutral,
    /// The selected root task.
    Selected,
    /// A ranked neighbor of the root; carries its rank for the gradient.
    Neighbor(usize),
    /// Any other task while a selection is active.
    Unrelated,
}

/// One task projected to screen space. Ephemeral: recomputed on every
/// rotation or selection change, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedPoint {
    /// Position in the task table.
    pub task: usize,
    pub x: f64,
    pub y: f64,
    /// Rotated z in [-1, 1]; sort key for painter's ordering.
    pub depth: f64,
    /// Depth remapped to [0, 1], 1 = front.
    pub depth_factor: f64,
    pub size: f64,
    pub opacity: f64,
    pub role: PointRole,
}

/// The active selection as the projector sees it.
#[derive(Debug, Clone, Copy)]
pub struct SelectionView<'a> {
    pub root: usize,
    pub neighbors: &'a NeighborSet,
}

/// Projects the task table onto the rotatable sphere.
///
/// Only the fallback placement of degenerate coordinates consumes
/// randomness; the generator is re-seeded from the stored seed on every
/// pass so repeated projections of the same task list agree.
#[derive(Debug, Clone)]
pub struct SphereProjector {
    seed: u64,
}

impl Default for SphereProjector {
    fn default() -> Self {
        Self { seed: rand::random() }
    }
}

impl SphereProjector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fixed seed for reproducible fallback placement.
    pub fn with_seed(seed: u64) -> Self {
        Self { seed }
    }

    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Project every task, returning points sorted ascending by depth so
    /// closer points paint last. Exact tie order is cosmetic.
    pub fn project(
        &self,
        tasks: &[Task],
        rotation: RotationState,
        viewport: Viewport,
        selection: Option<SelectionView<'_>>,
    ) -> Vec<ProjectedPoint> {
        let (cx, cy) = viewport.center();
        let radius = viewport.radius();
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);

        debug!(
            "projecting {} tasks at yaw {:.2}, pitch {:.2}",
            tasks.len(),
            rotation.yaw,
            rotation.pitch
        );

        let mut points: Vec<ProjectedPoint> = tasks
            .iter()
            .enumerate()
            .map(|(i, task)| {
                let raw = task
                    .coords
                    .map(|[x, y, z]| Vec3::new(x, y, z))
                    .unwrap_or(Vec3::new(0.0, 0.0, 0.0));
                let unit = match raw.normalized() {
                    Some(v) => v,
                    None => random_unit_sphere(&mut rng),
                };

                let r = rotate(unit, rotation);
                let depth_factor = (r.z + 1.0) / 2.0;

                let role = match selection {
                    None => PointRole::Neutral,
                    Some(sel) if sel.root == i => PointRole::Selected,
                    Some(sel) => match sel.neighbors.rank_of(i) {
                        Some(rank) => PointRole::Neighbor(rank),
                        None => PointRole::Unrelated,
                    },
                };

                let opacity = match role {
                    PointRole::Neutral => {
                        NEUTRAL_OPACITY_BASE + depth_factor * NEUTRAL_OPACITY_GAIN
                    }
                    PointRole::Selected => SELECTED_OPACITY,
                    PointRole::Neighbor(_) => NEIGHBOR_OPACITY,
                    PointRole::Unrelated => {
                        UNRELATED_OPACITY_BASE + depth_factor * UNRELATED_OPACITY_GAIN
                    }
                };

                ProjectedPoint {
                    task: i,
                    x: cx + r.x * radius,
                    y: cy + r.y * radius,
                    depth: r.z,
                    depth_factor,
                    size: MIN_POINT_SIZE + depth_factor * DEPTH_SIZE_GAIN,
                    opacity,
                    role,
                }
            })
            .collect();

        // Back to front.
        points.sort_by(|a, b| {
            a.depth.partial_cmp(&b.depth).unwrap_or(std::cmp::Ordering::Equal)
        });

        points
    }
}
