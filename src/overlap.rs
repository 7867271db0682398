//! Square lexical-overlap matrices for the chord and heatmap panels.
//!
//! Given the root-first member list (root task plus its ranked neighbors),
//! a text component selector and an overlap metric, builds the full
//! pairwise matrix:
//!
//! - diagonal entries are exactly 1 regardless of metric,
//! - off-diagonal entries carry the raw pairwise score (heatmap
//!   consumption mode),
//! - `thresholded` zeroes off-diagonal cells below the chord threshold
//!   (chord consumption mode) and `has_chords` signals whether anything
//!   survived.
//!
//! Storage is a dense matrix; orders here are tiny (root + at most nine
//! neighbors), so no sparsity handling is warranted.

use std::fmt;

use log::{debug, info};
use smartcore::linalg::basic::arrays::{Array, Array2, MutArray};
use smartcore::linalg::basic::matrix::DenseMatrix;

use crate::core::Task;
use crate::lexical::{bias_metric, OverlapMetric};

/// Which textual component of a task feeds the overlap computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextComponent {
    #[default]
    Definition,
    PositiveExamples,
    NegativeExamples,
}

impl TextComponent {
    /// Parse a selector key. Unknown keys fall back to the default
    /// component.
    pub fn from_key(key: &str) -> Self {
        match key {
            "definition" => Self::Definition,
            "positive_examples" => Self::PositiveExamples,
            "negative_examples" => Self::NegativeExamples,
            other => {
                debug!("unknown component key {other:?}, using default");
                Self::default()
            }
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Self::Definition => "definition",
            Self::PositiveExamples => "positive_examples",
            Self::NegativeExamples => "negative_examples",
        }
    }
}

/// Extract the selected component's text: the raw definition, or every
/// non-empty input/output/explanation of the selected example list,
/// space-joined.
pub fn component_text(task: &Task, component: TextComponent) -> String {
    let examples = match component {
        TextComponent::Definition => return task.definition.clone(),
        TextComponent::PositiveExamples => &task.positive_examples,
        TextComponent::NegativeExamples => &task.negative_examples,
    };

    let mut parts: Vec<&str> = Vec::new();
    for ex in examples {
        for field in [&ex.input, &ex.output, &ex.explanation] {
            if !field.is_empty() {
                parts.push(field);
            }
        }
    }
    parts.join(" ")
}

/// Square pairwise overlap matrix, indexed by the root-first member list.
#[derive(Debug, Clone)]
pub struct OverlapMatrix {
    matrix: DenseMatrix<f64>,
    /// Task-table indices of the members, root first.
    members: Vec<usize>,
    pub component: TextComponent,
    pub metric: OverlapMetric,
}

impl OverlapMatrix {
    /// Build the raw overlap matrix (heatmap consumption mode).
    ///
    /// `members` are task-table indices, root first. Diagonal cells are
    /// exactly 1; off-diagonal cells are the pairwise metric score.
    ///
    /// # Panics
    ///
    /// Panics if `members` is empty or any index is out of bounds.
    pub fn build(
        tasks: &[Task],
        members: &[usize],
        component: TextComponent,
        metric: OverlapMetric,
    ) -> Self {
        assert!(!members.is_empty(), "overlap matrix needs at least the root");
        let n = members.len();

        info!(
            "building {n}x{n} overlap matrix ({}, {})",
            component.key(),
            metric.key()
        );

        let texts: Vec<String> = members
            .iter()
            .map(|&m| {
                assert!(m < tasks.len(), "member index {} out of bounds", m);
                component_text(&tasks[m], component)
            })
            .collect();

        let mut data = Vec::with_capacity(n * n);
        for i in 0..n {
            for j in 0..n {
                if i == j {
                    data.push(1.0);
                } else {
                    data.push(bias_metric(&texts[i], &texts[j], metric));
                }
            }
        }

        let matrix = DenseMatrix::from_iterator(data.into_iter(), n, n, 0);
        Self { matrix, members: members.to_vec(), component, metric }
    }

    /// Matrix order (number of members).
    #[inline]
    pub fn order(&self) -> usize {
        self.members.len()
    }

    /// Task-table indices of the members, root first.
    #[inline]
    pub fn members(&self) -> &[usize] {
        &self.members
    }

    /// Matrix dimensions as (rows, cols).
    pub fn shape(&self) -> (usize, usize) {
        self.matrix.shape()
    }

    /// Cell value at (i, j).
    pub fn get(&self, i: usize, j: usize) -> f64 {
        let n = self.order();
        assert!(
            i < n && j < n,
            "Index out of bounds: ({}, {}) for {}x{} matrix",
            i,
            j,
            n,
            n
        );
        *self.matrix.get((i, j))
    }

    /// The i-th row as a vector.
    pub fn row(&self, i: usize) -> Vec<f64> {
        let n = self.order();
        assert!(i < n, "Row index {} out of bounds for order {}", i, n);
        (0..n).map(|j| *self.matrix.get((i, j))).collect()
    }

    /// Positional panel labels: "T1" for the root, "T{i+1}" beyond.
    pub fn labels(&self) -> Vec<String> {
        (0..self.order()).map(|i| format!("T{}", i + 1)).collect()
    }

    /// Chord consumption mode: zero every off-diagonal cell below
    /// `threshold`. Diagonal cells are untouched.
    pub fn thresholded(&self, threshold: f64) -> OverlapMatrix {
        let n = self.order();
        let mut out = self.clone();
        let mut zeroed = 0usize;
        for i in 0..n {
            for j in 0..n {
                if i != j && *out.matrix.get((i, j)) < threshold {
                    out.matrix.set((i, j), 0.0);
                    zeroed += 1;
                }
            }
        }
        debug!("chord threshold {threshold:.2}: zeroed {zeroed} cells");
        out
    }

    /// True when any off-diagonal cell is positive; false signals the
    /// "no chord" state.
    pub fn has_chords(&self) -> bool {
        let n = self.order();
        for i in 0..n {
            for j in 0..n {
                if i != j && *self.matrix.get((i, j)) > 0.0 {
                    return true;
                }
            }
        }
        false
    }

    /// Summary statistics over the off-diagonal.
    pub fn stats(&self) -> OverlapStats {
        let n = self.order();
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        let mut nnz = 0usize;
        let mut count = 0usize;

        for i in 0..n {
            for j in 0..n {
                if i == j {
                    continue;
                }
                let v = *self.matrix.get((i, j));
                min = min.min(v);
                max = max.max(v);
                sum += v;
                count += 1;
                if v > 0.0 {
                    nnz += 1;
                }
            }
        }

        if count == 0 {
            min = 0.0;
            max = 0.0;
        }

        OverlapStats {
            order: n,
            nnz_off_diagonal: nnz,
            min_overlap: min,
            max_overlap: max,
            mean_overlap: if count > 0 { sum / count as f64 } else { 0.0 },
        }
    }
}

/// Off-diagonal summary of an overlap matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlapStats {
    pub order: usize,
    pub nnz_off_diagonal: usize,
    pub min_overlap: f64,
    pub max_overlap: f64,
    pub mean_overlap: f64,
}

impl fmt::Display for OverlapMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.order();
        writeln!(
            f,
            "OverlapMatrix ({}×{}, {}, {}):",
            n,
            n,
            self.component.key(),
            self.metric.key()
        )?;

        if n <= 10 {
            for i in 0..n {
                write!(f, "Row {}: [", i)?;
                for j in 0..n {
                    write!(f, "{:6.3} ", self.matrix.get((i, j)))?;
                }
                writeln!(f, "]")?;
            }
        } else {
            let stats = self.stats();
            writeln!(f, "Matrix too large to display ({} members)", n)?;
            writeln!(f, "{}", stats)?;
        }

        Ok(())
    }
}

impl fmt::Display for OverlapStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Overlap Statistics:")?;
        writeln!(f, "  Order: {}", self.order)?;
        writeln!(f, "  Non-zero off-diagonal: {}", self.nnz_off_diagonal)?;
        writeln!(
            f,
            "  Overlap range: [{:.3}, {:.3}], mean: {:.3}",
            self.min_overlap, self.max_overlap, self.mean_overlap
        )?;
        Ok(())
    }
}
