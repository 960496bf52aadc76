use crate::util::format_weight;
use anyhow::{anyhow, Result};

/// Environment variable names read by the external game program, in grid
/// axis order.
pub const WEIGHT_NAMES: [&str; 5] = [
    "WEIGHT_MATCHED",
    "WEIGHT_COMPLETE",
    "WEIGHT_PLAYABLE",
    "WEIGHT_DISCARDABLE",
    "WEIGHT_FINAL_CARD",
];

/// One point in the five-dimensional weight grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Weights(pub [f64; 5]);

impl Weights {
    /// The `(name, value)` pairs overlaid on the child process environment.
    /// Values are rendered as the exact text the external program parses.
    pub fn env_overlay(&self) -> Vec<(&'static str, String)> {
        WEIGHT_NAMES
            .iter()
            .zip(self.0.iter())
            .map(|(name, value)| (*name, format_weight(*value)))
            .collect()
    }

    /// Compact comma-joined rendering for progress lines and leaderboards.
    pub fn describe(&self) -> String {
        self.0
            .iter()
            .map(|value| format_weight(*value))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// The full Cartesian product of candidate values across the five weight
/// axes. Iteration is lazy, deterministic, and restartable: lexicographic
/// with the first axis slowest and the last axis fastest.
#[derive(Clone, Debug)]
pub struct WeightGrid {
    axes: [Vec<f64>; 5],
}

impl WeightGrid {
    pub fn new(axes: [Vec<f64>; 5]) -> Result<Self> {
        for (idx, axis) in axes.iter().enumerate() {
            if axis.is_empty() {
                return Err(anyhow!(
                    "candidate list for {} is empty",
                    WEIGHT_NAMES[idx]
                ));
            }
        }
        Ok(Self { axes })
    }

    /// Grid with the same candidate list on every axis.
    pub fn uniform(values: Vec<f64>) -> Result<Self> {
        if values.is_empty() {
            return Err(anyhow!("candidate value list is empty"));
        }
        Ok(Self {
            axes: [
                values.clone(),
                values.clone(),
                values.clone(),
                values.clone(),
                values,
            ],
        })
    }

    /// Number of configurations in the grid (product of axis sizes).
    pub fn len(&self) -> usize {
        self.axes.iter().map(Vec::len).product()
    }

    pub fn is_empty(&self) -> bool {
        // Axes are validated non-empty at construction.
        false
    }

    pub fn axis(&self, idx: usize) -> &[f64] {
        &self.axes[idx]
    }

    pub fn iter(&self) -> GridIter<'_> {
        GridIter {
            grid: self,
            cursor: [0; 5],
            done: false,
        }
    }
}

impl<'a> IntoIterator for &'a WeightGrid {
    type Item = Weights;
    type IntoIter = GridIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Odometer over the grid axes; the last axis ticks fastest.
pub struct GridIter<'a> {
    grid: &'a WeightGrid,
    cursor: [usize; 5],
    done: bool,
}

impl Iterator for GridIter<'_> {
    type Item = Weights;

    fn next(&mut self) -> Option<Weights> {
        if self.done {
            return None;
        }

        let mut values = [0.0; 5];
        for (dim, slot) in values.iter_mut().enumerate() {
            *slot = self.grid.axes[dim][self.cursor[dim]];
        }

        for dim in (0..5).rev() {
            self.cursor[dim] += 1;
            if self.cursor[dim] < self.grid.axes[dim].len() {
                return Some(Weights(values));
            }
            self.cursor[dim] = 0;
        }
        self.done = true;
        Some(Weights(values))
    }
}
