//! The shared result matrix (C7): one objective value per (query, target)
//! cell, symmetrized at finalization when both sides are the same set.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A dense query-by-target matrix of objective values. `None` marks a
/// failed or not-yet-computed cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistanceMatrix {
    pub query_count: usize,
    pub target_count: usize,
    values: Vec<Option<f64>>,
}

impl DistanceMatrix {
    pub fn new(query_count: usize, target_count: usize) -> Self {
        DistanceMatrix {
            query_count,
            target_count,
            values: vec![None; query_count * target_count],
        }
    }

    fn index(&self, query: usize, target: usize) -> usize {
        query * self.target_count + target
    }

    /// Writes one cell. Per spec.md §5, each cell is written by exactly one
    /// worker, so no locking is required at this layer.
    pub fn set(&mut self, query: usize, target: usize, value: Option<f64>) {
        let idx = self.index(query, target);
        self.values[idx] = value;
    }

    pub fn get(&self, query: usize, target: usize) -> Option<f64> {
        self.values[self.index(query, target)]
    }

    /// Copies the upper triangle to the lower triangle and sets the
    /// diagonal to zero. Only meaningful when `query_count == target_count`
    /// and the matrix was populated as an upper-triangular job set.
    pub fn symmetrize(&mut self) {
        assert_eq!(
            self.query_count, self.target_count,
            "symmetrize requires a square matrix"
        );
        let n = self.query_count;
        for i in 0..n {
            self.set(i, i, Some(0.0));
            for k in (i + 1)..n {
                if let Some(value) = self.get(i, k) {
                    self.set(k, i, Some(value));
                }
            }
        }
    }

    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating distance matrix directory '{}'", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self).context("serializing distance matrix to JSON")?;
        fs::write(path, json).with_context(|| format!("writing distance matrix '{}'", path.display()))
    }
}
